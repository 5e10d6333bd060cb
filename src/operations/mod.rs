//! Request builders for engine operations.
//!
//! Engine entry points take explicit, validated request objects — there is
//! no process-wide pending-action state. The builders validate inputs the
//! same way at every call site.

mod ingest;
mod withdraw;

pub use ingest::{IngestBuilder, IngestRequest};
pub use withdraw::{WithdrawBuilder, WithdrawRequest};
