use std::sync::Arc;
use std::thread;

use stockroom::schema;
use stockroom::{
    CellAddr, Column, EngineConfig, FixedProbe, IngestBuilder, InMemoryTable, StockEngine,
    StockNote, TableStore, WithdrawBuilder, WithdrawOutcome,
};

fn engine_with_table() -> (StockEngine, Arc<InMemoryTable>) {
    let table = Arc::new(InMemoryTable::new());
    let engine = StockEngine::new(table.clone(), Arc::new(FixedProbe::default()));
    (engine, table)
}

fn ingest(engine: &StockEngine, label: &str, text: &str) {
    engine
        .ingest(
            IngestBuilder::new()
                .batch_label(label)
                .raw_text(text)
                .build()
                .unwrap(),
        )
        .unwrap();
}

fn withdraw(engine: &StockEngine, quantity: u32) -> WithdrawOutcome {
    engine
        .withdraw(WithdrawBuilder::new().quantity(quantity).build().unwrap())
        .unwrap()
}

fn withdraw_keyword(engine: &StockEngine, quantity: u32, keyword: &str) -> WithdrawOutcome {
    engine
        .withdraw(
            WithdrawBuilder::new()
                .quantity(quantity)
                .keyword(keyword)
                .build()
                .unwrap(),
        )
        .unwrap()
}

fn stock_notes(table: &InMemoryTable) -> Vec<String> {
    table
        .read_all()
        .unwrap()
        .iter()
        .skip(1)
        .filter(|row| !schema::cell(row, Column::Identifier).is_empty())
        .map(|row| schema::cell(row, Column::StockNote).to_string())
        .collect()
}

#[test]
fn withdraw_is_fifo_and_leaves_later_rows_untouched() {
    let (engine, table) = engine_with_table();
    ingest(&engine, "A", "u1|p1\nu2|p2\nu3|p3");
    ingest(&engine, "B", "u4|p4\nu5|p5");

    let outcome = withdraw(&engine, 3);
    let receipt = outcome.receipt().expect("expected fulfilled withdrawal");

    assert_eq!(
        receipt.payloads,
        vec!["u1|p1||||", "u2|p2||||", "u3|p3||||"]
    );

    let notes = stock_notes(&table);
    assert!(notes[0].starts_with("Taken "));
    assert!(notes[1].starts_with("Taken "));
    assert!(notes[2].starts_with("Taken "));
    assert_eq!(notes[3], "New");
    assert_eq!(notes[4], "New");
}

#[test]
fn withdraw_grants_at_most_the_available_count() {
    let (engine, _table) = engine_with_table();
    ingest(&engine, "A", "u1|p1\nu2|p2");

    let receipt = withdraw(&engine, 10).receipt().cloned().unwrap();
    assert_eq!(receipt.granted(), 2);

    let counts = engine.counts().unwrap();
    assert_eq!(counts.available, 0);
    assert_eq!(counts.taken, 2);
}

#[test]
fn withdraw_exhaustion_is_idempotent() {
    let (engine, _table) = engine_with_table();
    ingest(&engine, "A", "u1|p1");

    assert!(withdraw(&engine, 1).receipt().is_some());

    // Withdrawing from an exhausted pool keeps reporting exhaustion,
    // never an error and never a partial grant.
    for _ in 0..3 {
        assert!(withdraw(&engine, 1).is_exhausted());
    }
}

#[test]
fn withdraw_from_empty_table_is_exhausted() {
    let (engine, _table) = engine_with_table();
    assert!(withdraw(&engine, 5).is_exhausted());
}

#[test]
fn withdraw_keyword_filters_case_insensitively() {
    let (engine, table) = engine_with_table();
    ingest(&engine, "Mexico 27/12", "mx1|p1\nmx2|p2");
    ingest(&engine, "US 27/12", "us1|p1");

    let receipt = withdraw_keyword(&engine, 10, "MEXICO")
        .receipt()
        .cloned()
        .unwrap();
    assert_eq!(receipt.payloads, vec!["mx1|p1||||", "mx2|p2||||"]);
    assert_eq!(receipt.keyword.as_deref(), Some("MEXICO"));

    // The US row is untouched and still available.
    let notes = stock_notes(&table);
    assert_eq!(notes[2], "New");
    assert!(withdraw_keyword(&engine, 1, "mexico").is_exhausted());
}

#[test]
fn withdraw_keyword_never_grants_a_non_matching_row() {
    let (engine, _table) = engine_with_table();
    ingest(&engine, "Plain", "u1|p1|mexico-mail|x|y|z\nu2|p2|other|x|y|z");

    let receipt = withdraw_keyword(&engine, 10, "Mexico")
        .receipt()
        .cloned()
        .unwrap();

    for payload in &receipt.payloads {
        assert!(payload.to_lowercase().contains("mexico"));
    }
    assert_eq!(receipt.granted(), 1);
}

#[test]
fn withdraw_skips_rows_with_foreign_stock_notes() {
    let (engine, table) = engine_with_table();
    ingest(&engine, "A", "u1|p1\nu2|p2");

    // An operator hand-edited the first row's note; it no longer parses,
    // so the withdrawal path must not touch it.
    let rows = table.read_all().unwrap();
    let first_data = rows.len() - 2;
    table
        .compare_and_swap(
            CellAddr::new((first_data + 1) as u32, Column::StockNote),
            "New",
            "Reserved for audit",
        )
        .unwrap();

    let receipt = withdraw(&engine, 2).receipt().cloned().unwrap();
    assert_eq!(receipt.payloads, vec!["u2|p2||||"]);

    let notes = stock_notes(&table);
    assert_eq!(notes[0], "Reserved for audit");
}

#[test]
fn withdraw_normalizes_short_rows_from_the_store() {
    // Rows hand-written in the remote sheet can be shorter than the
    // canonical column count. A data row whose stock-note cell is missing
    // entirely has no parseable note and stays invisible to withdrawal.
    let short = vec![String::new(), "short-row".to_string()];

    let mut full = schema::blank_row();
    full[Column::Identifier.index()] = "full".to_string();
    full[Column::RawPayload.index()] = "full|p||||".to_string();
    full[Column::StockNote.index()] = "New".to_string();

    let table = Arc::new(InMemoryTable::with_rows(vec![
        schema::header_row(),
        short,
        full,
    ]));
    let engine = StockEngine::new(table.clone(), Arc::new(FixedProbe::default()));

    let receipt = withdraw(&engine, 5).receipt().cloned().unwrap();
    assert_eq!(receipt.payloads, vec!["full|p||||"]);

    let counts = engine.counts().unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.taken, 1);
}

#[test]
fn withdraw_taken_markers_parse_back() {
    let (engine, table) = engine_with_table();
    ingest(&engine, "A", "u1|p1");
    withdraw(&engine, 1).receipt().unwrap();

    let notes = stock_notes(&table);
    let note = StockNote::parse(&notes[0]).expect("taken marker must parse");
    assert!(matches!(note, StockNote::Taken { by: None, .. }));
}

#[test]
fn concurrent_withdrawals_never_double_grant() {
    // Two concurrent quantity-1 withdrawals over a single eligible row:
    // exactly one succeeds, the other reports exhaustion.
    for _ in 0..50 {
        let table = Arc::new(InMemoryTable::new());
        let engine = StockEngine::new(table.clone(), Arc::new(FixedProbe::default()));
        ingest(&engine, "Race", "solo|secret");

        let mut handles = Vec::new();
        for _ in 0..2 {
            let engine = engine.clone();
            handles.push(thread::spawn(move || withdraw(&engine, 1)));
        }

        let outcomes: Vec<WithdrawOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let fulfilled = outcomes.iter().filter(|o| o.receipt().is_some()).count();
        let exhausted = outcomes.iter().filter(|o| o.is_exhausted()).count();
        assert_eq!(fulfilled, 1);
        assert_eq!(exhausted, 1);

        let counts = engine.counts().unwrap();
        assert_eq!(counts.taken, 1);
        assert_eq!(counts.available, 0);
    }
}

#[test]
fn concurrent_withdrawals_split_a_larger_pool() {
    let table = Arc::new(InMemoryTable::new());
    let engine = StockEngine::new(table.clone(), Arc::new(FixedProbe::default()));
    ingest(&engine, "Pool", "u1|p\nu2|p\nu3|p\nu4|p\nu5|p\nu6|p");

    let mut handles = Vec::new();
    for _ in 0..3 {
        let engine = engine.clone();
        handles.push(thread::spawn(move || withdraw(&engine, 2)));
    }

    let mut granted: Vec<String> = Vec::new();
    for handle in handles {
        if let WithdrawOutcome::Fulfilled(receipt) = handle.join().unwrap() {
            granted.extend(receipt.payloads);
        }
    }

    // Six rows, six grants, no payload handed out twice.
    granted.sort();
    let before = granted.len();
    granted.dedup();
    assert_eq!(granted.len(), before);
    assert_eq!(granted.len(), 6);

    let counts = engine.counts().unwrap();
    assert_eq!(counts.available, 0);
    assert_eq!(counts.taken, 6);
}

#[test]
fn withdraw_records_operator_in_receipt_and_marker() {
    let table = Arc::new(InMemoryTable::new());
    let engine = StockEngine::with_config(
        table.clone(),
        Arc::new(FixedProbe::default()),
        EngineConfig {
            operator: Some("ops-7".to_string()),
            ..EngineConfig::default()
        },
    );
    ingest(&engine, "A", "u1|p1");

    let receipt = withdraw(&engine, 1).receipt().cloned().unwrap();
    assert_eq!(receipt.operator.as_deref(), Some("ops-7"));

    let notes = stock_notes(&table);
    assert!(notes[0].ends_with("(ops-7)"));
}
