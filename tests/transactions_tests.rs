// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use smartledger::{
    cli,
    commands::transactions,
    db,
    models::{Category, ConsumptionObject, Platform, Transaction},
    store::LedgerStore,
};

fn tx(id: &str, date: &str) -> Transaction {
    Transaction {
        id: id.into(),
        date: date.into(),
        time: None,
        amount: "10".parse().unwrap(),
        merchant: "P".into(),
        description: String::new(),
        platform: Platform::Cash,
        category: Category::Food,
        consumption_object: ConsumptionObject::Myself,
        note: String::new(),
        original_image: None,
    }
}

fn setup() -> LedgerStore {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let mut store = LedgerStore::open(conn);
    store.replace_transactions(vec![
        tx("t1", "2025-01-01"),
        tx("t3", "2025-01-03"),
        tx("t2", "2025-01-02"),
        tx("t0", "2024-12-31"),
    ]);
    store
}

fn run_tx(store: &mut LedgerStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["smartledger", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", m)) = matches.subcommand() {
        transactions::handle(store, m)
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let store = setup();
    let matches = cli::build_cli().get_matches_from(["smartledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[1].date, "2025-01-02");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_month_filter() {
    let store = setup();
    let matches =
        cli::build_cli().get_matches_from(["smartledger", "tx", "list", "--month", "2024-12"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].id, "t0");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn label_falls_back_to_merchant() {
    let mut t = tx("x", "2025-01-01");
    assert_eq!(t.label(), "P");
    t.description = "Latte".into();
    assert_eq!(t.label(), "Latte");
}

#[test]
fn edit_replaces_fields_but_not_id() {
    let mut store = setup();
    run_tx(
        &mut store,
        &[
            "edit",
            "t2",
            "--amount",
            "42.50",
            "--platform",
            "alipay",
            "--category",
            "医疗",
            "--object",
            "parents",
            "--time",
            "09:15",
            "--note",
            "size M",
        ],
    )
    .unwrap();
    let t = store.get("t2").unwrap();
    assert_eq!(t.amount, "42.5".parse::<rust_decimal::Decimal>().unwrap());
    assert_eq!(t.platform, Platform::Alipay);
    assert_eq!(t.category, Category::Medical);
    assert_eq!(t.consumption_object, ConsumptionObject::Parents);
    assert_eq!(t.time.as_deref(), Some("09:15"));
    assert_eq!(t.note, "size M");
    assert_eq!(t.date, "2025-01-02");
    assert_eq!(store.transactions().len(), 4);
}

#[test]
fn edit_rejects_bad_values_without_changes() {
    let mut store = setup();
    let before = store.snapshot();
    assert!(run_tx(&mut store, &["edit", "t2", "--date", "2025/01/02"]).is_err());
    assert!(run_tx(&mut store, &["edit", "t2", "--amount=-3"]).is_err());
    assert!(run_tx(&mut store, &["edit", "missing", "--note", "x"]).is_err());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn rm_with_yes_deletes_one() {
    let mut store = setup();
    run_tx(&mut store, &["rm", "t3", "--yes"]).unwrap();
    let ids: Vec<&str> = store.transactions().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t0"]);
    assert!(run_tx(&mut store, &["rm", "t3", "--yes"]).is_err());
}

#[test]
fn clear_with_yes_keeps_budgets() {
    let mut store = setup();
    store.set_budgets(vec![smartledger::models::Budget {
        category: Category::Food,
        limit: "100".parse().unwrap(),
    }]);
    run_tx(&mut store, &["clear", "--yes"]).unwrap();
    assert!(store.transactions().is_empty());
    assert_eq!(store.budgets().len(), 1);
}

#[test]
fn edited_amount_is_kept_to_the_cent_and_survives_backup() {
    let mut store = setup();
    run_tx(&mut store, &["edit", "t2", "--amount", "12.3456789012345678"]).unwrap();
    assert_eq!(
        store.get("t2").unwrap().amount,
        "12.35".parse::<rust_decimal::Decimal>().unwrap()
    );

    let text = smartledger::transfer::export_document(&store.snapshot()).unwrap();
    let doc = smartledger::transfer::parse_import(&text).unwrap();
    assert_eq!(doc.transactions, store.transactions());
}

#[test]
fn unpadded_month_and_time_are_normalised() {
    let store = setup();
    let matches =
        cli::build_cli().get_matches_from(["smartledger", "tx", "list", "--month", "2025-1"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 3);
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }

    let mut store = setup();
    run_tx(&mut store, &["edit", "t1", "--time", "9:05"]).unwrap();
    assert_eq!(store.get("t1").unwrap().time.as_deref(), Some("09:05"));
}
