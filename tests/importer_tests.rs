// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use smartledger::{
    cli,
    commands::importer,
    db,
    errors::ImportError,
    models::{Budget, Category, ConsumptionObject, Platform, Transaction},
    store::LedgerStore,
    transfer::{ImportMode, parse_import, plan_import},
};
use std::io::Write;
use tempfile::NamedTempFile;

fn tx(id: &str, amount: &str) -> Transaction {
    Transaction {
        id: id.into(),
        date: "2024-05-01".into(),
        time: None,
        amount: amount.parse().unwrap(),
        merchant: format!("Shop {}", id),
        description: String::new(),
        platform: Platform::Alipay,
        category: Category::DailySupplies,
        consumption_object: ConsumptionObject::Myself,
        note: String::new(),
        original_image: None,
    }
}

fn budget(category: Category, limit: i64) -> Budget {
    Budget {
        category,
        limit: Decimal::from(limit),
    }
}

fn store() -> LedgerStore {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    LedgerStore::open(conn)
}

fn ids(store: &LedgerStore) -> Vec<String> {
    store.transactions().iter().map(|t| t.id.clone()).collect()
}

fn write_doc(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file.flush().unwrap();
    file
}

fn run_import(store: &mut LedgerStore, path: &str, mode: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().get_matches_from(["smartledger", "import", "--path", path, "--mode", mode]);
    if let Some(("import", m)) = matches.subcommand() {
        importer::handle(store, m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn accepts_current_object_shape() {
    let doc = parse_import(
        r#"{"transactions":[{"id":"a","date":"2024-05-01","amount":12.5,"merchant":"M","description":"D",
            "platform":"微信支付","category":"餐饮","consumptionObject":"自己","note":""}],
            "budgets":[{"category":"餐饮","limit":1000}]}"#,
    )
    .unwrap();
    assert_eq!(doc.transactions.len(), 1);
    assert_eq!(doc.transactions[0].platform, Platform::WeChat);
    assert_eq!(doc.transactions[0].amount, Decimal::new(125, 1));
    assert_eq!(doc.budgets, vec![budget(Category::Food, 1000)]);
}

#[test]
fn accepts_legacy_bare_array_without_budgets() {
    let doc = parse_import(
        r#"[{"id":"a","date":"2024-05-01","amount":3,"merchant":"M","description":"",
             "platform":"银行卡","category":"交通"}]"#,
    )
    .unwrap();
    assert_eq!(doc.transactions.len(), 1);
    assert_eq!(
        doc.transactions[0].consumption_object,
        ConsumptionObject::Myself
    );
    assert!(doc.budgets.is_empty());
}

#[test]
fn unknown_labels_fall_back_leniently() {
    let doc = parse_import(
        r#"[{"id":"a","date":"2024-05-01","amount":3,"platform":"PayPal","category":"Rent"}]"#,
    )
    .unwrap();
    assert_eq!(doc.transactions[0].platform, Platform::Other);
    assert_eq!(doc.transactions[0].category, Category::Other);
}

#[test]
fn error_kinds_are_distinct() {
    assert!(matches!(parse_import("{not json"), Err(ImportError::Malformed(_))));
    assert!(matches!(
        parse_import(r#"{"items": []}"#),
        Err(ImportError::UnrecognizedShape(_))
    ));
    assert!(matches!(parse_import("42"), Err(ImportError::UnrecognizedShape(_))));
    assert!(matches!(
        parse_import(r#"{"transactions": [], "budgets": []}"#),
        Err(ImportError::NoData)
    ));
    assert!(matches!(parse_import("[]"), Err(ImportError::NoData)));
}

#[test]
fn budgets_only_document_is_valid() {
    let doc = parse_import(r#"{"transactions": [], "budgets": [{"category":"医疗","limit":200}]}"#)
        .unwrap();
    assert!(doc.transactions.is_empty());
    assert_eq!(doc.budgets, vec![budget(Category::Medical, 200)]);
}

#[test]
fn append_skips_existing_ids() {
    let mut store = store();
    store.replace_transactions(vec![tx("t2", "20"), tx("t4", "40")]);
    let before: Vec<Transaction> = store.transactions().to_vec();

    let mut changed = tx("t2", "999");
    changed.merchant = "Imported copy".into();
    let incoming = vec![tx("t1", "10"), changed, tx("t3", "30"), tx("t4", "40"), tx("t5", "50")];
    let file = write_doc(&json!({ "transactions": incoming }));
    run_import(&mut store, file.path().to_str().unwrap(), "append").unwrap();

    assert_eq!(ids(&store), vec!["t2", "t4", "t1", "t3", "t5"]);
    assert_eq!(&store.transactions()[..2], before.as_slice());
}

#[test]
fn append_still_replaces_budgets() {
    let mut store = store();
    store.set_budgets(vec![budget(Category::Food, 1000), budget(Category::Transport, 200)]);
    let file = write_doc(&json!({
        "transactions": [tx("n1", "5")],
        "budgets": [{"category": "教育", "limit": 800}]
    }));
    run_import(&mut store, file.path().to_str().unwrap(), "append").unwrap();
    assert_eq!(store.budgets(), &[budget(Category::Education, 800)]);
}

#[test]
fn overwrite_replaces_everything() {
    let mut store = store();
    store.replace_transactions((0..7).map(|i| tx(&format!("old{}", i), "1")).collect());
    store.set_budgets(vec![budget(Category::Medical, 50)]);

    let file = write_doc(&json!({
        "transactions": [tx("a", "1"), tx("b", "2"), tx("c", "3")],
        "budgets": [{"category": "餐饮", "limit": 1000}, {"category": "交通", "limit": 300}]
    }));
    run_import(&mut store, file.path().to_str().unwrap(), "overwrite").unwrap();

    assert_eq!(ids(&store), vec!["a", "b", "c"]);
    assert_eq!(
        store.budgets(),
        &[budget(Category::Food, 1000), budget(Category::Transport, 300)]
    );
}

#[test]
fn legacy_overwrite_keeps_budgets() {
    let mut store = store();
    store.replace_transactions(vec![tx("old", "1")]);
    store.set_budgets(vec![budget(Category::Food, 1000)]);

    let file = write_doc(&json!([tx("x", "1"), tx("y", "2")]));
    run_import(&mut store, file.path().to_str().unwrap(), "overwrite").unwrap();

    assert_eq!(ids(&store), vec!["x", "y"]);
    assert_eq!(store.budgets(), &[budget(Category::Food, 1000)]);
}

#[test]
fn rejected_documents_leave_ledger_untouched() {
    let mut store = store();
    store.replace_transactions(vec![tx("keep", "1")]);
    store.set_budgets(vec![budget(Category::Food, 100)]);
    let before = store.snapshot();

    let empty = write_doc(&json!({"transactions": [], "budgets": []}));
    assert!(run_import(&mut store, empty.path().to_str().unwrap(), "overwrite").is_err());

    let mut broken = NamedTempFile::new().unwrap();
    write!(broken, "{{\"transactions\": [").unwrap();
    broken.flush().unwrap();
    assert!(run_import(&mut store, broken.path().to_str().unwrap(), "overwrite").is_err());

    assert_eq!(store.snapshot(), before);
}

#[test]
fn overwrite_collapses_repeated_ids_in_document() {
    let current = store().snapshot();
    let doc = parse_import(&json!([tx("dup", "1"), tx("dup", "2"), tx("z", "3")]).to_string())
        .unwrap();
    let plan = plan_import(&current, doc, ImportMode::Overwrite);
    assert_eq!(plan.added, 2);
    assert_eq!(plan.skipped, 1);
    assert_eq!(plan.next.transactions[0].amount, Decimal::ONE);
}

#[test]
fn import_mode_parses() {
    assert_eq!("Append".parse::<ImportMode>().unwrap(), ImportMode::Append);
    assert_eq!("overwrite".parse::<ImportMode>().unwrap(), ImportMode::Overwrite);
    assert!("merge".parse::<ImportMode>().is_err());
}
