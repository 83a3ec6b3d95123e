//! Round-trip tests against the SQLite backend
//!
//! Every kind must come back exactly as stored, absence must be `Ok(None)`
//! rather than an error, and values must survive a close/reopen cycle.

use shelfdb::store::{SqliteStore, Store};
use shelfdb::value::Value;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SqliteStore {
    Store::open(dir.path().join("shelf.db")).unwrap()
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::Int(-42),
        Value::String("hello".into()),
        Value::Float(3.25),
        Value::Bool(true),
        Value::SliceInt(vec![1, 2, 3]),
        Value::SliceString(vec!["a".into(), "b".into()]),
        Value::SliceFloat(vec![0.5, 1.5, 2.5]),
        Value::SliceBool(vec![true, false, true]),
    ]
}

#[test]
fn every_kind_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    for (i, value) in sample_values().iter().enumerate() {
        let key = format!("key{}", i);
        store.set(&key, value).unwrap();
        assert_eq!(store.get(&key).unwrap().as_ref(), Some(value), "kind {:?}", value.kind());
    }
}

#[test]
fn missing_key_is_none_not_error() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    assert_eq!(store.get("missing").unwrap(), None);
    assert!(!store.contains("missing").unwrap());
}

#[test]
fn overwrite_replaces_the_value() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.set("k", &Value::Int(1)).unwrap();
    store.set("k", &Value::Int(2)).unwrap();
    assert_eq!(store.get("k").unwrap(), Some(Value::Int(2)));
}

#[test]
fn values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shelf.db");
    {
        let store: SqliteStore = Store::open(&path).unwrap();
        store.set("kept", &Value::SliceInt(vec![4, 5])).unwrap();
    }
    let store: SqliteStore = Store::open(&path).unwrap();
    assert_eq!(store.get("kept").unwrap(), Some(Value::SliceInt(vec![4, 5])));
}

#[test]
fn empty_key_is_not_special_cased() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.set("", &Value::Int(7)).unwrap();
    assert_eq!(store.get("").unwrap(), Some(Value::Int(7)));
}

#[test]
fn get_all_returns_every_logical_key() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.set("a", &Value::Int(1)).unwrap();
    store.set("b", &Value::SliceString(vec!["x".into()])).unwrap();
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["a"], Value::Int(1));
    assert_eq!(all["b"], Value::SliceString(vec!["x".into()]));
}
