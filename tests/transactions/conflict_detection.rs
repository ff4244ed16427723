//! Conflict detection on watched keys

use crate::common::*;

#[test]
fn balance_modified_by_other_session_conflicts() {
    let db = shared_db();
    db.set(NS, "balance", "100");

    let mut a = Session::new(db.clone());
    let mut b = Session::new(db.clone());

    a.begin_transaction().unwrap();
    a.watch("balance").unwrap();
    b.begin_transaction().unwrap();
    b.watch("balance").unwrap();

    a.multi().unwrap();
    a.execute(Command::decr_by("balance", 30)).unwrap();
    a.execute(Command::incr_by("other", 30)).unwrap();

    // B writes outside its transaction before A commits
    b.discard().unwrap();
    b.execute(Command::set("balance", "250")).unwrap();

    match a.exec() {
        Err(Error::Conflict { keys }) => assert_eq!(keys, vec!["balance".to_string()]),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert_eq!(read_str(&db, NS, "balance").as_deref(), Some("250"));
    assert!(read_str(&db, NS, "other").is_none());
}

#[test]
fn unchanged_watch_commits() {
    let db = shared_db();
    db.set(NS, "balance", "100");
    db.set(NS, "unrelated", "x");

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("balance").unwrap();
    s.multi().unwrap();
    s.execute(Command::decr_by("balance", 30)).unwrap();

    // A write to a key nobody watches does not conflict
    db.set(NS, "unrelated", "y");

    assert_eq!(s.exec().unwrap(), vec![Ok(Output::Int(70))]);
    assert_eq!(read_int(&db, NS, "balance"), Some(70));
}

#[test]
fn set_to_same_value_still_conflicts() {
    let db = shared_db();
    db.set(NS, "k", "same");

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("k").unwrap();
    s.multi().unwrap();
    s.execute(Command::set("k", "mine")).unwrap();

    db.set(NS, "k", "same");

    assert!(matches!(s.exec(), Err(Error::Conflict { .. })));
    assert_eq!(read_str(&db, NS, "k").as_deref(), Some("same"));
}

#[test]
fn delete_and_recreate_conflicts() {
    let db = shared_db();
    db.set(NS, "k", "v1");

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("k").unwrap();
    s.multi().unwrap();
    s.execute(Command::set("k", "mine")).unwrap();

    assert!(db.delete(NS, &Key::from("k")));
    db.set(NS, "k", "v1");

    assert!(matches!(s.exec(), Err(Error::Conflict { .. })));
    assert_eq!(read_str(&db, NS, "k").as_deref(), Some("v1"));
}

#[test]
fn watching_absent_key_conflicts_on_creation() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("lock").unwrap();
    s.multi().unwrap();
    s.execute(Command::set("lock", "mine")).unwrap();

    db.set(NS, "lock", "theirs");

    assert!(matches!(s.exec(), Err(Error::Conflict { .. })));
    assert_eq!(read_str(&db, NS, "lock").as_deref(), Some("theirs"));
}

#[test]
fn deleting_absent_key_does_not_conflict() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("ghost").unwrap();
    s.multi().unwrap();
    s.execute(Command::set("ghost", "now")).unwrap();

    assert!(!db.delete(NS, &Key::from("ghost")));

    assert!(s.exec().is_ok());
    assert_eq!(read_str(&db, NS, "ghost").as_deref(), Some("now"));
}

#[test]
fn conflict_lists_every_changed_key() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("a").unwrap();
    s.watch("b").unwrap();
    s.watch("c").unwrap();
    s.multi().unwrap();

    db.set(NS, "a", "1");
    db.set(NS, "c", "1");

    match s.exec() {
        Err(Error::Conflict { mut keys }) => {
            keys.sort();
            assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);
        }
        other => panic!("expected Conflict, got {:?}", other),
    }
}

#[test]
fn conflict_is_counted_as_abort() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("k").unwrap();
    s.multi().unwrap();
    db.set(NS, "k", "v");
    assert!(s.exec().is_err());

    let metrics = db.metrics();
    assert_eq!(metrics.total_started, 1);
    assert_eq!(metrics.total_aborted, 1);
    assert_eq!(metrics.total_committed, 0);
    assert_eq!(metrics.active_count, 0);
}
