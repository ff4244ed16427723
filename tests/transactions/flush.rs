//! Flush operations and their effect on watchers

use crate::common::*;

#[test]
fn flush_inside_transaction_changes_later_reads() {
    let db = shared_db();
    db.set(NS, "k", "v");

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.multi().unwrap();
    s.execute(Command::get("k")).unwrap();
    s.execute(Command::FlushAll).unwrap();
    s.execute(Command::get("k")).unwrap();

    assert_eq!(
        s.exec().unwrap(),
        vec![
            Ok(Output::Maybe(Some(Value::from("v")))),
            Ok(Output::Unit),
            Ok(Output::Maybe(None)),
        ]
    );
    assert!(read_str(&db, NS, "k").is_none());
}

#[test]
fn flush_all_conflicts_watchers_in_every_namespace() {
    let db = shared_db();
    let other = NamespaceId::new(5);
    db.set(NS, "a", "1");

    let mut s0 = Session::new(db.clone());
    s0.begin_transaction().unwrap();
    s0.watch("a").unwrap();
    s0.multi().unwrap();

    let mut s5 = Session::new(db.clone());
    s5.select(NamespaceId::new(5)).unwrap();
    s5.begin_transaction().unwrap();
    s5.watch("never-written").unwrap();
    s5.multi().unwrap();

    db.flush_all();

    assert!(matches!(s0.exec(), Err(Error::Conflict { .. })));
    assert!(matches!(s5.exec(), Err(Error::Conflict { .. })));
    assert_eq!(db.db_size(other), 0);
}

#[test]
fn flush_namespace_conflicts_only_that_namespace() {
    let db = shared_db();
    db.set(NS, "k", "zero");
    db.set(NamespaceId::new(1), "k", "one");

    let mut s0 = Session::new(db.clone());
    s0.begin_transaction().unwrap();
    s0.watch("k").unwrap();
    s0.multi().unwrap();
    s0.execute(Command::set("k", "zero-2")).unwrap();

    let mut s1 = Session::new(db.clone());
    s1.select(NamespaceId::new(1)).unwrap();
    s1.begin_transaction().unwrap();
    s1.watch("k").unwrap();
    s1.multi().unwrap();
    s1.execute(Command::set("k", "one-2")).unwrap();

    db.flush_namespace(NamespaceId::new(1));

    assert!(s0.exec().is_ok());
    assert!(matches!(s1.exec(), Err(Error::Conflict { .. })));
    assert_eq!(read_str(&db, NS, "k").as_deref(), Some("zero-2"));
    assert!(read_str(&db, NamespaceId::new(1), "k").is_none());
}

#[test]
fn flush_of_empty_namespace_still_conflicts() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("k").unwrap();
    s.multi().unwrap();

    db.flush_namespace(NS);

    assert!(matches!(s.exec(), Err(Error::Conflict { .. })));
}

#[test]
fn versions_continue_across_flushes() {
    let db = shared_db();
    db.set(NS, "k", "1");
    db.set(NS, "k", "2");
    assert_eq!(version_of(&db, NS, "k"), 2);

    db.flush_all();
    assert_eq!(version_of(&db, NS, "k"), 2);
    assert_eq!(db.set(NS, "k", "3"), 3);

    db.flush_namespace(NS);
    let first = db.set(NS, "k", "4");
    db.flush_namespace(NS);
    let second = db.set(NS, "k", "5");
    assert!(second > first, "{second} > {first}");
}
