//! Per-command failures inside EXEC under both policies

use crate::common::*;

fn queue_mixed(s: &mut Session) {
    s.begin_transaction().unwrap();
    s.multi().unwrap();
    s.execute(Command::set("a", "1")).unwrap();
    s.execute(Command::incr_by("text", 1)).unwrap();
    s.execute(Command::set("b", "2")).unwrap();
}

#[test]
fn continue_policy_records_errors_inline() {
    let db = db_with_policy(CommandErrorPolicy::Continue);
    db.set(NS, "text", "hello");

    let mut s = Session::new(db.clone());
    queue_mixed(&mut s);
    let results = s.exec().unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::NotAnInteger { .. })));
    assert!(results[2].is_ok());
    assert_eq!(read_str(&db, NS, "a").as_deref(), Some("1"));
    assert_eq!(read_str(&db, NS, "b").as_deref(), Some("2"));
    assert_eq!(db.metrics().total_committed, 1);
}

#[test]
fn abort_policy_rolls_back() {
    let db = db_with_policy(CommandErrorPolicy::Abort);
    db.set(NS, "text", "hello");
    let text_version = version_of(&db, NS, "text");

    let mut s = Session::new(db.clone());
    queue_mixed(&mut s);

    match s.exec() {
        Err(Error::CommandAborted { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected CommandAborted, got {:?}", other),
    }
    assert!(!s.in_transaction());
    assert!(read_str(&db, NS, "a").is_none());
    assert!(read_str(&db, NS, "b").is_none());
    assert_eq!(version_of(&db, NS, "a"), 0);
    assert_eq!(version_of(&db, NS, "text"), text_version);
    assert_eq!(db.metrics().total_aborted, 1);
}

#[test]
fn abort_policy_restores_flushed_data() {
    let db = db_with_policy(CommandErrorPolicy::Abort);
    db.set(NS, "keep", "me");
    db.set(NS, "text", "hello");
    let before = db.effective_version(NS, &Key::from("keep"));

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.multi().unwrap();
    s.execute(Command::FlushAll).unwrap();
    s.execute(Command::set("text", "again")).unwrap();
    s.execute(Command::incr_by("text", 1)).unwrap();

    assert!(matches!(s.exec(), Err(Error::CommandAborted { index: 2, .. })));
    assert_eq!(read_str(&db, NS, "keep").as_deref(), Some("me"));
    assert_eq!(read_str(&db, NS, "text").as_deref(), Some("hello"));
    assert_eq!(db.effective_version(NS, &Key::from("keep")), before);
}

#[test]
fn overflow_is_a_command_error() {
    let db = shared_db();
    db.set(NS, "n", i64::MAX.to_string());

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.multi().unwrap();
    s.execute(Command::incr_by("n", 1)).unwrap();

    let results = s.exec().unwrap();
    assert!(matches!(results[0], Err(Error::Overflow { .. })));
    assert_eq!(read_int(&db, NS, "n"), Some(i64::MAX));
}
