//! Namespace isolation across sessions

use crate::common::*;

#[test]
fn same_key_in_different_namespaces_is_independent() {
    let db = shared_db();
    let mut s = Session::new(db.clone());

    s.execute(Command::set("k", "zero")).unwrap();
    s.select(NamespaceId::new(1)).unwrap();
    s.execute(Command::set("k", "one")).unwrap();

    assert_eq!(read_str(&db, NS, "k").as_deref(), Some("zero"));
    assert_eq!(read_str(&db, NamespaceId::new(1), "k").as_deref(), Some("one"));
    assert_eq!(db.db_size(NS), 1);
    assert_eq!(db.db_size(NamespaceId::new(1)), 1);
}

#[test]
fn write_in_other_namespace_does_not_conflict() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch("k").unwrap();
    s.multi().unwrap();
    s.execute(Command::set("k", "mine")).unwrap();

    db.set(NamespaceId::new(3), "k", "elsewhere");

    assert!(s.exec().is_ok());
}

#[test]
fn watch_in_explicit_namespace() {
    let db = shared_db();

    let mut s = Session::new(db.clone());
    s.begin_transaction().unwrap();
    s.watch_in(NamespaceId::new(2), "k").unwrap();
    s.multi().unwrap();

    db.set(NamespaceId::new(2), "k", "changed");

    assert!(matches!(s.exec(), Err(Error::Conflict { .. })));
}

#[test]
fn namespace_limit_comes_from_config() {
    init_tracing();
    let config = WatchKvConfig {
        namespaces: 2,
        ..Default::default()
    };
    let db = std::sync::Arc::new(Database::with_config(config).unwrap());
    let mut s = Session::new(db);

    assert!(s.select(NamespaceId::new(1)).is_ok());
    assert!(matches!(
        s.select(NamespaceId::new(2)),
        Err(Error::InvalidNamespace { namespace: 2, limit: 2 })
    ));
    assert!(s.begin_transaction().is_ok());
    assert!(matches!(
        s.watch_in(NamespaceId::new(9), "k"),
        Err(Error::InvalidNamespace { .. })
    ));
}
