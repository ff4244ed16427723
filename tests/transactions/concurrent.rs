//! Multi-threaded sessions against one shared database

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;

/// Move `amount` from one key to another, retrying on conflict
fn transfer(session: &mut Session, from: &str, to: &str, amount: i64) -> usize {
    let mut attempts = 0;
    loop {
        attempts += 1;
        session.begin_transaction().unwrap();
        session.watch(from).unwrap();
        session.watch(to).unwrap();
        session.multi().unwrap();
        session.execute(Command::decr_by(from, amount)).unwrap();
        session.execute(Command::incr_by(to, amount)).unwrap();
        match session.exec() {
            Ok(results) => {
                assert!(results.iter().all(|r| r.is_ok()));
                return attempts;
            }
            Err(Error::Conflict { .. }) => continue,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn concurrent_transfers_conserve_total() {
    let db = shared_db();
    db.set(NS, "a", "1000");
    db.set(NS, "b", "1000");

    let threads = 8;
    let per_thread = 25;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                barrier.wait();
                for _ in 0..per_thread {
                    if i % 2 == 0 {
                        transfer(&mut session, "a", "b", 3);
                    } else {
                        transfer(&mut session, "b", "a", 2);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let a = read_int(&db, NS, "a").unwrap();
    let b = read_int(&db, NS, "b").unwrap();
    assert_eq!(a + b, 2000);
    // 4 threads move 3 each way a->b, 4 threads move 2 b->a, 25 times each
    assert_eq!(a, 1000 - 4 * 25 * 3 + 4 * 25 * 2);

    let metrics = db.metrics();
    assert_eq!(metrics.total_committed, (threads * per_thread) as u64);
    assert_eq!(metrics.active_count, 0);
}

#[test]
fn exactly_one_of_racing_watchers_commits() {
    let db = shared_db();
    db.set(NS, "balance", "100");

    let threads = 6;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                session.begin_transaction().unwrap();
                session.watch("balance").unwrap();
                session.multi().unwrap();
                session
                    .execute(Command::set("balance", format!("winner-{i}")))
                    .unwrap();
                // Everyone has watched before anyone commits
                barrier.wait();
                session.exec().is_ok()
            })
        })
        .collect();

    let committed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(committed, 1);
    assert!(read_str(&db, NS, "balance").unwrap().starts_with("winner-"));
    assert_eq!(db.metrics().total_aborted, (threads - 1) as u64);
}

#[test]
fn direct_increments_are_not_lost() {
    let db = shared_db();
    let threads = 8;
    let per_thread = 200;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                barrier.wait();
                for _ in 0..per_thread {
                    session.execute(Command::incr_by("counter", 1)).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let total = (threads * per_thread) as i64;
    assert_eq!(read_int(&db, NS, "counter"), Some(total));
    assert_eq!(version_of(&db, NS, "counter"), total as u64);
}
