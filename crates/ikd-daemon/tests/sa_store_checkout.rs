//! Checkout/checkin concurrency behavior of the SA store.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{add_session_with_child, child_key};
use ikd_core::rekey::RekeyPolicy;
use ikd_core::sa::{IkeSaId, SaState};
use ikd_daemon::sa_store::SaStore;

/// Racing checkouts of the same key serialize: at no point do two threads
/// hold the handle simultaneously, and no usage update is lost.
#[test]
fn racing_checkouts_on_same_key_serialize() {
    let store = Arc::new(SaStore::new());
    add_session_with_child(
        &store,
        IkeSaId::new(1, 2),
        SaState::Established,
        0x10,
        RekeyPolicy::Always,
    );

    const THREADS: usize = 8;
    const ITERATIONS: usize = 50;
    let holders = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let holders = Arc::clone(&holders);
            thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    let mut session = store.checkout_child(&child_key(0x10)).unwrap();
                    assert_eq!(holders.fetch_add(1, Ordering::SeqCst), 0, "handle held twice");
                    session.child_mut().unwrap().record_usage(1, 1);
                    holders.fetch_sub(1, Ordering::SeqCst);
                    drop(session);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let session = store.checkout_child(&child_key(0x10)).unwrap();
    let usage = session.child().unwrap().usage();
    assert_eq!(usage.bytes, (THREADS * ITERATIONS) as u64);
    assert_eq!(usage.packets, (THREADS * ITERATIONS) as u64);
}

/// A contended checkout blocks until the holder checks in, and checkin is
/// the handle drop.
#[test]
fn checkout_blocks_until_checkin() {
    let store = Arc::new(SaStore::new());
    add_session_with_child(
        &store,
        IkeSaId::new(1, 2),
        SaState::Established,
        0x10,
        RekeyPolicy::Always,
    );

    let held = store.checkout_child(&child_key(0x10)).unwrap();

    let (acquired_tx, acquired_rx) = mpsc::channel();
    let contender = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let session = store.checkout_child(&child_key(0x10)).unwrap();
            acquired_tx.send(()).unwrap();
            drop(session);
        })
    };

    // Still held here, so the contender must not get through.
    assert!(acquired_rx.recv_timeout(Duration::from_millis(200)).is_err());

    drop(held);
    assert!(acquired_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    contender.join().unwrap();
}

/// Checkouts of distinct keys never contend, including tunnel keys owned by
/// distinct sessions.
#[test]
fn distinct_keys_do_not_block_each_other() {
    let store = Arc::new(SaStore::new());
    add_session_with_child(
        &store,
        IkeSaId::new(1, 2),
        SaState::Established,
        0x10,
        RekeyPolicy::Always,
    );
    add_session_with_child(
        &store,
        IkeSaId::new(3, 4),
        SaState::Established,
        0x20,
        RekeyPolicy::Always,
    );

    let held = store.checkout_child(&child_key(0x10)).unwrap();

    // Must complete while the first session is still checked out.
    let (done_tx, done_rx) = mpsc::channel();
    let other = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let session = store.checkout_child(&child_key(0x20)).unwrap();
            assert_eq!(session.id(), IkeSaId::new(3, 4));
            done_tx.send(()).unwrap();
        })
    };
    assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    other.join().unwrap();
    drop(held);
}

/// Two tunnels under the same session share that session's lock: work on
/// one serializes with work on the other.
#[test]
fn siblings_under_one_session_serialize() {
    let store = Arc::new(SaStore::new());
    add_session_with_child(
        &store,
        IkeSaId::new(1, 2),
        SaState::Established,
        0x10,
        RekeyPolicy::Always,
    );
    store
        .register_child(
            IkeSaId::new(1, 2),
            ikd_core::sa::ChildSa::new(child_key(0x11), common::child_config(RekeyPolicy::Always)),
        )
        .unwrap();

    let held = store.checkout_child(&child_key(0x10)).unwrap();

    let (acquired_tx, acquired_rx) = mpsc::channel();
    let sibling = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let session = store.checkout_child(&child_key(0x11)).unwrap();
            acquired_tx.send(()).unwrap();
            drop(session);
        })
    };
    assert!(acquired_rx.recv_timeout(Duration::from_millis(200)).is_err());

    drop(held);
    assert!(acquired_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    sibling.join().unwrap();
}

/// Checkout of a key that was never registered reports not-found without
/// blocking.
#[test]
fn unknown_key_is_not_found() {
    let store = SaStore::new();
    assert!(store.checkout_child(&child_key(0x99)).is_none());
}
