// Integration tests for the queue exclusion boundary
// Appends racing drains must never lose or duplicate a command

use cmdgate_store::QueueStore;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const WRITERS: usize = 4;
const PER_WRITER: usize = 25;

#[test]
fn test_append_concurrent_with_drain_is_never_lost() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(QueueStore::open(dir.path().join("commands.json")).unwrap());
    let writers_done = Arc::new(AtomicBool::new(false));

    let drainer = {
        let store = Arc::clone(&store);
        let writers_done = Arc::clone(&writers_done);
        thread::spawn(move || {
            let mut drained = Vec::new();
            loop {
                let finished = writers_done.load(Ordering::SeqCst);
                drained.extend(store.snapshot_and_clear());
                if finished {
                    break;
                }
                thread::yield_now();
            }
            drained
        })
    };

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    store.append(&format!("PRINT: w{w}-{i}")).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    writers_done.store(true, Ordering::SeqCst);

    let drained = drainer.join().unwrap();
    let unique: BTreeSet<_> = drained.iter().cloned().collect();

    assert_eq!(drained.len(), WRITERS * PER_WRITER);
    assert_eq!(unique.len(), WRITERS * PER_WRITER);
    assert!(store.peek().is_empty());
}

#[test]
fn test_drain_preserves_per_writer_order() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(QueueStore::open(dir.path().join("commands.json")).unwrap());

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..50 {
                store.append(&format!("PRINT: {i}")).unwrap();
            }
        })
    };

    let mut drained = Vec::new();
    while !writer.is_finished() {
        drained.extend(store.snapshot_and_clear());
    }
    writer.join().unwrap();
    drained.extend(store.snapshot_and_clear());

    let expected: Vec<String> = (0..50).map(|i| format!("PRINT: {i}")).collect();
    assert_eq!(drained, expected);
}

#[test]
fn test_two_handles_share_one_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("commands.json");

    let writer = QueueStore::open(&path).unwrap();
    writer.append("PRINT: from writer").unwrap();

    let reader = QueueStore::open(&path).unwrap();
    assert_eq!(reader.peek(), vec!["PRINT: from writer"]);
}

#[test]
fn test_independent_handles_racing_lose_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("commands.json");
    let writer = QueueStore::open(&path).unwrap();
    let drainer = QueueStore::open(&path).unwrap();
    let writer_done = AtomicBool::new(false);

    let drained = thread::scope(|scope| {
        let drain = scope.spawn(|| {
            let mut drained = Vec::new();
            loop {
                let finished = writer_done.load(Ordering::SeqCst);
                drained.extend(drainer.snapshot_and_clear());
                if finished {
                    break;
                }
            }
            drained
        });

        for i in 0..400 {
            writer.append(&format!("PRINT: {i}")).unwrap();
        }
        writer_done.store(true, Ordering::SeqCst);

        drain.join().unwrap()
    });

    let expected: Vec<String> = (0..400).map(|i| format!("PRINT: {i}")).collect();
    assert_eq!(drained, expected);
    assert!(writer.peek().is_empty());
}

#[test]
fn test_independent_handles_appending_keep_every_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("commands.json");

    thread::scope(|scope| {
        for w in 0..WRITERS {
            let path = path.clone();
            scope.spawn(move || {
                let store = QueueStore::open(&path).unwrap();
                for i in 0..PER_WRITER {
                    store.append(&format!("PRINT: w{w}-{i}")).unwrap();
                }
            });
        }
    });

    let store = QueueStore::open(&path).unwrap();
    let unique: BTreeSet<_> = store.peek().into_iter().collect();
    assert_eq!(unique.len(), WRITERS * PER_WRITER);
}
