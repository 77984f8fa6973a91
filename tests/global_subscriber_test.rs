//! The archiving writer as output of the process-wide subscriber.
//!
//! Kept in its own test binary because the global default can be set only
//! once per process.

use ses_archiver::logging::{ArchiveWriter, ArchiverConfig, RotationFlags};
use std::fs;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_rotation_under_global_subscriber() {
    let dir = TempDir::new().unwrap();
    let config = ArchiverConfig::builder(dir.path())
        .prefix("global")
        .flags(RotationFlags::SIZE)
        .max_size(64)
        .build()
        .unwrap();
    let writer = ArchiveWriter::open(config).unwrap();

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(writer))
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .init();

    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        for n in 0..10 {
            tracing::info!(request = n, "request handled");
        }
        let _ = done_tx.send(());
    });

    assert!(
        done_rx.recv_timeout(Duration::from_secs(5)).is_ok(),
        "logging did not finish"
    );
    let archived = fs::read_to_string(dir.path().join("global.1.log")).unwrap();
    assert!(archived.contains("request handled"));
}
