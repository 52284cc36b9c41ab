//! Many threads sharing one signer.

use chrono::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tessera::{BRANCA, Signer};

#[test]
fn test_concurrent_sign_verify() {
    const THREADS: usize = 16;
    const RUN_FOR: std::time::Duration = std::time::Duration::from_millis(500);

    let signer = Arc::new(
        Signer::new(
            BRANCA,
            b"0123456789abcdef0123456789abcdef",
            Duration::minutes(1),
        )
        .unwrap(),
    );
    let cycles = AtomicUsize::new(0);
    let start = Instant::now();

    std::thread::scope(|scope| {
        for id in 0..THREADS {
            let signer = Arc::clone(&signer);
            let cycles = &cycles;
            scope.spawn(move || {
                let input = format!("hello world from {id}");
                while start.elapsed() < RUN_FOR {
                    let token = signer.sign(input.as_bytes()).unwrap();
                    let opened = signer.verify(&token).unwrap();
                    assert_eq!(opened, input.as_bytes());
                    cycles.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert!(cycles.load(Ordering::Relaxed) >= THREADS);
}

#[test]
fn test_signer_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Signer>();
}
