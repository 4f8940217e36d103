//! Concurrency tests for the messenger.
//!
//! These cover the producer/consumer rendezvous and the liveness guarantee of
//! `stop`: no receiver may be left blocked once the messenger is stopped.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use trafficmanager_messenger::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_receive_blocks_until_send() -> TestResult {
    let messenger = Arc::new(Messenger::<u64>::named("rendezvous"));
    let (done_tx, done_rx) = mpsc::channel();

    let consumer = {
        let messenger = Arc::clone(&messenger);
        thread::spawn(move || {
            let value = messenger.receive();
            let _ = done_tx.send(value);
        })
    };

    // The consumer has nothing to take yet.
    assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());

    messenger.send(99).map_err(|_| "send rejected")?;
    let received = done_rx.recv_timeout(RELEASE_TIMEOUT)?;
    assert_eq!(received, Ok(99));

    assert!(consumer.join().is_ok(), "consumer panicked");
    Ok(())
}

#[test]
fn test_stop_releases_blocked_receiver() -> TestResult {
    let messenger = Arc::new(Messenger::<u64>::named("teardown"));
    let (done_tx, done_rx) = mpsc::channel();

    let consumer = {
        let messenger = Arc::clone(&messenger);
        thread::spawn(move || {
            let _ = done_tx.send(messenger.receive());
        })
    };

    assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());

    messenger.stop();
    let result = done_rx.recv_timeout(RELEASE_TIMEOUT)?;
    assert_eq!(result, Err(ChannelError::Stopped));

    assert!(consumer.join().is_ok(), "consumer panicked");
    Ok(())
}

#[test]
fn test_stop_releases_every_blocked_receiver() -> TestResult {
    let messenger = Arc::new(Messenger::<u64>::new());
    let (done_tx, done_rx) = mpsc::channel();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let messenger = Arc::clone(&messenger);
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                let _ = done_tx.send(messenger.receive());
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    messenger.stop();

    for _ in 0..4 {
        assert_eq!(
            done_rx.recv_timeout(RELEASE_TIMEOUT)?,
            Err(ChannelError::Stopped)
        );
    }
    for handle in handles {
        assert!(handle.join().is_ok(), "receiver panicked");
    }
    Ok(())
}

#[test]
fn test_single_producer_fifo_across_threads() -> TestResult {
    const PACKETS: u64 = 10_000;
    let messenger = Arc::new(Messenger::<u64>::named("fifo"));

    let producer = {
        let messenger = Arc::clone(&messenger);
        thread::spawn(move || {
            for i in 1..=PACKETS {
                if messenger.send(i).is_err() {
                    return false;
                }
            }
            true
        })
    };

    let mut received = Vec::with_capacity(PACKETS as usize);
    for _ in 0..PACKETS {
        received.push(messenger.receive()?);
    }

    assert_eq!(producer.join().ok(), Some(true));
    assert!(received.windows(2).all(|w| w[0] < w[1]), "FIFO order violated");
    assert_eq!(received.first(), Some(&1));
    assert_eq!(received.last(), Some(&PACKETS));

    let stats = messenger.stats();
    assert_eq!(stats.sent, PACKETS);
    assert_eq!(stats.received, PACKETS);
    assert!(stats.is_drained());
    Ok(())
}

#[test]
fn test_pause_resume_under_load() -> TestResult {
    let messenger = Arc::new(Messenger::<u32>::named("pausable"));

    // Producer keeps sending; rejected packets are retried after resume.
    let producer = {
        let messenger = Arc::clone(&messenger);
        thread::spawn(move || {
            let mut rejected = 0_u32;
            for i in 0..1_000_u32 {
                let mut packet = i;
                loop {
                    match messenger.send(packet) {
                        Ok(()) => break,
                        Err(err) => {
                            rejected += 1;
                            packet = err.into_inner();
                            thread::yield_now();
                        }
                    }
                }
            }
            rejected
        })
    };

    let mut received = Vec::new();
    while received.len() < 1_000 {
        if received.len() == 300 {
            messenger.stop();
            thread::sleep(Duration::from_millis(5));
            assert_eq!(messenger.receive(), Err(ChannelError::Stopped));
            messenger.start();
        }
        received.push(messenger.receive()?);
    }

    let rejected = producer.join().map_err(|_| "producer panicked")?;
    assert_eq!(received, (0..1_000).collect::<Vec<_>>());
    assert_eq!(u64::from(rejected), messenger.stats().rejected);
    Ok(())
}

#[test]
fn test_restart_after_stop_blocks_again() -> TestResult {
    let messenger = Arc::new(Messenger::<u8>::new());
    messenger.stop();
    assert_eq!(messenger.receive(), Err(ChannelError::Stopped));
    messenger.start();

    let (done_tx, done_rx) = mpsc::channel();
    let consumer = {
        let messenger = Arc::clone(&messenger);
        thread::spawn(move || {
            let _ = done_tx.send(messenger.receive());
        })
    };

    assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
    messenger.send(1).map_err(|_| "send rejected")?;
    assert_eq!(done_rx.recv_timeout(RELEASE_TIMEOUT)?, Ok(1));
    assert!(consumer.join().is_ok());
    Ok(())
}
