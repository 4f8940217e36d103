//! Messenger benchmarks.
//!
//! `send` must stay bounded by lock acquisition; these measure the
//! uncontended path and a two-thread handoff.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use trafficmanager_messenger::prelude::*;

fn bench_uncontended(c: &mut Criterion) {
    let messenger = Messenger::<u64>::new();

    c.bench_function("send_receive_uncontended", |b| {
        b.iter(|| {
            let _ = messenger.send(black_box(1));
            black_box(messenger.try_receive())
        });
    });

    c.bench_function("pending_count", |b| {
        b.iter(|| black_box(messenger.pending_count()));
    });
}

fn bench_handoff(c: &mut Criterion) {
    c.bench_function("handoff_1000_packets", |b| {
        b.iter(|| {
            let messenger = Arc::new(Messenger::<u64>::new());
            let consumer = {
                let messenger = Arc::clone(&messenger);
                thread::spawn(move || {
                    let mut sum = 0_u64;
                    for _ in 0..1_000 {
                        match messenger.receive() {
                            Ok(v) => sum += v,
                            Err(_) => break,
                        }
                    }
                    sum
                })
            };
            for i in 0..1_000_u64 {
                let _ = messenger.send(i);
            }
            black_box(consumer.join().ok())
        });
    });
}

criterion_group!(benches, bench_uncontended, bench_handoff);
criterion_main!(benches);
