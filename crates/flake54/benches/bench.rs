use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flake54::{
    FlakeId, LockFlakeGenerator, MachineId, MonotonicClock, Poll, TimeSource, decode_base54,
    encode_base54, encode_base54_to_buf,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource<u64> for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// IDs per benchmark iteration (split across threads when contended). One full
// millisecond worth of sequence values.
const TOTAL_IDS: usize = 4096;

fn machine() -> MachineId {
    MachineId::from_region("fra", 35).unwrap()
}

/// Hot path with a fixed clock: every call is `Ready`.
fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/sequential/lock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = LockFlakeGenerator::new(machine(), FixedMockTime { millis: 1 });
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id().unwrap() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Real clock; `try_next_id` spins whenever a millisecond fills up.
fn benchmark_mono_sequential_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    let mut group = c.benchmark_group("mono/sequential/lock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = LockFlakeGenerator::new(machine(), clock);
                for _ in 0..TOTAL_IDS {
                    black_box(generator.try_next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// One generator shared by several threads on the real clock.
fn benchmark_mono_contended_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    let mut group = c.benchmark_group("mono/contended/lock");

    for thread_count in [1, 2, 4, 8] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = LockFlakeGenerator::new(machine(), clock);
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = generator.clone();
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.try_next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base54/encode");
    group.throughput(Throughput::Elements(1));

    let id = FlakeId::from_raw(310_311_215_280_041_986);
    group.bench_function("string", |b| {
        b.iter(|| black_box(encode_base54(black_box(id.to_raw())).unwrap()));
    });
    group.bench_function("buf", |b| {
        let mut buf = [0_u8; flake54::MAX_ENCODED_LEN];
        b.iter(|| {
            let encoded = encode_base54_to_buf(black_box(id.to_raw()), &mut buf).unwrap();
            black_box(encoded.len());
        });
    });

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base54/decode");
    group.throughput(Throughput::Elements(1));

    for encoded in ["6vF", "8HH7MXkTRtr"] {
        group.bench_function(encoded, |b| {
            b.iter(|| black_box(decode_base54(black_box(encoded)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_mock_sequential_lock,
    benchmark_mono_sequential_lock,
    benchmark_mono_contended_lock,
    benchmark_encode,
    benchmark_decode,
);
criterion_main!(benches);
