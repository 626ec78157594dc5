use fifo_pool::{
    harness::Benchmark,
    ThreadPoolInner,
};
use parking_lot::Mutex;
use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

const THREADS: usize = 4;

fn demo_thread_spawn() {
    println!("\n=== thread create/join ===");
    let result = Benchmark::run("spawn + join", || {
        thread::spawn(|| {
            let mut sum = 0u64;
            for i in 0..1_000 {
                sum = black_box(sum + i);
            }
        })
        .join()
        .ok();
    }, 1_000);
    Benchmark::print_results(&[result]);
}

fn demo_thread_pool() {
    println!("\n=== thread pool workload ===");
    let result = Benchmark::run("pool 100 tasks", || {
        let pool = match ThreadPoolInner::new(THREADS) {
            Ok(pool) => pool,
            Err(err) => {
                eprintln!("failed to start pool: {}", err);
                return;
            }
        };
        let handles: Vec<_> = (0..100u64)
            .filter_map(|i| {
                pool.submit(move || (0..1_000u64).map(|j| i * j).sum::<u64>()).ok()
            })
            .collect();
        for handle in handles {
            let _ = black_box(handle.get());
        }
    }, 100);
    Benchmark::print_results(&[result]);
}

fn demo_synchronization() {
    println!("\n=== mutex vs atomic ===");
    let mutex_counter = Arc::new(Mutex::new(0usize));
    let atomic_counter = Arc::new(AtomicUsize::new(0));

    let mutex_run = {
        let counter = mutex_counter.clone();
        move || {
            let threads: Vec<_> = (0..THREADS)
                .map(|_| {
                    let counter = counter.clone();
                    thread::spawn(move || {
                        for _ in 0..1_000 {
                            *counter.lock() += 1;
                        }
                    })
                })
                .collect();
            for t in threads {
                let _ = t.join();
            }
        }
    };

    let atomic_run = {
        let counter = atomic_counter.clone();
        move || {
            let threads: Vec<_> = (0..THREADS)
                .map(|_| {
                    let counter = counter.clone();
                    thread::spawn(move || {
                        for _ in 0..1_000 {
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                    })
                })
                .collect();
            for t in threads {
                let _ = t.join();
            }
        }
    };

    let results = Benchmark::compare(
        vec![
            ("mutex", Box::new(mutex_run) as Box<dyn FnMut()>),
            ("atomic", Box::new(atomic_run) as Box<dyn FnMut()>),
        ],
        100,
    );
    Benchmark::print_results(&results);
}

fn demo_work_distribution() {
    println!("\n=== static vs dynamic split ===");
    const TOTAL: usize = 1_000_000;
    const CHUNK: usize = 1_000;

    let static_split = || {
        let per_thread = TOTAL / THREADS;
        let threads: Vec<_> = (0..THREADS)
            .map(|i| {
                let start = i * per_thread;
                let end = if i == THREADS - 1 { TOTAL } else { start + per_thread };
                thread::spawn(move || {
                    let mut sum = 0usize;
                    for j in start..end {
                        sum = black_box(sum.wrapping_add(j));
                    }
                })
            })
            .collect();
        for t in threads {
            let _ = t.join();
        }
    };

    let dynamic_split = || {
        let next = Arc::new(AtomicUsize::new(0));
        let threads: Vec<_> = (0..THREADS)
            .map(|_| {
                let next = next.clone();
                thread::spawn(move || {
                    let mut sum = 0usize;
                    loop {
                        let start = next.fetch_add(CHUNK, Ordering::Relaxed);
                        if start >= TOTAL {
                            break;
                        }
                        for j in start..(start + CHUNK).min(TOTAL) {
                            sum = black_box(sum.wrapping_add(j));
                        }
                    }
                })
            })
            .collect();
        for t in threads {
            let _ = t.join();
        }
    };

    let results = Benchmark::compare(
        vec![
            ("static", Box::new(static_split) as Box<dyn FnMut()>),
            ("dynamic", Box::new(dynamic_split) as Box<dyn FnMut()>),
        ],
        50,
    );
    Benchmark::print_results(&results);
}

fn main() {
    println!("threading demo, cpus: {}", num_cpus::get());

    demo_thread_spawn();
    demo_thread_pool();
    demo_synchronization();
    demo_work_distribution();

    println!("done");
}
