#[cfg(test)]
mod tests {
    use fifo_pool::{
    errors::PoolError,
    pool::{
        Config,
        ThreadPoolInner,
        },
    };
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        sync::Arc,
        thread,
        time::{Duration, Instant},
    };

    fn measure<F, T>(name: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        println!("✓ {}: {:?}", name, elapsed);
        result
    }

    #[test]
    fn load_test_1_many_tiny_tasks() {
        println!("\n=== LOAD TEST 1: 100k мелких задач ===");
        let pool = ThreadPoolInner::with_config(Config::cpu_bound()).unwrap();

        let handles: Vec<_> = measure("submit 100k", || {
            (0..100_000u64)
                .map(|i| pool.submit(move || i ^ 0x5a5a).unwrap())
                .collect()
        });

        let sum: u64 = measure("collect 100k", || {
            handles.into_iter().map(|h| h.get().unwrap()).sum()
        });

        let expected: u64 = (0..100_000u64).map(|i| i ^ 0x5a5a).sum();
        assert_eq!(sum, expected);

        let metrics = pool.metrics();
        println!("  Завершено: {}/{}", metrics.completed_tasks, metrics.total_submitted);
        assert_eq!(metrics.completed_tasks, 100_000);
        assert_eq!(metrics.failed_tasks, 0);
    }

    #[test]
    fn load_test_2_concurrent_submitters() {
        println!("\n=== LOAD TEST 2: несколько отправителей, без потерянных пробуждений ===");
        const SUBMITTERS: usize = 8;
        const PER_SUBMITTER: usize = 5_000;

        // Повторяем несколько раз: потерянное пробуждение проявилось бы зависанием
        for round in 0..5 {
            let pool = ThreadPoolInner::new(4).unwrap();
            let completed = Arc::new(AtomicUsize::new(0));

            measure(&format!("round {}", round), || {
                crossbeam::scope(|s| {
                    for submitter in 0..SUBMITTERS {
                        let pool = &pool;
                        let completed = completed.clone();
                        s.spawn(move |_| {
                            let handles: Vec<_> = (0..PER_SUBMITTER)
                                .map(|i| {
                                    let completed = completed.clone();
                                    pool.submit(move || {
                                        completed.fetch_add(1, Ordering::Relaxed);
                                        submitter * PER_SUBMITTER + i
                                    }).unwrap()
                                })
                                .collect();

                            for (i, handle) in handles.into_iter().enumerate() {
                                assert_eq!(handle.get(), Ok(submitter * PER_SUBMITTER + i));
                            }
                        });
                    }
                })
                .unwrap();
            });

            assert_eq!(completed.load(Ordering::Relaxed), SUBMITTERS * PER_SUBMITTER);
            pool.join_all();
            assert_eq!(pool.metrics().total_submitted, SUBMITTERS * PER_SUBMITTER);
        }
    }

    #[test]
    fn load_test_3_shutdown_under_load() {
        println!("\n=== LOAD TEST 3: shutdown во время отправки ===");
        let pool = ThreadPoolInner::new(4).unwrap();
        let executed = Arc::new(AtomicUsize::new(0));
        let accepted = AtomicUsize::new(0);
        let rejected = AtomicUsize::new(0);

        crossbeam::scope(|s| {
            for _ in 0..4 {
                let pool = &pool;
                let executed = executed.clone();
                let (accepted, rejected) = (&accepted, &rejected);
                s.spawn(move |_| {
                    for _ in 0..10_000 {
                        let executed = executed.clone();
                        match pool.execute(move || {
                            executed.fetch_add(1, Ordering::SeqCst);
                        }) {
                            Ok(()) => accepted.fetch_add(1, Ordering::SeqCst),
                            Err(PoolError::Closed) => rejected.fetch_add(1, Ordering::SeqCst),
                            Err(e) => panic!("unexpected error: {:?}", e),
                        };
                    }
                });
            }

            s.spawn(|_| {
                thread::sleep(Duration::from_millis(5));
                pool.shutdown();
            });
        })
        .unwrap();

        pool.shutdown();
        let accepted = accepted.load(Ordering::SeqCst);
        let rejected = rejected.load(Ordering::SeqCst);
        println!("  Принято: {}, отклонено: {}", accepted, rejected);

        // все принятые задачи выполнены, отклоненные не выполнялись
        assert_eq!(executed.load(Ordering::SeqCst), accepted);
        assert_eq!(accepted + rejected, 40_000);
    }

    #[test]
    fn load_test_4_blocking_tasks() {
        println!("\n=== LOAD TEST 4: 1k блокирующих задач ===");
        let pool = ThreadPoolInner::with_config(Config::io_bound()).unwrap();

        let handles: Vec<_> = measure("1k blocking tasks", || {
            (0..1_000u64)
                .map(|i| {
                    pool.submit(move || {
                        thread::sleep(Duration::from_millis(1));
                        i * i
                    }).unwrap()
                })
                .collect()
        });

        let successful = handles.into_iter().map(|h| h.get()).filter(|r| r.is_ok()).count();
        println!("  Успешно: {}/1000", successful);
        assert_eq!(successful, 1_000);

        let metrics = pool.metrics();
        println!("  Утилизация после завершения: {:.1}%", metrics.utilization() * 100.0);
    }
}
