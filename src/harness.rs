//! Простой таймер для сравнения вариантов одной нагрузки.

use std::time::{Duration, Instant};

const WARMUP_ITERATIONS: usize = 10;

#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: String,
    pub duration: Duration,
    pub iterations: usize,
    /// операций в секунду
    pub throughput: f64,
}

pub struct Benchmark;

impl Benchmark {
    /// Прогревает `f`, затем замеряет `iterations` последовательных вызовов
    pub fn run<F>(name: &str, mut f: F, iterations: usize) -> Measurement
    where
        F: FnMut(),
    {
        for _ in 0..WARMUP_ITERATIONS {
            f();
        }

        let start = Instant::now();
        for _ in 0..iterations {
            f();
        }
        let duration = start.elapsed();

        Measurement {
            name: name.to_string(),
            duration,
            iterations,
            throughput: Self::throughput(duration, iterations),
        }
    }

    pub fn compare(tests: Vec<(&str, Box<dyn FnMut() + '_>)>, iterations: usize) -> Vec<Measurement> {
        tests
            .into_iter()
            .map(|(name, f)| Self::run(name, f, iterations))
            .collect()
    }

    pub fn throughput(duration: Duration, iterations: usize) -> f64 {
        let seconds = duration.as_secs_f64();
        if seconds > 0.0 {
            iterations as f64 / seconds
        } else {
            0.0
        }
    }

    pub fn fastest(results: &[Measurement]) -> Option<&Measurement> {
        results.iter().min_by_key(|m| m.duration)
    }

    pub fn print_results(results: &[Measurement]) {
        if results.is_empty() {
            return;
        }

        println!("{:<24}{:>15}{:>15}{:>18}", "name", "time (ms)", "iterations", "ops/s");
        println!("{}", "-".repeat(72));
        for m in results {
            println!(
                "{:<24}{:>15.2}{:>15}{:>18.0}",
                m.name,
                m.duration.as_secs_f64() * 1_000.0,
                m.iterations,
                m.throughput,
            );
        }

        if let Some(best) = Self::fastest(results) {
            println!(
                "\nfastest: {} ({:.2} ms)",
                best.name,
                best.duration.as_secs_f64() * 1_000.0
            );
        }
        println!();
    }
}
