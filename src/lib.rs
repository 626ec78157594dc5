//! Пул потоков фиксированного размера с общей FIFO очередью
//!
//! # Features
//! - N долгоживущих OS-потоков, одна очередь под одним локом
//! - `submit` не блокируется и сразу возвращает handle на результат
//! - Паники и ошибки задач доставляются в их handle, воркеры не падают
//! - Graceful shutdown: очередь дочищается, воркеры join-ятся при drop
//! - Handle можно ждать блокирующе или `.await`-ить из async кода
//!
//! ```
//! use fifo_pool::ThreadPoolInner;
//!
//! let pool = ThreadPoolInner::new(4).unwrap();
//! let handles: Vec<_> = (0..10u64)
//!     .map(|i| pool.submit(move || i * i).unwrap())
//!     .collect();
//! for (i, handle) in handles.into_iter().enumerate() {
//!     assert_eq!(handle.get(), Ok((i * i) as u64));
//! }
//! ```

pub mod errors;
pub mod handle;
pub mod harness;
pub mod model;
pub mod pool;
pub mod result;
mod queue;

pub use errors::PoolError;
pub use handle::ResultHandle;
pub use model::PoolMetrics;
pub use pool::{Config, ThreadPool, ThreadPoolInner};
pub use result::TaskResult;
