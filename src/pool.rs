use super::{
    errors::PoolError,
    result::TaskResult,
    handle::{
        WorkItem,
        ResultHandle,
    },
    model::PoolMetrics,
    queue::TaskQueue,
};
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};
use crossbeam::utils::CachePadded;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use tokio::sync::oneshot;


/// Конфигурация пула потоков
#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: usize,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "fifo-pool".to_string(),
            stack_size: None,
        }
    }
}

impl Config {
    pub fn cpu_bound() -> Self {
        Self {
            num_threads: num_cpus::get_physical(),
            ..Default::default()
        }
    }

    pub fn io_bound() -> Self {
        Self {
            num_threads: num_cpus::get() * 2,
            ..Default::default()
        }
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}


pub type ThreadPool = Arc<ThreadPoolInner>;

#[inline(always)]
fn unlikely(b: bool) -> bool {
    #[cold]
    fn cold() {}
    if b { cold() }
    b
}

/// Счетчики для метрик. Каждый на своей cache line: их пишут все воркеры.
#[derive(Default)]
struct Counters {
    submitted: CachePadded<AtomicUsize>,
    completed: CachePadded<AtomicUsize>,
    failed: CachePadded<AtomicUsize>,
}

impl Counters {
    #[inline]
    fn record<T>(&self, result: &TaskResult<T>) {
        if result.is_ok() {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}


/// Пул из фиксированного числа OS-потоков с общей FIFO очередью.
///
/// Пул останавливается (shutdown + join) при drop последнего `Arc`
/// или явным вызовом [`ThreadPoolInner::shutdown`].
pub struct ThreadPoolInner {
    queue: Arc<TaskQueue>,
    counters: Arc<Counters>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    config: Config,
}

impl ThreadPoolInner {
    pub fn new(num_threads: usize) -> Result<ThreadPool, PoolError> {
        let config = Config {
            num_threads,
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Запускает `config.num_threads` воркеров и возвращается, когда все они созданы.
    /// Ноль воркеров - ошибка [`PoolError::NoWorkers`].
    pub fn with_config(config: Config) -> Result<ThreadPool, PoolError> {
        if config.num_threads == 0 {
            return Err(PoolError::NoWorkers);
        }

        let queue = Arc::new(TaskQueue::new());
        let counters = Arc::new(Counters::default());
        let mut workers = Vec::with_capacity(config.num_threads);

        // Запускаем воркеры
        for id in 0..config.num_threads {
            let mut builder = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, id));
            if let Some(size) = config.stack_size {
                builder = builder.stack_size(size);
            }

            let queue_clone = queue.clone();
            match builder.spawn(move || worker_loop(id, &queue_clone)) {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    warn!("failed to spawn worker {}: {}", id, err);
                    queue.close();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(err.to_string()));
                }
            }
        }

        debug!("thread pool started with {} workers", config.num_threads);

        Ok(Arc::new(ThreadPoolInner {
            queue,
            counters,
            workers: Mutex::new(workers),
            config,
        }))
    }

    #[inline(always)]
    fn push_task(&self, task: WorkItem) -> Result<(), PoolError> {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        let pushed = self.queue.push(task);
        if unlikely(pushed.is_err()) {
            self.counters.submitted.fetch_sub(1, Ordering::Relaxed);
        }
        pushed
    }

    fn submit_with<T, F>(&self, f: F) -> Result<ResultHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> TaskResult<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<TaskResult<T>>();
        let counters = self.counters.clone();

        let task: WorkItem = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(f))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload);
                    warn!("task panicked: {}", message);
                    Err(PoolError::Panic(message))
                });

            counters.record(&result);
            // handle мог быть уже выброшен, результат тогда никому не нужен
            let _ = tx.send(result);
        });

        self.push_task(task)?;
        Ok(ResultHandle::new(rx))
    }

    /// Ставит задачу в очередь и сразу возвращает handle на ее результат.
    ///
    /// Паника внутри задачи не убивает воркер: она сохраняется в handle
    /// как [`PoolError::Panic`]. После начала shutdown возвращает
    /// [`PoolError::Closed`] и задачу не выполняет.
    pub fn submit<T, F>(&self, f: F) -> Result<ResultHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit_with(move || Ok(f()))
    }

    /// То же, что [`submit`](Self::submit), но `Err` задачи попадает в handle
    /// как [`PoolError::TaskFailed`].
    pub fn submit_fallible<T, E, F>(&self, f: F) -> Result<ResultHandle<T>, PoolError>
    where
        T: Send + 'static,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        self.submit_with(move || f().map_err(|err| PoolError::TaskFailed(err.to_string())))
    }

    /// Fire-and-forget: результат и ошибки задачи отбрасываются
    #[inline]
    pub fn execute<F>(&self, f: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(f).map(drop)
    }

    /// Слабый барьер: ждет, пока очередь не станет пустой.
    ///
    /// Задачи снимаются с очереди до того, как начнут выполняться, поэтому
    /// гарантируется только "не осталось задач, которые еще не начались".
    /// Уже взятые воркерами задачи в этот момент могут продолжать работать.
    /// Для ожидания завершения всего принятого есть [`join_all`](Self::join_all).
    ///
    /// Из задачи этого же пула вызывать нельзя: если остальные воркеры заняты
    /// (с одним воркером - всегда), очередь никто не разберет.
    pub fn wait_all(&self) {
        self.queue.wait_empty();
    }

    /// Полный барьер: ждет, пока очередь пуста и ни одна задача не выполняется.
    ///
    /// Нельзя вызывать из задачи этого же пула: она будет ждать сама себя.
    pub fn join_all(&self) {
        self.queue.wait_idle();
    }

    /// Закрывает пул для новых задач и join-ит все воркеры.
    ///
    /// Дожидается выполнения поставленных задач только тот вызов, который
    /// забрал список воркеров: повторный или конкурентный вызов сразу
    /// возвращается и не гарантирует, что очередь уже дочищена.
    /// Если вызвать из воркера этого пула, свой поток он не join-ит:
    /// тот выйдет сам, когда очередь опустеет.
    pub fn shutdown(&self) {
        if self.queue.close() {
            debug!("thread pool shutting down, draining queued tasks");
        }

        let current = thread::current().id();
        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                warn!("worker thread terminated abnormally");
            }
        }
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.queue.is_closed()
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> PoolMetrics {
        let snapshot = self.queue.snapshot();
        PoolMetrics {
            num_threads: self.config.num_threads,
            active_tasks: snapshot.in_flight,
            idle_workers: snapshot.idle,
            queued_tasks: snapshot.queued,
            total_submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed_tasks: self.counters.completed.load(Ordering::Relaxed),
            failed_tasks: self.counters.failed.load(Ordering::Relaxed),
            is_shutdown: snapshot.shutting_down,
        }
    }
}

impl Drop for ThreadPoolInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for ThreadPoolInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPoolInner")
            .field("config", &self.config)
            .field("is_shutdown", &self.is_shutdown())
            .finish()
    }
}


fn worker_loop(id: usize, queue: &TaskQueue) {
    trace!("worker {} started", id);
    let mut finished_previous = false;

    while let Some(task) = queue.claim(finished_previous) {
        // Паника вне пользовательской функции (например, в Drop результата,
        // который никто не ждет) не должна убивать воркер
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
            warn!("worker {} caught a panic outside the task body", id);
            // payload сам может паниковать в Drop
            std::mem::forget(payload);
        }
        finished_previous = true;
    }

    debug!("worker {} exiting", id);
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
