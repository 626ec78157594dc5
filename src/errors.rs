#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, thiserror::Error)]
pub enum PoolError {
    /// Пул уже в состоянии shutdown, задача не поставлена в очередь
    #[error("thread pool is closed")]
    Closed,

    #[error("task panicked: {0}")]
    Panic(String),

    #[error("task failed: {0}")]
    TaskFailed(String),

    #[error("result channel closed before the task produced an outcome")]
    ChannelClosed,

    #[error("thread pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
}

impl PoolError {
    /// Ошибка произошла внутри самой задачи, а не в пуле
    #[inline]
    pub fn is_task_failure(&self) -> bool {
        matches!(self, PoolError::Panic(_) | PoolError::TaskFailed(_))
    }
}
