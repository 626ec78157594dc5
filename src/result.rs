use super::errors::PoolError;

pub type TaskResult<T> = Result<T, PoolError>;
