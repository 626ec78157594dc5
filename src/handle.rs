use super::{
    errors::PoolError,
    result::TaskResult,
};
use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll}
};
use tokio::sync::oneshot::{self, error::TryRecvError};


/// Стертая по типу задача: владеет всем, что захватила при submit
pub type WorkItem = Box<dyn FnOnce() + Send + 'static>;


/// Одноразовый handle на результат задачи.
///
/// Воркер пишет исход ровно один раз, читать его можно сколько угодно:
/// после первого `wait()` результат кешируется внутри handle.
/// Все методы чтения берут `&mut self` или `self`, поэтому конкурентное
/// чтение из нескольких потоков невозможно на уровне типов.
///
/// Блокирующие методы (`wait`, `get`) нельзя вызывать внутри async runtime,
/// там handle нужно `.await`-ить.
///
/// Если handle дропнут до завершения, задача все равно выполнится,
/// а ее результат будет выброшен.
pub struct ResultHandle<T> {
    receiver: Option<oneshot::Receiver<TaskResult<T>>>,
    outcome: Option<TaskResult<T>>,
}

impl<T> ResultHandle<T> {

    pub(crate) fn new(receiver: oneshot::Receiver<TaskResult<T>>) -> Self {
        Self {
            receiver: Some(receiver),
            outcome: None,
        }
    }

    /// Блокирует поток до записи результата и возвращает ссылку на него.
    /// Повторные вызовы возвращают тот же сохраненный результат.
    pub fn wait(&mut self) -> &TaskResult<T> {
        if let Some(receiver) = self.receiver.take() {
            self.outcome = Some(receiver.blocking_recv().unwrap_or(Err(PoolError::ChannelClosed)));
        }
        self.outcome.get_or_insert(Err(PoolError::ChannelClosed))
    }

    /// Блокирует поток до записи результата и отдает его во владение
    pub fn get(mut self) -> TaskResult<T> {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        match self.receiver.take() {
            Some(receiver) => receiver.blocking_recv().unwrap_or(Err(PoolError::ChannelClosed)),
            None => Err(PoolError::ChannelClosed),
        }
    }

    /// Неблокирующая проверка: `None`, пока задача не завершилась
    pub fn try_get(&mut self) -> Option<&TaskResult<T>> {
        if let Some(receiver) = self.receiver.as_mut() {
            let outcome = match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => Err(PoolError::ChannelClosed),
            };
            self.receiver = None;
            self.outcome = Some(outcome);
        }
        self.outcome.as_ref()
    }

    #[inline]
    pub fn is_ready(&mut self) -> bool {
        self.try_get().is_some()
    }
}

// T никогда не пинится через handle
impl<T> Unpin for ResultHandle<T> {}

impl<T> Future for ResultHandle<T> {
    type Output = TaskResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.outcome.take() {
            return Poll::Ready(outcome);
        }
        match this.receiver.as_mut() {
            Some(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(res) => {
                    this.receiver = None;
                    Poll::Ready(res.unwrap_or(Err(PoolError::ChannelClosed)))
                }
                Poll::Pending => Poll::Pending,
            },
            None => Poll::Ready(Err(PoolError::ChannelClosed)),
        }
    }
}

impl<T> fmt::Debug for ResultHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle")
            .field("ready", &self.outcome.is_some())
            .finish()
    }
}
