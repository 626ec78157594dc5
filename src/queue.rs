use super::{
    errors::PoolError,
    handle::WorkItem,
};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;


/// Все, что защищено единственным локом пула
struct State {
    tasks: VecDeque<WorkItem>,
    shutting_down: bool,
    // задачи, снятые с очереди, но еще не завершенные
    in_flight: usize,
    // воркеры, спящие на `available`
    idle: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueSnapshot {
    pub queued: usize,
    pub in_flight: usize,
    pub idle: usize,
    pub shutting_down: bool,
}

/// FIFO очередь задач + флаг shutdown под одним мьютексом.
///
/// `available`: очередь не пуста или начат shutdown.
/// `drained`: очередь опустела (и, возможно, ничего не выполняется).
pub(crate) struct TaskQueue {
    state: Mutex<State>,
    available: Condvar,
    drained: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                tasks: VecDeque::new(),
                shutting_down: false,
                in_flight: 0,
                idle: 0,
            }),
            available: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Кладет задачу в хвост. После начала shutdown задача отклоняется
    /// под тем же локом, так что в очередь закрывающегося пула ничего не попадет.
    pub fn push(&self, task: WorkItem) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        if state.shutting_down {
            return Err(PoolError::Closed);
        }
        state.tasks.push_back(task);
        let wake = state.idle > 0;
        drop(state);

        if wake {
            self.available.notify_one();
        }
        Ok(())
    }

    /// Забирает следующую задачу для воркера, блокируясь на пустой очереди.
    ///
    /// `finished_previous` сообщает, что воркер только что закончил предыдущую
    /// задачу: учет in-flight делается в том же захвате лока.
    /// `None` означает shutdown при пустой очереди, воркер должен выйти.
    pub fn claim(&self, finished_previous: bool) -> Option<WorkItem> {
        let mut state = self.state.lock();

        if finished_previous {
            state.in_flight -= 1;
            if state.in_flight == 0 && state.tasks.is_empty() {
                self.drained.notify_all();
            }
        }

        loop {
            if let Some(task) = state.tasks.pop_front() {
                state.in_flight += 1;
                if state.tasks.is_empty() {
                    self.drained.notify_all();
                }
                return Some(task);
            }
            if state.shutting_down {
                return None;
            }
            state.idle += 1;
            self.available.wait(&mut state);
            state.idle -= 1;
        }
    }

    /// Переводит очередь в shutdown и будит всех воркеров.
    /// Возвращает `true` только для первого вызова.
    pub fn close(&self) -> bool {
        let first = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.shutting_down, true)
        };
        self.available.notify_all();
        first
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().shutting_down
    }

    /// Ждет, пока очередь не станет пустой
    pub fn wait_empty(&self) {
        let mut state = self.state.lock();
        while !state.tasks.is_empty() {
            self.drained.wait(&mut state);
        }
    }

    /// Ждет, пока очередь не станет пустой и ни одна задача не выполняется
    pub fn wait_idle(&self) {
        let mut state = self.state.lock();
        while !state.tasks.is_empty() || state.in_flight > 0 {
            self.drained.wait(&mut state);
        }
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.state.lock();
        QueueSnapshot {
            queued: state.tasks.len(),
            in_flight: state.in_flight,
            idle: state.idle,
            shutting_down: state.shutting_down,
        }
    }
}
