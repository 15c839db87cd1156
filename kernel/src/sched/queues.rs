//! Очереди готовых процессов и множество заблокированных.
//! Ready queues and the blocked set.
//!
//! `ready[0]` — высший приоритет / highest priority.
//! Pid находится максимум в одной очереди и никогда одновременно в очереди
//! и в `blocked`.
//! A pid sits in at most one ready queue and never in a ready queue while
//! it is in `blocked`.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use libossim::Pid;

use crate::config::LEVELS;

pub struct RunQueues {
    pub(crate) ready:   [VecDeque<Pid>; LEVELS],
    pub(crate) blocked: Vec<Pid>,
}

impl Default for RunQueues {
    fn default() -> Self {
        RunQueues::new()
    }
}

impl RunQueues {
    pub fn new() -> Self {
        Self {
            ready:   core::array::from_fn(|_| VecDeque::new()),
            blocked: Vec::new(),
        }
    }

    /// В хвост уровня `level` (обрезается до нижнего).
    /// Push to the tail of `level` (clamped to the lowest level).
    pub fn push_ready(&mut self, level: usize, pid: Pid) {
        self.ready[level.min(LEVELS - 1)].push_back(pid);
    }

    /// Голова самой приоритетной непустой очереди.
    /// Head of the highest-priority non-empty queue.
    pub fn pop_ready(&mut self) -> Option<(Pid, usize)> {
        self.ready
            .iter_mut()
            .enumerate()
            .find_map(|(level, queue)| queue.pop_front().map(|pid| (pid, level)))
    }

    /// Перенести pid в `blocked`, не дублируя.
    /// Move a pid into `blocked` without duplicating it.
    pub fn block(&mut self, pid: Pid) {
        self.remove_ready(pid);
        if !self.blocked.contains(&pid) {
            self.blocked.push(pid);
        }
    }

    /// Убрать pid отовсюду / Drop a pid from every queue.
    pub fn remove(&mut self, pid: Pid) {
        self.remove_ready(pid);
        self.blocked.retain(|&p| p != pid);
    }

    fn remove_ready(&mut self, pid: Pid) {
        for queue in self.ready.iter_mut() {
            queue.retain(|&p| p != pid);
        }
    }

    pub fn level_of(&self, pid: Pid) -> Option<usize> {
        self.ready.iter().position(|queue| queue.contains(&pid))
    }

    pub fn is_blocked(&self, pid: Pid) -> bool {
        self.blocked.contains(&pid)
    }

    pub fn ready(&self, level: usize) -> &VecDeque<Pid> {
        &self.ready[level]
    }

    pub fn blocked(&self) -> &[Pid] {
        &self.blocked
    }

    pub fn has_ready(&self) -> bool {
        self.ready.iter().any(|queue| !queue.is_empty())
    }

    /// Нет ни готовых, ни заблокированных / Nothing ready and nothing blocked.
    pub fn is_idle(&self) -> bool {
        !self.has_ready() && self.blocked.is_empty()
    }
}
