//! Process Registry — таблица процессов / process table
//!
//! Владеет записями процессов и их жизненным циклом.
//! Owns process records and their lifecycle.
//!
//! Pid выдаются по возрастанию с 1 и никогда не переиспользуются.
//! Pids are handed out ascending from 1 and are never reused.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use libossim::{Error, Extent, Pid, ProcessState, Result, StateMask};
use log::{info, warn};

use crate::mm::FreeListAllocator;
use crate::sched::RunQueues;

/// Запись процесса / Process record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid:               Pid,
    pub name:              String,
    pub remaining_burst:   u32,
    pub original_burst:    u32,
    /// Подсказка пользователя, MLFQ её не читает.
    /// User hint, never read by the MLFQ policy.
    pub priority_hint:     i32,
    pub state:             ProcessState,
    pub memory_block:      Option<Extent>,
    pub io_wait_remaining: u32,
    pub last_queue_level:  usize,
    pub arrived_at:        u64,
    pub finished_at:       Option<u64>,
}

impl Process {
    fn new(pid: Pid, name: String, burst: u32, priority_hint: i32, now: u64) -> Self {
        Self {
            pid,
            name,
            remaining_burst: burst,
            original_burst: burst,
            priority_hint,
            state: ProcessState::Ready,
            memory_block: None,
            io_wait_remaining: 0,
            last_queue_level: 0,
            arrived_at: now,
            finished_at: None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }

    pub fn turnaround(&self) -> Option<u64> {
        self.finished_at.map(|end| end.saturating_sub(self.arrived_at))
    }

    /// Переход в TERMINATED: память освобождается ровно здесь.
    /// Transition into TERMINATED: memory is released exactly here.
    pub(crate) fn terminate(&mut self, now: u64, mm: &mut FreeListAllocator) {
        mm.free(self.memory_block.take());
        self.state = ProcessState::Terminated;
        self.finished_at = Some(now);
        self.io_wait_remaining = 0;
    }
}

pub struct Registry {
    table:    BTreeMap<Pid, Process>,
    next_pid: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self { table: BTreeMap::new(), next_pid: 1 }
    }

    /// Создать процесс в хвосте очереди 0.
    /// Create a process at the tail of ready level 0.
    pub fn create(
        &mut self,
        name: &str,
        burst: u32,
        priority: i32,
        now: u64,
        queues: &mut RunQueues,
    ) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;

        self.table.insert(pid, Process::new(pid, String::from(name), burst, priority, now));
        queues.push_ready(0, pid);
        info!("[proc] create pid={} name={} burst={} priority={}", pid, name, burst, priority);
        pid
    }

    /// Завершить процесс. Повторный kill — успех без эффекта.
    /// Terminate a process. Killing it again succeeds with no effect.
    pub fn kill(
        &mut self,
        pid: Pid,
        now: u64,
        mm: &mut FreeListAllocator,
        queues: &mut RunQueues,
    ) -> Result<()> {
        let proc = self.table.get_mut(&pid).ok_or(Error::NotFound(pid))?;
        if proc.is_terminated() {
            return Ok(());
        }

        queues.remove(pid);
        proc.terminate(now, mm);
        info!("[proc] kill pid={}: terminated and resources freed", pid);
        Ok(())
    }

    pub fn attach_memory(
        &mut self,
        pid: Pid,
        size: usize,
        mm: &mut FreeListAllocator,
    ) -> Result<Extent> {
        let proc = self.table.get_mut(&pid).ok_or(Error::NotFound(pid))?;
        if proc.is_terminated() {
            return Err(Error::AlreadyTerminated(pid));
        }
        if let Some(block) = proc.memory_block {
            warn!("[proc] alloc pid={}: already holds {}", pid, block);
            return Err(Error::AlreadyAllocated(pid, block));
        }

        let block = mm.allocate(size).inspect_err(|err| warn!("[proc] alloc pid={}: {}", pid, err))?;
        proc.memory_block = Some(block);
        info!("[proc] alloc pid={} block={}", pid, block);
        Ok(block)
    }

    pub fn detach_memory(&mut self, pid: Pid, mm: &mut FreeListAllocator) -> Result<Extent> {
        let proc = self.table.get_mut(&pid).ok_or(Error::NotFound(pid))?;
        let block = proc.memory_block.take().ok_or(Error::NoBlock(pid))?;

        mm.free(Some(block));
        info!("[proc] free pid={} block={}", pid, block);
        Ok(block)
    }

    /// Заблокировать на `io_ticks` тиков. Повторный вызов сбрасывает счётчик.
    /// Block for `io_ticks` ticks. Blocking again resets the counter.
    pub fn block(&mut self, pid: Pid, io_ticks: u32, queues: &mut RunQueues) -> Result<()> {
        let proc = self.table.get_mut(&pid).ok_or(Error::NotFound(pid))?;
        if proc.is_terminated() {
            return Err(Error::AlreadyTerminated(pid));
        }

        proc.state = ProcessState::Blocked;
        proc.io_wait_remaining = io_ticks;
        queues.block(pid);
        info!("[proc] block pid={} for {} tick(s)", pid, io_ticks);
        Ok(())
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.table.get(&pid)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.table.get_mut(&pid)
    }

    /// В порядке pid / In pid order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.table.values()
    }

    pub fn pids_in(&self, mask: StateMask) -> Vec<Pid> {
        self.iter().filter(|p| mask.matches(p.state)).map(|p| p.pid).collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
