//! OSSim Kernel — ядро симулятора / simulator core
//!
//! Три подсистемы в одном контексте / Three subsystems in one context:
//!   mm    — непрерывная память, first-fit / contiguous memory, first-fit
//!   proc  — таблица процессов / process table
//!   sched — MLFQ планировщик, очереди, часы / MLFQ scheduler, queues, clock
//!
//! Глобальных переменных нет: всё состояние живёт в [`Kernel`].
//! No globals: all state lives in [`Kernel`].

#![no_std]

// Подключить стандартный alloc крейт (Box, Vec, BTreeMap, ...)
// Connect standard alloc crate (Box, Vec, BTreeMap, ...)
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod mm;
pub mod proc;
pub mod sched;
pub mod snapshot;
pub mod sync;

use alloc::boxed::Box;
use libossim::{Extent, Pid, Result};
use log::info;

pub use libossim::{Error, ProcessState, StateMask};
pub use config::Config;
pub use mm::FreeListAllocator;
pub use proc::{Process, Registry};
pub use sched::{IoSource, NoIo, RunOutcome, RunStats, Scheduler, Turnaround, XorShiftIo};
pub use snapshot::Snapshot;
pub use sync::SharedKernel;

pub struct Kernel {
    mm:     FreeListAllocator,
    procs:  Registry,
    sched:  Scheduler,
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::new(Config::default())
    }
}

impl Kernel {
    /// Ядро с псевдослучайным I/O из конфигурации.
    /// Kernel with pseudo-random I/O taken from the config.
    pub fn new(config: Config) -> Self {
        let io = Box::new(XorShiftIo::from_config(&config));
        Self::with_io_source(config, io)
    }

    pub fn with_io_source(config: Config, io: Box<dyn IoSource>) -> Self {
        info!(
            "[kernel] memory={} quanta={:?} io={}‰",
            config.memory_size, config.quanta, config.io_chance_permille
        );
        Self {
            mm:    FreeListAllocator::new(config.memory_size),
            procs: Registry::new(),
            sched: Scheduler::new(config.quanta, io),
        }
    }

    pub fn create_process(&mut self, name: &str, burst: u32, priority: i32) -> Pid {
        let now = self.sched.clock();
        self.procs.create(name, burst, priority, now, self.sched.queues_mut())
    }

    pub fn kill_process(&mut self, pid: Pid) -> Result<()> {
        let now = self.sched.clock();
        self.procs.kill(pid, now, &mut self.mm, self.sched.queues_mut())
    }

    pub fn block_process(&mut self, pid: Pid, io_ticks: u32) -> Result<()> {
        self.procs.block(pid, io_ticks, self.sched.queues_mut())
    }

    pub fn allocate_memory_to_process(&mut self, pid: Pid, size: usize) -> Result<Extent> {
        self.procs.attach_memory(pid, size, &mut self.mm)
    }

    pub fn free_memory_of_process(&mut self, pid: Pid) -> Result<Extent> {
        self.procs.detach_memory(pid, &mut self.mm)
    }

    pub fn run_scheduler(&mut self, max_ticks: u64) -> RunStats {
        self.sched.run(&mut self.procs, &mut self.mm, max_ticks)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.procs, &self.mm, &self.sched)
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.procs.get(pid)
    }

    pub fn processes(&self) -> &Registry {
        &self.procs
    }

    pub fn memory(&self) -> &FreeListAllocator {
        &self.mm
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    pub fn set_io_source(&mut self, io: Box<dyn IoSource>) {
        self.sched.set_io_source(io);
    }

    pub fn clock(&self) -> u64 {
        self.sched.clock()
    }
}
