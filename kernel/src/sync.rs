//! Разделяемое ядро / Shared kernel handle
//!
//! Одна блокировка на всю операцию: прогон планировщика (и каждый квант
//! внутри него) атомарен относительно остальных вызовов.
//! One lock per operation: a scheduler run (and every quantum inside it) is
//! atomic relative to every other call.

use libossim::{Extent, Pid, Result};
use spin::Mutex;

use crate::sched::RunStats;
use crate::snapshot::Snapshot;
use crate::Kernel;

pub struct SharedKernel {
    inner: Mutex<Kernel>,
}

impl SharedKernel {
    pub fn new(kernel: Kernel) -> Self {
        Self { inner: Mutex::new(kernel) }
    }

    pub fn into_inner(self) -> Kernel {
        self.inner.into_inner()
    }

    pub fn create_process(&self, name: &str, burst: u32, priority: i32) -> Pid {
        self.inner.lock().create_process(name, burst, priority)
    }

    pub fn kill_process(&self, pid: Pid) -> Result<()> {
        self.inner.lock().kill_process(pid)
    }

    pub fn block_process(&self, pid: Pid, io_ticks: u32) -> Result<()> {
        self.inner.lock().block_process(pid, io_ticks)
    }

    pub fn allocate_memory_to_process(&self, pid: Pid, size: usize) -> Result<Extent> {
        self.inner.lock().allocate_memory_to_process(pid, size)
    }

    pub fn free_memory_of_process(&self, pid: Pid) -> Result<Extent> {
        self.inner.lock().free_memory_of_process(pid)
    }

    pub fn run_scheduler(&self, max_ticks: u64) -> RunStats {
        self.inner.lock().run_scheduler(max_ticks)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::SharedKernel;
    use crate::{Config, Kernel, NoIo};
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use libossim::StateMask;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn parallel_callers_keep_invariants() {
        let kernel = Kernel::with_io_source(Config::default(), Box::new(NoIo));
        let shared = Arc::new(SharedKernel::new(kernel));

        let workers: Vec<_> = (0..4)
            .map(|w| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..8 {
                        let pid = shared.create_process("worker", 3 + i, w);
                        let _ = shared.allocate_memory_to_process(pid, 16);
                        if i % 2 == 0 {
                            shared.run_scheduler(20);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let stats = shared.run_scheduler(10_000);
        assert_eq!(stats.completed.len(), 32);

        let kernel = Arc::try_unwrap(shared).ok().unwrap().into_inner();
        assert!(kernel.processes().pids_in(StateMask::LIVE).is_empty());
        assert_eq!(kernel.memory().free_total(), kernel.memory().capacity());
    }
}
