//! Снимок состояния для вывода / State snapshot for display

use alloc::vec::Vec;
use core::fmt;
use libossim::{Extent, Pid};

use crate::config::LEVELS;
use crate::mm::FreeListAllocator;
use crate::proc::{Process, Registry};
use crate::sched::Scheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// В порядке pid / In pid order.
    pub processes: Vec<Process>,
    pub free_list: Vec<Extent>,
    pub ready:     [Vec<Pid>; LEVELS],
    pub blocked:   Vec<Pid>,
    pub clock:     u64,
}

impl Snapshot {
    pub(crate) fn capture(procs: &Registry, mm: &FreeListAllocator, sched: &Scheduler) -> Self {
        let queues = sched.queues();
        Self {
            processes: procs.iter().cloned().collect(),
            free_list: mm.free_extents().to_vec(),
            ready:     core::array::from_fn(|level| queues.ready(level).iter().copied().collect()),
            blocked:   queues.blocked().to_vec(),
            clock:     sched.clock(),
        }
    }
}

struct Block(Option<Extent>);

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(extent) => f.pad(&alloc::format!("{extent}")),
            None => f.pad("None"),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PID | Name     | State      | RemainingBurst | Priority | MemBlock      | IOwait | Level")?;
        for p in &self.processes {
            writeln!(
                f,
                "{:3} | {:8} | {:10} | {:14} | {:8} | {:13} | {:6} | {}",
                p.pid.0,
                p.name,
                p.state,
                p.remaining_burst,
                p.priority_hint,
                Block(p.memory_block),
                p.io_wait_remaining,
                p.last_queue_level,
            )?;
        }

        f.write_str("Memory free blocks: [")?;
        for (i, extent) in self.free_list.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{extent}")?;
        }
        writeln!(f, "]")?;

        for (level, queue) in self.ready.iter().enumerate() {
            write!(f, "Ready[{level}]: ")?;
            write_pids(f, queue)?;
            writeln!(f)?;
        }
        f.write_str("Blocked: ")?;
        write_pids(f, &self.blocked)?;
        write!(f, " | clock={}", self.clock)
    }
}

fn write_pids(f: &mut fmt::Formatter<'_>, pids: &[Pid]) -> fmt::Result {
    f.write_str("[")?;
    for (i, pid) in pids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{pid}")?;
    }
    f.write_str("]")
}
