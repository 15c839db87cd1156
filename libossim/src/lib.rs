//! libossim — общие типы симулятора / shared simulator types
//!
//! Идентификаторы, регионы памяти, состояния процессов и ошибки.
//! Identifiers, memory extents, process states and errors.
//!
//! Использование / Usage:
//!   use libossim::{Pid, Extent, Result};
//!   let block: Extent = kernel.allocate_memory_to_process(pid, 64)?;

#![no_std]

use core::fmt;
use bitflags::bitflags;

/// Идентификатор процесса / Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Непрерывный регион памяти / Contiguous memory extent `[start, start + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Extent {
    pub start: usize,
    pub size:  usize,
}

impl Extent {
    pub const fn new(start: usize, size: usize) -> Self { Self { start, size } }
    /// Не переполняется: конец за `usize::MAX` прижимается к нему.
    /// Never overflows: an end past `usize::MAX` saturates.
    pub const fn end(self) -> usize { self.start.saturating_add(self.size) }

    /// `self` заканчивается ровно там, где начинается `next`.
    /// `self` ends exactly where `next` begins.
    pub const fn touches(self, next: Extent) -> bool { self.end() == next.start }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.size)
    }
}

/// Состояние процесса / Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
    Blocked,
    Terminated,
}

impl ProcessState {
    pub const fn mask(self) -> StateMask {
        match self {
            ProcessState::Ready      => StateMask::READY,
            ProcessState::Running    => StateMask::RUNNING,
            ProcessState::Blocked    => StateMask::BLOCKED,
            ProcessState::Terminated => StateMask::TERMINATED,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ProcessState::Ready      => "READY",
            ProcessState::Running    => "RUNNING",
            ProcessState::Blocked    => "BLOCKED",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

bitflags! {
    /// Набор состояний для выборок / State set for registry queries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateMask: u8 {
        const READY      = 1 << 0;
        const RUNNING    = 1 << 1;
        const BLOCKED    = 1 << 2;
        const TERMINATED = 1 << 3;

        /// Всё, что ещё может получить CPU / Everything that may still get CPU
        const LIVE = Self::READY.bits() | Self::RUNNING.bits() | Self::BLOCKED.bits();
    }
}

impl StateMask {
    pub const fn matches(self, state: ProcessState) -> bool {
        self.contains(state.mask())
    }
}

/// Ошибки операций ядра / Kernel operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    NotFound(Pid),
    AlreadyTerminated(Pid),
    AlreadyAllocated(Pid, Extent),
    NoBlock(Pid),
    OutOfMemory { requested: usize, largest_free: usize },
    InvalidSize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(pid)          => write!(f, "no such pid {pid}"),
            Error::AlreadyTerminated(pid) => write!(f, "pid {pid} already terminated"),
            Error::AlreadyAllocated(pid, block) => {
                write!(f, "pid {pid} already has memory allocated: {block}")
            }
            Error::NoBlock(pid)           => write!(f, "pid {pid} has no memory allocated"),
            Error::OutOfMemory { requested, largest_free } => {
                write!(f, "not enough memory: requested {requested}, largest free extent {largest_free}")
            }
            Error::InvalidSize            => f.write_str("allocation size must be positive"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
