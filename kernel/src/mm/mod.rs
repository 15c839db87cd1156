//! Memory Management subsystem
//!
//! Один уровень / One layer:
//!   freelist — непрерывная память, first-fit + слияние при освобождении
//!              contiguous memory, first-fit + coalescing on free
//!
//! Страничной памяти нет: процесс владеет максимум одним регионом.
//! There is no paging: a process owns at most one extent.

pub mod freelist;

pub use freelist::FreeListAllocator;
