//! Источник I/O прерываний / I/O interrupt source
//!
//! Планировщик спрашивает на каждом микротике, не ушёл ли процесс в I/O.
//! The scheduler asks on every micro-tick whether the process went to I/O.
//! Тесты подставляют детерминированную реализацию.
//! Tests plug in a deterministic implementation.

use core::ops::RangeInclusive;
use libossim::Pid;

use crate::config::{Config, DEFAULT_SEED};

pub trait IoSource: Send {
    /// Прервать ли квант на тике `tick` / Interrupt the quantum at `tick`?
    fn should_interrupt(&mut self, tick: u64, pid: Pid) -> bool;

    /// Сколько тиков ждать I/O / How many ticks the I/O takes.
    fn io_wait(&mut self, pid: Pid) -> u32;
}

/// Никогда не прерывает / Never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIo;

impl IoSource for NoIo {
    fn should_interrupt(&mut self, _tick: u64, _pid: Pid) -> bool {
        false
    }

    fn io_wait(&mut self, _pid: Pid) -> u32 {
        0
    }
}

/// Xorshift64 — псевдослучайные прерывания с заданной вероятностью.
/// Xorshift64 — pseudo-random interrupts with a configured chance.
#[derive(Debug, Clone)]
pub struct XorShiftIo {
    state:           u64,
    chance_permille: u32,
    wait:            RangeInclusive<u32>,
}

impl XorShiftIo {
    pub fn new(seed: u64, chance_permille: u32, wait: RangeInclusive<u32>) -> Self {
        // нулевое состояние xorshift не покидает / xorshift never leaves zero
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state, chance_permille, wait }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.seed, config.io_chance_permille, config.io_wait.clone())
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl IoSource for XorShiftIo {
    fn should_interrupt(&mut self, _tick: u64, _pid: Pid) -> bool {
        self.next_u64() % 1000 < u64::from(self.chance_permille)
    }

    fn io_wait(&mut self, _pid: Pid) -> u32 {
        let (lo, hi) = (*self.wait.start(), *self.wait.end());
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        lo + (self.next_u64() % span) as u32
    }
}
