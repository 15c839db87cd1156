//! Конфигурация симулятора / Simulator configuration
//!
//! Значения по умолчанию / Defaults:
//!   память  — 1024 единицы / units
//!   кванты  — 4 / 8 / 16 тиков на уровнях 0 / 1 / 2
//!   I/O     — 5% шанс на каждом микротике, ожидание 2..=5 тиков

use core::ops::RangeInclusive;

/// Размер адресного пространства / Address space size
pub const MEMORY_SIZE: usize = 1024;

/// Количество уровней MLFQ / Number of MLFQ levels
pub const LEVELS: usize = 3;

/// Квант на уровень (уровень 0 — самый приоритетный).
/// Quantum per level (level 0 is the highest priority).
pub const QUANTA: [u32; LEVELS] = [4, 8, 16];

/// Шанс I/O прерывания в промилле / I/O interrupt chance, per mille
pub const IO_CHANCE_PERMILLE: u32 = 50;

pub const IO_WAIT_MIN: u32 = 2;
pub const IO_WAIT_MAX: u32 = 5;

pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub memory_size:        usize,
    pub quanta:             [u32; LEVELS],
    pub io_chance_permille: u32,
    pub io_wait:            RangeInclusive<u32>,
    pub seed:               u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_size:        MEMORY_SIZE,
            quanta:             QUANTA,
            io_chance_permille: IO_CHANCE_PERMILLE,
            io_wait:            IO_WAIT_MIN..=IO_WAIT_MAX,
            seed:               DEFAULT_SEED,
        }
    }
}

impl Config {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_quanta(mut self, quanta: [u32; LEVELS]) -> Self {
        self.quanta = quanta;
        self
    }

    /// Значения выше 1000 означают прерывание на каждом тике.
    /// Values above 1000 mean an interrupt on every tick.
    pub fn with_io_chance_permille(mut self, permille: u32) -> Self {
        self.io_chance_permille = permille;
        self
    }

    pub fn with_io_wait(mut self, io_wait: RangeInclusive<u32>) -> Self {
        self.io_wait = io_wait;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
