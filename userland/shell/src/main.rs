//! OSSim shell — интерактивный симулятор / interactive simulator
//!
//! Запуск / Run:
//!   OSSIM_LOG=debug ossim [seed]
//!
//! `seed` задаёт псевдослучайные I/O прерывания планировщика.
//! `seed` drives the scheduler's pseudo-random I/O interrupts.

mod console;
mod fs;
mod shell;

use std::io;
use std::process::ExitCode;

use ossim_kernel::{Config, Kernel};

use shell::Shell;

fn main() -> ExitCode {
    let level = console::parse_level(std::env::var(console::LOG_ENV).ok().as_deref());
    if let Err(err) = console::init(level) {
        eprintln!("logger init failed: {err}");
    }

    let mut config = Config::default();
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<u64>() {
            Ok(seed) => config = config.with_seed(seed),
            Err(_) => {
                eprintln!("usage: ossim [seed]  (seed must be an unsigned integer, got {arg:?})");
                return ExitCode::FAILURE;
            }
        }
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(Kernel::new(config), stdin.lock(), io::stdout());
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("[shell] i/o error: {err}");
            ExitCode::FAILURE
        }
    }
}
