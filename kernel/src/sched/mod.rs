//! Scheduler — MLFQ + I/O-aware
//!
//! Multilevel Feedback Queue с round-robin внутри уровня.
//! Multilevel Feedback Queue with round-robin inside each level.
//!
//! Очереди / Queues (кванты по умолчанию / default quanta):
//!   0 →  4 тика — новые процессы и I/O пробуждения (highest priority)
//!   1 →  8 тиков
//!   2 → 16 тиков — CPU-bound задачи                (lowest priority)
//!
//! Процесс, выработавший квант, спускается на уровень ниже.
//! A process that uses up its quantum drops one level.
//! Пробуждение после I/O ВСЕГДА идёт в очередь 0.
//! I/O wake-up ALWAYS goes to queue 0.
//!
//! Подъёма для CPU-bound задач нет: на нижнем уровне они могут голодать,
//! пока идёт поток коротких задач.
//! There is no boost for CPU-bound work: at the lowest level it can starve
//! while short jobs keep arriving.

pub mod io;
pub mod queues;
pub mod stats;

use alloc::boxed::Box;
use libossim::ProcessState;
use log::{debug, info, trace};

use crate::config::LEVELS;
use crate::mm::FreeListAllocator;
use crate::proc::{Process, Registry};

pub use io::{IoSource, NoIo, XorShiftIo};
pub use queues::RunQueues;
pub use stats::{RunOutcome, RunStats, Turnaround};

pub struct Scheduler {
    queues: RunQueues,
    quanta: [u32; LEVELS],
    io:     Box<dyn IoSource>,
    clock:  u64,
}

impl Scheduler {
    pub fn new(quanta: [u32; LEVELS], io: Box<dyn IoSource>) -> Self {
        // квант 0 зациклил бы прогон без продвижения часов
        // a zero quantum would spin the loop without advancing the clock
        let quanta = quanta.map(|q| q.max(1));
        Self { queues: RunQueues::new(), quanta, io, clock: 0 }
    }

    /// Глобальные часы в тиках / Global clock in ticks.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn queues(&self) -> &RunQueues {
        &self.queues
    }

    pub(crate) fn queues_mut(&mut self) -> &mut RunQueues {
        &mut self.queues
    }

    pub fn set_io_source(&mut self, io: Box<dyn IoSource>) {
        self.io = io;
    }

    /// Крутить планировщик, пока есть работа или не кончится `max_ticks`.
    /// Run until no work is left or `max_ticks` ticks have passed.
    ///
    /// Бюджет проверяется перед каждым шагом; начатый квант доигрывается.
    /// Состояние сохраняется между вызовами.
    /// The budget is checked before each step; a started quantum runs to its
    /// end. State carries over between calls.
    pub fn run(
        &mut self,
        procs: &mut Registry,
        mm: &mut FreeListAllocator,
        max_ticks: u64,
    ) -> RunStats {
        let start = self.clock;

        while self.clock - start < max_ticks {
            self.wake_blocked(procs);

            let Some((pid, level)) = self.queues.pop_ready() else {
                if self.queues.is_idle() {
                    info!("[sched] no ready processes, scheduler idle");
                    break;
                }
                // CPU простаивает, пока все ждут I/O / CPU idles while all wait on I/O
                self.clock += 1;
                trace!("[sched] tick {}: all processes blocked", self.clock);
                continue;
            };

            match procs.get_mut(pid) {
                Some(proc) if proc.state == ProcessState::Ready => self.dispatch(proc, level, mm),
                _ => trace!("[sched] skipping stale pid={} at level {}", pid, level),
            }
        }

        let outcome = if self.queues.is_idle() {
            RunOutcome::Idle
        } else {
            RunOutcome::TickBudgetExhausted
        };
        let stats = RunStats::collect(procs, self.clock - start, outcome);
        info!("[sched] run finished after {} tick(s), {} completed", stats.ticks, stats.completed.len());
        stats
    }

    /// Шаг 1: отсчитать I/O, проснувшиеся — в очередь 0 в порядке блокировки.
    /// Step 1: count down I/O, wake-ups go to level 0 in blocking order.
    fn wake_blocked(&mut self, procs: &mut Registry) {
        let RunQueues { ready, blocked } = &mut self.queues;

        blocked.retain(|&pid| {
            let Some(proc) = procs.get_mut(pid) else { return false };
            if proc.state != ProcessState::Blocked {
                return false;
            }

            proc.io_wait_remaining = proc.io_wait_remaining.saturating_sub(1);
            if proc.io_wait_remaining > 0 {
                return true;
            }

            proc.state = ProcessState::Ready;
            proc.last_queue_level = 0;
            ready[0].push_back(pid);
            info!("[sched] pid={} I/O complete, moved to ready (level 0)", pid);
            false
        });
    }

    /// Шаги 3–4: квант на уровне `level`, затем завершение/блок/понижение.
    /// Steps 3–4: one quantum at `level`, then finish / block / demote.
    fn dispatch(&mut self, proc: &mut Process, level: usize, mm: &mut FreeListAllocator) {
        let quantum = self.quanta[level];
        let run_time = quantum.min(proc.remaining_burst);

        proc.state = ProcessState::Running;
        proc.last_queue_level = level;
        debug!(
            "[sched] tick {}: running pid={} at level={} for up to {} tick(s) (quantum={})",
            self.clock, proc.pid, level, run_time, quantum
        );

        for _ in 0..run_time {
            self.clock += 1;
            proc.remaining_burst -= 1;

            if proc.remaining_burst == 0 {
                break;
            }
            if self.io.should_interrupt(self.clock, proc.pid) {
                self.block_running(proc);
                return;
            }
        }

        if proc.remaining_burst == 0 {
            proc.terminate(self.clock, mm);
            info!("[sched] tick {}: pid={} finished execution", self.clock, proc.pid);
            return;
        }

        let next = (level + 1).min(LEVELS - 1);
        proc.state = ProcessState::Ready;
        proc.last_queue_level = next;
        self.queues.push_ready(next, proc.pid);
        debug!("[sched] tick {}: pid={} quantum expired, demoted to level {}", self.clock, proc.pid, next);
    }

    fn block_running(&mut self, proc: &mut Process) {
        let wait = self.io.io_wait(proc.pid);
        proc.state = ProcessState::Blocked;
        proc.io_wait_remaining = wait;
        self.queues.block(proc.pid);
        info!("[sched] tick {}: pid={} blocked for I/O (will wait {})", self.clock, proc.pid, wait);
    }
}

#[cfg(test)]
mod tests;
