//! Итоги прогона планировщика / Scheduler run results

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use libossim::Pid;

use crate::proc::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turnaround {
    pub turnaround:     u64,
    pub name:           String,
    pub original_burst: u32,
}

/// Почему прогон остановился / Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Нет ни готовых, ни заблокированных / Nothing ready or blocked.
    Idle,
    /// Бюджет тиков исчерпан, работа осталась / Tick budget spent, work left.
    TickBudgetExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub completed: BTreeMap<Pid, Turnaround>,
    pub ticks:     u64,
    pub outcome:   RunOutcome,
}

impl RunStats {
    pub(crate) fn collect(procs: &Registry, ticks: u64, outcome: RunOutcome) -> Self {
        let completed = procs
            .iter()
            .filter_map(|p| {
                let turnaround = p.turnaround()?;
                Some((p.pid, Turnaround {
                    turnaround,
                    name: p.name.clone(),
                    original_burst: p.original_burst,
                }))
            })
            .collect();

        Self { completed, ticks, outcome }
    }

    pub fn average_turnaround(&self) -> Option<f64> {
        if self.completed.is_empty() {
            return None;
        }
        let total: u64 = self.completed.values().map(|t| t.turnaround).sum();
        Some(total as f64 / self.completed.len() as f64)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pid, t) in &self.completed {
            writeln!(
                f,
                "PID={} Name={} Turnaround={} ticks Burst={}",
                pid, t.name, t.turnaround, t.original_burst
            )?;
        }
        match self.outcome {
            RunOutcome::Idle => write!(f, "{} tick(s), scheduler idle", self.ticks),
            RunOutcome::TickBudgetExhausted => {
                write!(f, "{} tick(s), tick budget exhausted", self.ticks)
            }
        }
    }
}
