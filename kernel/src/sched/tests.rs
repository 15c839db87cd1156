use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use libossim::{Extent, Pid, ProcessState, StateMask};

use super::{IoSource, NoIo, RunOutcome};
use crate::{Config, Kernel};

/// Прерывает на заданных глобальных тиках / Interrupts at the given global ticks.
struct InterruptAt {
    ticks: Vec<u64>,
    wait:  u32,
}

impl IoSource for InterruptAt {
    fn should_interrupt(&mut self, tick: u64, _pid: Pid) -> bool {
        self.ticks.contains(&tick)
    }

    fn io_wait(&mut self, _pid: Pid) -> u32 {
        self.wait
    }
}

fn quiet_kernel() -> Kernel {
    Kernel::with_io_source(Config::default(), Box::new(NoIo))
}

fn level(k: &Kernel, pid: Pid) -> usize {
    k.process(pid).unwrap().last_queue_level
}

fn remaining(k: &Kernel, pid: Pid) -> u32 {
    k.process(pid).unwrap().remaining_burst
}

#[test]
fn empty_kernel_is_idle_immediately() {
    let mut k = quiet_kernel();
    let stats = k.run_scheduler(100);
    assert_eq!(stats.outcome, RunOutcome::Idle);
    assert_eq!(stats.ticks, 0);
    assert!(stats.completed.is_empty());
}

#[test]
fn zero_burst_terminates_without_micro_ticks() {
    let mut k = quiet_kernel();
    let x = k.create_process("x", 0, 0);
    let stats = k.run_scheduler(100);

    let px = k.process(x).unwrap();
    assert_eq!(px.state, ProcessState::Terminated);
    assert_eq!(px.remaining_burst, 0);
    assert_eq!(k.clock(), 0);
    assert_eq!(stats.completed[&x].turnaround, 0);
    assert_eq!(stats.outcome, RunOutcome::Idle);
}

#[test]
fn end_to_end_three_bursts() {
    let mut k = quiet_kernel();
    let short = k.create_process("short", 2, 0);
    let mid = k.create_process("mid", 10, 0);
    let long = k.create_process("long", 20, 0);

    let stats = k.run_scheduler(1000);
    assert_eq!(stats.outcome, RunOutcome::Idle);
    assert_eq!(stats.completed.len(), 3);

    // short: 2 ticks at L0; mid: 4 at L0 + 6 at L1; long: 4 + 8 + 8
    assert_eq!(stats.completed[&short].turnaround, 2);
    assert_eq!(stats.completed[&mid].turnaround, 16);
    assert_eq!(stats.completed[&long].turnaround, 32);
    assert_eq!(stats.ticks, 32);

    for (pid, burst, name) in [(short, 2, "short"), (mid, 10, "mid"), (long, 20, "long")] {
        assert_eq!(stats.completed[&pid].original_burst, burst);
        assert_eq!(stats.completed[&pid].name, name);
    }

    let first = k
        .processes()
        .iter()
        .min_by_key(|p| p.finished_at)
        .map(|p| p.pid);
    assert_eq!(first, Some(short));
}

#[test]
fn higher_level_is_selected_regardless_of_insertion_order() {
    let mut k = quiet_kernel();
    let old = k.create_process("old", 30, 0);
    k.run_scheduler(1);
    assert_eq!(level(&k, old), 1);

    let new = k.create_process("new", 10, 0);
    k.run_scheduler(1);

    assert_eq!(remaining(&k, new), 6);
    assert_eq!(remaining(&k, old), 26);
}

#[test]
fn demotion_is_monotonic_and_capped() {
    let mut k = quiet_kernel();
    let a = k.create_process("cpu", 100, 0);

    let mut levels = Vec::new();
    for _ in 0..4 {
        k.run_scheduler(1);
        levels.push(level(&k, a));
    }
    assert_eq!(levels, [1, 2, 2, 2]);
    assert_eq!(remaining(&k, a), 100 - 4 - 8 - 16 - 16);
}

#[test]
fn io_unblock_restores_level_zero() {
    let mut k = quiet_kernel();
    let a = k.create_process("cpu", 100, 0);
    k.run_scheduler(12);
    assert_eq!(level(&k, a), 2);

    k.block_process(a, 2).unwrap();
    k.run_scheduler(3);

    // one idle tick, then a level-0 quantum of 4 and a demotion to 1
    assert_eq!(k.clock(), 17);
    assert_eq!(remaining(&k, a), 84);
    assert_eq!(level(&k, a), 1);
}

#[test]
fn io_interrupt_blocks_and_keeps_memory() {
    let io = InterruptAt { ticks: vec![2], wait: 3 };
    let mut k = Kernel::with_io_source(Config::default(), Box::new(io));
    let a = k.create_process("io", 10, 0);
    let block = k.allocate_memory_to_process(a, 50).unwrap();

    let stats = k.run_scheduler(1);
    let pa = k.process(a).unwrap();
    assert_eq!(pa.state, ProcessState::Blocked);
    assert_eq!(pa.remaining_burst, 8);
    assert_eq!(pa.io_wait_remaining, 3);
    assert_eq!(pa.memory_block, Some(block));
    assert_eq!(k.scheduler().queues().blocked(), &[a]);
    assert_eq!(stats.outcome, RunOutcome::TickBudgetExhausted);

    let stats = k.run_scheduler(100);
    let pa = k.process(a).unwrap();
    assert_eq!(pa.state, ProcessState::Terminated);
    // 2 idle ticks, wake at 4, 4 ticks at L0, 4 ticks at L1
    assert_eq!(pa.finished_at, Some(12));
    assert_eq!(pa.memory_block, None);
    assert_eq!(k.memory().free_extents(), &[Extent::new(0, 1024)]);
    assert_eq!(stats.outcome, RunOutcome::Idle);
}

#[test]
fn zero_quanta_run_one_tick_per_dispatch() {
    let config = Config::default().with_quanta([0, 0, 0]);
    let mut k = Kernel::with_io_source(config, Box::new(NoIo));
    let a = k.create_process("a", 3, 0);

    k.run_scheduler(1);
    assert_eq!(k.clock(), 1);
    assert_eq!(level(&k, a), 1);

    let stats = k.run_scheduler(100);
    assert_eq!(k.process(a).unwrap().finished_at, Some(3));
    assert_eq!(level(&k, a), 2);
    assert_eq!(stats.outcome, RunOutcome::Idle);
}

#[test]
fn simultaneous_wake_ups_keep_blocking_order() {
    let mut k = quiet_kernel();
    let c = k.create_process("cpu", 8, 0);
    let a = k.create_process("a", 5, 0);
    let b = k.create_process("b", 5, 0);
    k.block_process(b, 1).unwrap();
    k.block_process(a, 1).unwrap();
    assert_eq!(k.scheduler().queues().blocked(), &[b, a]);

    // both wake in the first step, behind `c`, which then runs its quantum
    k.run_scheduler(1);
    let ready0: Vec<Pid> = k.scheduler().queues().ready(0).iter().copied().collect();
    assert_eq!(ready0, [b, a]);
    assert_eq!(level(&k, c), 1);
    assert!(k.scheduler().queues().blocked().is_empty());

    k.run_scheduler(1);
    assert_eq!(remaining(&k, b), 1);
    assert_eq!(remaining(&k, a), 5);
}

#[test]
fn blocked_only_work_advances_clock() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 1, 0);
    k.block_process(a, 3).unwrap();

    let stats = k.run_scheduler(100);
    assert_eq!(k.process(a).unwrap().finished_at, Some(3));
    assert_eq!(stats.ticks, 3);
    assert_eq!(stats.outcome, RunOutcome::Idle);
}

#[test]
fn blocked_work_respects_tick_budget() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 1, 0);
    k.block_process(a, 50).unwrap();

    let stats = k.run_scheduler(5);
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.outcome, RunOutcome::TickBudgetExhausted);
    assert_eq!(k.process(a).unwrap().io_wait_remaining, 45);
}

#[test]
fn natural_completion_releases_memory() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 3, 0);
    let b = k.create_process("b", 3, 0);
    k.allocate_memory_to_process(a, 100).unwrap();
    k.allocate_memory_to_process(b, 200).unwrap();

    k.run_scheduler(100);
    assert_eq!(k.process(a).unwrap().memory_block, None);
    assert_eq!(k.process(b).unwrap().memory_block, None);
    assert_eq!(k.memory().free_extents(), &[Extent::new(0, 1024)]);
}

#[test]
fn killed_process_never_runs() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 5, 0);
    let b = k.create_process("b", 5, 0);
    k.kill_process(a).unwrap();

    let stats = k.run_scheduler(100);
    assert_eq!(remaining(&k, a), 5);
    assert_eq!(stats.completed[&a].turnaround, 0);
    assert_eq!(stats.completed[&b].turnaround, 5);
}

#[test]
fn run_is_resumable() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 50, 0);

    let first = k.run_scheduler(10);
    assert_eq!(first.outcome, RunOutcome::TickBudgetExhausted);
    assert_eq!(first.ticks, 12);
    assert!(first.completed.is_empty());
    assert_eq!(k.process(a).unwrap().state, ProcessState::Ready);
    assert_eq!(remaining(&k, a), 38);

    let second = k.run_scheduler(1000);
    assert_eq!(second.outcome, RunOutcome::Idle);
    assert_eq!(second.completed[&a].turnaround, 50);
}

#[test]
fn zero_budget_runs_nothing() {
    let mut k = quiet_kernel();
    let a = k.create_process("a", 5, 0);
    let stats = k.run_scheduler(0);
    assert_eq!(stats.outcome, RunOutcome::TickBudgetExhausted);
    assert_eq!(remaining(&k, a), 5);
}

#[test]
fn lowest_level_job_starves_under_short_job_churn() {
    let mut k = quiet_kernel();
    let long = k.create_process("long", 1000, 0);
    k.run_scheduler(12);
    assert_eq!(level(&k, long), 2);
    let before = remaining(&k, long);

    for _ in 0..10 {
        let short = k.create_process("short", 4, 0);
        k.run_scheduler(4);
        assert_eq!(k.process(short).unwrap().state, ProcessState::Terminated);
    }

    // no aging-up: the long job got nothing while short jobs kept coming
    assert_eq!(remaining(&k, long), before);
}

#[test]
fn seeded_random_io_still_drains_everything() {
    let config = Config::default().with_seed(42).with_io_chance_permille(200);
    let mut k = Kernel::new(config);
    let pids: Vec<Pid> = (0..6).map(|i| k.create_process("job", 5 + 7 * i, 0)).collect();
    for (i, &pid) in pids.iter().enumerate() {
        k.allocate_memory_to_process(pid, 32 * (i + 1)).unwrap();
    }

    let stats = k.run_scheduler(100_000);
    assert_eq!(stats.outcome, RunOutcome::Idle);
    assert_eq!(stats.completed.len(), 6);
    assert!(k.processes().pids_in(StateMask::LIVE).is_empty());
    assert_eq!(k.memory().free_total(), 1024);

    // busy ticks equal total burst; idle I/O ticks only add to the clock
    let total: u64 = (0..6).map(|i| 5 + 7 * i as u64).sum();
    assert!(k.clock() >= total);
}
