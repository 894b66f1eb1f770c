//! Shared mocks for integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dotmg_tones::audio::{MuteGate, ToneScheduler, ToneTimer, WaveformSink};
use dotmg_tones::config::ToneConfig;

/// Everything the timer was told
#[derive(Debug, Default)]
pub struct TimerLog {
    pub periods: Vec<u32>,
    pub running: bool,
    pub enables: u32,
    pub disables: u32,
}

#[derive(Clone, Default)]
pub struct MockTimer(pub Rc<RefCell<TimerLog>>);

impl ToneTimer for MockTimer {
    fn set_period(&mut self, period: u32) {
        self.0.borrow_mut().periods.push(period);
    }

    fn enable(&mut self) {
        let mut log = self.0.borrow_mut();
        log.running = true;
        log.enables += 1;
    }

    fn disable(&mut self) {
        let mut log = self.0.borrow_mut();
        log.running = false;
        log.disables += 1;
    }
}

/// Every level written to the output
#[derive(Debug, Default)]
pub struct SinkLog {
    pub samples: Vec<u16>,
    pub enabled: bool,
}

#[derive(Clone, Default)]
pub struct RecordingSink(pub Rc<RefCell<SinkLog>>);

impl WaveformSink for RecordingSink {
    fn write_sample(&mut self, level: u16) {
        self.0.borrow_mut().samples.push(level);
    }

    fn enable(&mut self) {
        self.0.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.0.borrow_mut().enabled = false;
    }
}

/// Mute switch that counts how often it is asked
#[derive(Clone)]
pub struct MockGate {
    pub open: Rc<Cell<bool>>,
    pub queries: Rc<Cell<u32>>,
}

impl MuteGate for MockGate {
    fn sound_enabled(&mut self) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.open.get()
    }
}

/// Handles kept by the test after the mocks move into the scheduler
pub struct Recorder {
    pub timer: Rc<RefCell<TimerLog>>,
    pub sink: Rc<RefCell<SinkLog>>,
    pub open: Rc<Cell<bool>>,
    pub queries: Rc<Cell<u32>>,
}

impl Recorder {
    pub fn samples(&self) -> Vec<u16> {
        self.sink.borrow().samples.clone()
    }

    pub fn sample_count(&self) -> usize {
        self.sink.borrow().samples.len()
    }

    pub fn periods(&self) -> Vec<u32> {
        self.timer.borrow().periods.clone()
    }

    pub fn last_period(&self) -> Option<u32> {
        self.timer.borrow().periods.last().copied()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.borrow().running
    }

    pub fn mute(&self) {
        self.open.set(false);
    }

    pub fn unmute(&self) {
        self.open.set(true);
    }

    pub fn gate_queries(&self) -> u32 {
        self.queries.get()
    }
}

pub type TestScheduler<'a> = ToneScheduler<'a, MockTimer, RecordingSink, MockGate>;

/// Mocks for a scheduler plus the handles to inspect them.
pub fn mocks() -> (MockTimer, RecordingSink, MockGate, Recorder) {
    let timer = MockTimer::default();
    let sink = RecordingSink::default();
    let gate = MockGate {
        open: Rc::new(Cell::new(true)),
        queries: Rc::new(Cell::new(0)),
    };
    let rec = Recorder {
        timer: timer.0.clone(),
        sink: sink.0.clone(),
        open: gate.open.clone(),
        queries: gate.queries.clone(),
    };
    (timer, sink, gate, rec)
}

/// Scheduler on the DOTMG configuration.
pub fn rig<'a>() -> (TestScheduler<'a>, Recorder) {
    let (timer, sink, gate, rec) = mocks();
    (ToneScheduler::new(ToneConfig::DOTMG, timer, sink, gate), rec)
}

/// Tick until idle, at most `limit` times. Returns the ticks used.
pub fn run_until_idle(scheduler: &mut TestScheduler<'_>, limit: usize) -> usize {
    let mut ticks = 0;
    while scheduler.is_playing() && ticks < limit {
        scheduler.tick();
        ticks += 1;
    }
    ticks
}

/// Tick exactly `n` times.
pub fn run_ticks(scheduler: &mut TestScheduler<'_>, n: usize) {
    for _ in 0..n {
        scheduler.tick();
    }
}
