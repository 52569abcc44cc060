//! Mock line adapter and clocks shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use softuart_hal::{BitClock, Config, LineIo, Pin, PinFunction, PinState, SoftUart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFault;

#[derive(Debug, Default)]
pub struct LineState {
    pub functions: HashMap<Pin, PinFunction>,
    pub levels: HashMap<Pin, PinState>,
    pub writes: Vec<(Pin, PinState)>,
    pub reads: usize,
    /// writes to the first pin also drive the second
    pub wires: Vec<(Pin, Pin)>,
    pub fail_function_on: Option<Pin>,
}

/// GPIO bank whose state stays inspectable after the adapter is moved
#[derive(Debug, Clone, Default)]
pub struct MockLine(pub Arc<Mutex<LineState>>);

impl MockLine {
    pub fn wire(&self, from: Pin, to: Pin) {
        self.0.lock().unwrap().wires.push((from, to));
    }

    pub fn drive(&self, pin: Pin, level: PinState) {
        self.0.lock().unwrap().levels.insert(pin, level);
    }

    pub fn function(&self, pin: Pin) -> Option<PinFunction> {
        self.0.lock().unwrap().functions.get(&pin).copied()
    }

    pub fn writes(&self) -> Vec<(Pin, PinState)> {
        self.0.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.0.lock().unwrap().writes.clear();
    }

    pub fn reads(&self) -> usize {
        self.0.lock().unwrap().reads
    }

    pub fn fail_function_on(&self, pin: Pin) {
        self.0.lock().unwrap().fail_function_on = Some(pin);
    }
}

impl LineIo for MockLine {
    type Error = LineFault;

    fn set_pin_function(&mut self, pin: Pin, function: PinFunction) -> Result<(), LineFault> {
        let mut state = self.0.lock().unwrap();
        if state.fail_function_on == Some(pin) {
            return Err(LineFault);
        }
        state.functions.insert(pin, function);
        Ok(())
    }

    fn write_pin(&mut self, pin: Pin, level: PinState) -> Result<(), LineFault> {
        let mut state = self.0.lock().unwrap();
        state.writes.push((pin, level));
        state.levels.insert(pin, level);
        let wired: Vec<Pin> = state
            .wires
            .iter()
            .filter(|&&(from, _)| from == pin)
            .map(|&(_, to)| to)
            .collect();
        for to in wired {
            state.levels.insert(to, level);
        }
        Ok(())
    }

    fn read_pin(&mut self, pin: Pin) -> Result<PinState, LineFault> {
        let mut state = self.0.lock().unwrap();
        state.reads += 1;
        // idle line is pulled high
        Ok(state.levels.get(&pin).copied().unwrap_or(PinState::High))
    }
}

#[derive(Debug, Default)]
pub struct ClockState {
    pub scheduled: Vec<Duration>,
    pub armed: bool,
    pub cancels: usize,
    pub fail: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFault;

#[derive(Debug, Clone, Default)]
pub struct MockClock(pub Arc<Mutex<ClockState>>);

impl MockClock {
    /// Consume a pending firing, if any
    pub fn fire(&self) -> bool {
        let mut state = self.0.lock().unwrap();
        std::mem::replace(&mut state.armed, false)
    }

    pub fn is_armed(&self) -> bool {
        self.0.lock().unwrap().armed
    }

    pub fn scheduled(&self) -> Vec<Duration> {
        self.0.lock().unwrap().scheduled.clone()
    }

    pub fn cancels(&self) -> usize {
        self.0.lock().unwrap().cancels
    }

    pub fn set_fail(&self, fail: bool) {
        self.0.lock().unwrap().fail = fail;
    }
}

impl BitClock for MockClock {
    type Error = ClockFault;

    fn schedule_once(&mut self, delay: Duration) -> Result<(), ClockFault> {
        let mut state = self.0.lock().unwrap();
        if state.fail {
            return Err(ClockFault);
        }
        state.scheduled.push(delay);
        state.armed = true;
        Ok(())
    }

    fn cancel(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.armed = false;
        state.cancels += 1;
    }
}

pub type Uart = SoftUart<MockLine, MockClock>;

pub struct Bench {
    pub uart: Uart,
    pub line: MockLine,
    pub tx_clock: MockClock,
    pub rx_clock: MockClock,
}

impl Bench {
    pub fn new(config: Config) -> Self {
        let line = MockLine::default();
        let tx_clock = MockClock::default();
        let rx_clock = MockClock::default();
        let uart = SoftUart::new(config, line.clone(), tx_clock.clone(), rx_clock.clone());
        Bench { uart, line, tx_clock, rx_clock }
    }

    /// Bench with TX looped back to RX on the wire
    pub fn wired(config: Config) -> Self {
        let bench = Bench::new(config);
        bench.line.wire(config.tx_pin, config.rx_pin);
        bench
    }

    /// One bit period: TX fires first, RX samples what it drove
    pub fn step(&self) {
        if self.tx_clock.fire() {
            self.uart.tx_tick();
        }
        if self.rx_clock.fire() {
            self.uart.rx_tick();
        }
    }

    pub fn run(&self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }
}

/// Line levels of one 8N1 frame as 0/1
pub fn frame_bits(byte: u8) -> Vec<u8> {
    let mut bits = vec![0];
    bits.extend((0..8).map(|n| (byte >> n) & 1));
    bits.push(1);
    bits
}

pub fn levels(writes: &[(Pin, PinState)]) -> Vec<u8> {
    writes.iter().map(|&(_, level)| (level == PinState::High) as u8).collect()
}
