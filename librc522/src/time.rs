// librc522-rs/librc522/src/time.rs

//! Timing collaborator used by the polling loops.
//!
//! Every blocking wait in the driver is a bounded poll against a deadline
//! taken from this clock, with a cooperative yield on each iteration. The
//! trait keeps the driver testable: `StdClock` for real hardware, `MockClock`
//! for deterministic unit tests.

use std::time::{Duration, Instant};

/// Monotonic millisecond clock plus the blocking delay and yield primitives.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn now_ms(&mut self) -> u64;

    /// Block for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u64);

    /// Cooperative yield point, called once per poll iteration.
    fn yield_now(&mut self) {}
}

/// Wall-clock implementation backed by `std::time`.
#[derive(Debug)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    /// Create a clock whose counter starts now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

/// Deterministic clock for tests. The counter advances by `tick_ms` on every
/// `now_ms` call, so a polling loop with an N ms budget runs roughly N /
/// `tick_ms` iterations before timing out.
#[derive(Debug)]
pub struct MockClock {
    /// Current counter value in milliseconds.
    pub now: u64,
    /// Auto-advance applied by each `now_ms` call.
    pub tick_ms: u64,
    /// Number of `yield_now` calls observed.
    pub yields: u64,
    /// Arguments of every `delay_ms` call, in order.
    pub delays: Vec<u64>,
}

impl MockClock {
    /// Clock starting at zero with a 1 ms auto-advance.
    pub fn new() -> Self {
        Self::with_tick(1)
    }

    /// Clock starting at zero with the given auto-advance per `now_ms` call.
    pub fn with_tick(tick_ms: u64) -> Self {
        Self {
            now: 0,
            tick_ms,
            yields: 0,
            delays: Vec::new(),
        }
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&mut self) -> u64 {
        let t = self.now;
        self.now += self.tick_ms;
        t
    }

    fn delay_ms(&mut self, ms: u64) {
        self.now += ms;
        self.delays.push(ms);
    }

    fn yield_now(&mut self) {
        self.yields += 1;
    }
}

// Shared handle so a test can keep inspecting the clock after the driver
// takes ownership of a boxed copy.
impl Clock for std::rc::Rc<std::cell::RefCell<MockClock>> {
    fn now_ms(&mut self) -> u64 {
        self.borrow_mut().now_ms()
    }

    fn delay_ms(&mut self, ms: u64) {
        self.borrow_mut().delay_ms(ms);
    }

    fn yield_now(&mut self) {
        self.borrow_mut().yield_now();
    }
}
