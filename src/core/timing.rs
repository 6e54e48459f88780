//=========================================================================
// Timing
//=========================================================================
//
// Tick-counted deferrals for suspendable sequences.
//
// Nothing in the core sleeps. A "wait N seconds" is a `Countdown` that is
// advanced once per tick; a "fade over N seconds" is a `Tween` that
// yields its 0→1 progress once per tick. Both are plain values owned by
// the component whose sequence they drive, so dropping the component
// cancels them.
//
//=========================================================================

//=== TickClock ===========================================================

const TICK_SNAP: f64 = 1e-4;

/// Converts wall-clock durations into whole ticks at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    tps: f64,
    tick: u64,
}

impl TickClock {
    /// Creates a clock for the given ticks per second.
    ///
    /// Non-positive or non-finite rates fall back to 60.
    pub fn new(tps: f64) -> Self {
        let tps = if tps.is_finite() && tps > 0.0 { tps } else { 60.0 };
        Self { tps, tick: 0 }
    }

    pub fn tps(&self) -> f64 {
        self.tps
    }

    /// Number of ticks advanced since the session started.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn advance(&mut self) {
        self.tick = self.tick.saturating_add(1);
    }

    /// Whole ticks covering `secs`, rounded up. Negative values map to 0.
    ///
    /// Products within `TICK_SNAP` of a whole tick count are taken as
    /// exact, so `0.2` s at 10 TPS is 2 ticks despite f32 widening.
    pub fn ticks_for(&self, secs: f32) -> u32 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        let exact = f64::from(secs) * self.tps;
        let ticks = if (exact - exact.round()).abs() < TICK_SNAP {
            exact.round()
        } else {
            exact.ceil()
        };
        ticks.min(f64::from(u32::MAX)) as u32
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

//=== Countdown ===========================================================

/// A deferral that elapses after a fixed number of ticks.
///
/// A countdown of zero ticks elapses on its first advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    fired: bool,
}

impl Countdown {
    pub fn new(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            fired: false,
        }
    }

    /// Advances one tick. Returns true exactly once, on the tick the
    /// countdown elapses.
    pub fn advance(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_elapsed(&self) -> bool {
        self.fired
    }
}

//=== Tween ===============================================================

/// Linear 0→1 progress across a fixed number of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tween {
    elapsed: u32,
    duration: u32,
}

impl Tween {
    pub fn new(duration_ticks: u32) -> Self {
        Self {
            elapsed: 0,
            duration: duration_ticks,
        }
    }

    /// Advances one tick and returns the new progress in `0.0..=1.0`.
    pub fn advance(&mut self) -> f32 {
        self.elapsed = self.elapsed.saturating_add(1).min(self.duration);
        self.progress()
    }

    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            1.0
        } else {
            self.elapsed as f32 / self.duration as f32
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Linear interpolation between `from` and `to`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
