//! Carrier burst generation and bit encoding.
//!
//! Timing here is blocking: a 13us half-cycle is far below what an async
//! timer can schedule reliably, so bursts and bit holds busy-wait on a
//! blocking [`DelayNs`].

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use s107_proto::{bit_hold, Segment, BIT_MARKER, HALF_CYCLE_US, HEADER};

/// A digital output that cannot fail.
///
/// Implemented for every [`OutputPin`] whose error type is [`Infallible`],
/// which covers the GPIO outputs of most HALs.
pub trait OutputLine {
    fn drive_high(&mut self);
    fn drive_low(&mut self);
}

impl<P> OutputLine for P
where
    P: OutputPin<Error = Infallible>,
{
    #[inline]
    fn drive_high(&mut self) {
        match self.set_high() {
            Ok(()) => {}
            Err(e) => match e {},
        }
    }

    #[inline]
    fn drive_low(&mut self) {
        match self.set_low() {
            Ok(()) => {}
            Err(e) => match e {},
        }
    }
}

/// Placeholder for an absent status indicator.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoIndicator;

impl OutputLine for NoIndicator {
    #[inline]
    fn drive_high(&mut self) {}

    #[inline]
    fn drive_low(&mut self) {}
}

/// Half-cycle timing, compensated for the cost of driving the line.
///
/// The observed high (or low) phase is the coded delay plus however long
/// the line write itself takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    /// Target observed half-cycle length.
    pub half_cycle_us: u32,
    /// Time one line write takes on the target.
    pub line_overhead_us: u32,
}

impl PulseTiming {
    /// Slow line writes: 3us per write, 10us coded delay.
    pub const REFERENCE: Self = Self {
        half_cycle_us: HALF_CYCLE_US,
        line_overhead_us: 3,
    };

    /// Negligible line write cost, e.g. a memory-mapped GPIO register.
    pub const DIRECT: Self = Self {
        half_cycle_us: HALF_CYCLE_US,
        line_overhead_us: 0,
    };

    /// Delay to code after each line write.
    #[inline]
    #[must_use]
    pub const fn hold_us(&self) -> u32 {
        self.half_cycle_us.saturating_sub(self.line_overhead_us)
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self::DIRECT
    }
}

/// Drives the IR line through carrier bursts and low holds.
pub struct PulseGenerator<L, D> {
    line: L,
    delay: D,
    timing: PulseTiming,
}

impl<L: OutputLine, D: DelayNs> PulseGenerator<L, D> {
    /// Take ownership of the line and leave it low.
    pub fn new(mut line: L, delay: D, timing: PulseTiming) -> Self {
        line.drive_low();
        Self {
            line,
            delay,
            timing,
        }
    }

    /// Drive `cycles` high/low half-cycle pairs.
    ///
    /// Takes `cycles * 26us`. The line is low on return.
    pub fn emit_carrier_burst(&mut self, cycles: u32) {
        let hold = self.timing.hold_us();
        for _ in 0..cycles {
            self.line.drive_high();
            self.delay.delay_us(hold);
            self.line.drive_low();
            self.delay.delay_us(hold);
        }
    }

    /// Keep the line low for `micros`.
    #[inline]
    pub fn hold_low(&mut self, micros: u32) {
        self.delay.delay_us(micros);
    }

    /// Emit one waveform segment.
    pub fn emit(&mut self, segment: Segment) {
        match segment {
            Segment::Burst { cycles } => self.emit_carrier_burst(cycles),
            Segment::Hold { micros } => self.hold_low(micros),
        }
    }

    /// Emit the packet header: 77 cycles, then 1998us low.
    pub fn emit_header(&mut self) {
        for segment in HEADER {
            self.emit(segment);
        }
    }

    /// Emit one encoded bit: the 12-cycle marker, then 688us low for a
    /// one or 288us low for a zero.
    pub fn emit_bit(&mut self, value: bool) {
        self.emit(BIT_MARKER);
        self.emit(bit_hold(value));
    }

}
