//! Packet transmission.

use crate::pulse::{NoIndicator, OutputLine, PulseGenerator, PulseTiming};
use embedded_hal::delay::DelayNs;
use s107_proto::{BitTally, Command, TimingBudget, FOOTER};

/// Anything that can put one command packet on the air.
///
/// This is the seam between the control loop and the hardware, so the loop
/// can be tested without a line or a clock.
pub trait Transmit {
    /// Transmit one packet and return what it cost.
    fn send_packet(&mut self, command: &Command) -> TimingBudget;
}

/// Sends S107 packets by bit-banging an IR line.
///
/// An optional status line is driven high for the duration of each packet.
pub struct PacketTransmitter<L, S, D> {
    pulses: PulseGenerator<L, D>,
    status: S,
}

impl<L: OutputLine, D: DelayNs> PacketTransmitter<L, NoIndicator, D> {
    /// Create a transmitter without a status indicator.
    pub fn new(line: L, delay: D, timing: PulseTiming) -> Self {
        Self::with_status(line, NoIndicator, delay, timing)
    }
}

impl<L: OutputLine, S: OutputLine, D: DelayNs> PacketTransmitter<L, S, D> {
    /// Create a transmitter that also drives a status line.
    pub fn with_status(line: L, mut status: S, delay: D, timing: PulseTiming) -> Self {
        status.drive_low();
        Self {
            pulses: PulseGenerator::new(line, delay, timing),
            status,
        }
    }

    /// Transmit one packet: header, 32 bits MSB first in the order
    /// `[yaw, pitch, throttle, trim]`, footer.
    ///
    /// Blocks for the whole packet (23.5ms to 36.3ms). The returned budget is
    /// computed from the ones and zeroes actually sent.
    pub fn send_packet(&mut self, command: &Command) -> TimingBudget {
        let bytes = command.to_bytes();
        let mut tally = BitTally::default();

        self.status.drive_high();
        self.pulses.emit_header();

        for byte in bytes {
            for bit in (0..8).rev() {
                let value = byte & (1 << bit) != 0;
                self.pulses.emit_bit(value);
                tally.record(value);
            }
        }

        self.pulses.emit(FOOTER);
        self.status.drive_low();

        TimingBudget::from_tally(tally)
    }

}

impl<L: OutputLine, S: OutputLine, D: DelayNs> Transmit for PacketTransmitter<L, S, D> {
    #[inline]
    fn send_packet(&mut self, command: &Command) -> TimingBudget {
        PacketTransmitter::send_packet(self, command)
    }
}
