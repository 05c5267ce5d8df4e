//! Per-packet timing budget.
//!
//! Packets go out at a fixed rate. A one bit costs 400us more than a zero
//! bit, so the time a packet takes depends on its payload; the idle time
//! after each packet is whatever remains of the packet interval.
//!
//! All quantities are microseconds.

use crate::packet::{BitTally, BITS_IN_PACKET};
use crate::waveform::{
    BIT_MARKER_CYCLES, CYCLE_US, FOOTER_CYCLES, HEADER_CYCLES, HEADER_HOLD_US, ONE_HOLD_US,
    ZERO_HOLD_US,
};

/// Target packet rate.
pub const PACKETS_PER_SECOND: u32 = 10;

/// Time from the start of one packet to the start of the next.
pub const PACKET_INTERVAL_US: u32 = 1_000_000 / PACKETS_PER_SECOND;

const HEADER_TIME_US: u32 = HEADER_CYCLES * CYCLE_US + HEADER_HOLD_US;
const FOOTER_TIME_US: u32 = FOOTER_CYCLES * CYCLE_US;
const BIT_MARKERS_TIME_US: u32 = BIT_MARKER_CYCLES * CYCLE_US * BITS_IN_PACKET as u32;

/// Cost of one transmitted packet and the idle time that keeps the rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingBudget {
    /// Nominal time spent on the line for the packet.
    pub packet_time_us: u32,
    /// Time to wait before the next packet. Zero when the packet overran.
    pub idle_us: u32,
    /// Amount by which the packet exceeded the interval, usually zero.
    pub overrun_us: u32,
}

impl TimingBudget {
    /// Budget for a packet that sent `tally.ones` ones and `tally.zeroes` zeroes.
    #[must_use]
    pub const fn from_tally(tally: BitTally) -> Self {
        let packet_time_us = HEADER_TIME_US
            + FOOTER_TIME_US
            + BIT_MARKERS_TIME_US
            + ONE_HOLD_US * tally.ones
            + ZERO_HOLD_US * tally.zeroes;
        Self::from_packet_time(packet_time_us)
    }

    /// Budget for a packet of known duration.
    #[must_use]
    pub const fn from_packet_time(packet_time_us: u32) -> Self {
        Self {
            packet_time_us,
            idle_us: PACKET_INTERVAL_US.saturating_sub(packet_time_us),
            overrun_us: packet_time_us.saturating_sub(PACKET_INTERVAL_US),
        }
    }

    /// True when the packet alone took longer than the packet interval.
    #[inline]
    #[must_use]
    pub const fn is_overrun(&self) -> bool {
        self.overrun_us > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::packet::PacketEncoder;
    use crate::waveform::Segment;

    #[test]
    fn test_fixed_costs() {
        assert_eq!(HEADER_TIME_US, 4000);
        assert_eq!(FOOTER_TIME_US, 312);
        assert_eq!(BIT_MARKERS_TIME_US, 9984);
        assert_eq!(PACKET_INTERVAL_US, 100_000);
    }

    #[test]
    fn test_neutral_command() {
        let budget = TimingBudget::from_tally(BitTally::of(&Command::NEUTRAL.to_bytes()));
        assert_eq!(budget.packet_time_us, 30_712);
        assert_eq!(budget.idle_us, 69_288);
        assert!(!budget.is_overrun());
    }

    #[test]
    fn test_all_zero_command() {
        let budget = TimingBudget::from_tally(BitTally::of(&[0; 4]));
        assert_eq!(budget.packet_time_us, 23_512);
        assert_eq!(budget.idle_us, 76_488);
    }

    #[test]
    fn test_all_ones_command() {
        let budget = TimingBudget::from_tally(BitTally::of(&[0xFF; 4]));
        assert_eq!(budget.packet_time_us, 36_312);
        assert_eq!(budget.idle_us, 63_688);
    }

    #[test]
    fn test_budget_matches_encoded_waveform() {
        for frame in [[0x3F, 0x3F, 0x00, 0x3F], [0x12, 0x34, 0xD6, 0x78], [0xFF, 0, 0xFF, 0]] {
            let encoded: u32 = PacketEncoder::new(&Command::from_frame(frame))
                .map(|s: Segment| s.duration_us())
                .sum();
            let budget = TimingBudget::from_tally(BitTally::of(&frame));
            assert_eq!(budget.packet_time_us, encoded);
            assert_eq!(budget.packet_time_us + budget.idle_us, PACKET_INTERVAL_US);
        }
    }

    #[test]
    fn test_overrun_clamps_idle_to_zero() {
        let budget = TimingBudget::from_packet_time(PACKET_INTERVAL_US + 1_500);
        assert_eq!(budget.idle_us, 0);
        assert_eq!(budget.overrun_us, 1_500);
        assert!(budget.is_overrun());

        let exact = TimingBudget::from_packet_time(PACKET_INTERVAL_US);
        assert_eq!(exact.idle_us, 0);
        assert!(!exact.is_overrun());
    }
}
