//! Carrier waveform building blocks.
//!
//! A packet is a sequence of [`Segment`]s. A burst toggles the IR line
//! through whole carrier cycles; a hold keeps the line low.

/// Target duration of one high or one low half-cycle, in microseconds.
pub const HALF_CYCLE_US: u32 = 13;

/// Duration of one high/low carrier cycle, in microseconds.
pub const CYCLE_US: u32 = 2 * HALF_CYCLE_US;

/// Optical carrier frequency applied by the LED driver during high phases.
pub const CARRIER_HZ: u32 = 38_000;

/// Carrier cycles in the header burst.
pub const HEADER_CYCLES: u32 = 77;

/// Low hold after the header burst, in microseconds.
pub const HEADER_HOLD_US: u32 = 1998;

/// Carrier cycles in the marker burst that precedes every bit.
pub const BIT_MARKER_CYCLES: u32 = 12;

/// Low hold after the marker of a 1 bit, in microseconds.
pub const ONE_HOLD_US: u32 = 688;

/// Low hold after the marker of a 0 bit, in microseconds.
pub const ZERO_HOLD_US: u32 = 288;

/// Carrier cycles in the footer burst.
pub const FOOTER_CYCLES: u32 = 12;

/// One piece of the transmitted waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    /// `cycles` high/low carrier cycles. Ends with the line low.
    Burst { cycles: u32 },
    /// Line held low for `micros` microseconds.
    Hold { micros: u32 },
}

impl Segment {
    /// Wall-clock time this segment occupies on the line.
    #[inline]
    #[must_use]
    pub const fn duration_us(&self) -> u32 {
        match *self {
            Segment::Burst { cycles } => cycles * CYCLE_US,
            Segment::Hold { micros } => micros,
        }
    }
}

/// Header: 77 cycles then a 1998us hold, 4000us in total.
pub const HEADER: [Segment; 2] = [
    Segment::Burst {
        cycles: HEADER_CYCLES,
    },
    Segment::Hold {
        micros: HEADER_HOLD_US,
    },
];

/// Marker burst sent before every bit regardless of its value.
pub const BIT_MARKER: Segment = Segment::Burst {
    cycles: BIT_MARKER_CYCLES,
};

/// Footer: 12 cycles with no trailing hold.
pub const FOOTER: Segment = Segment::Burst {
    cycles: FOOTER_CYCLES,
};

/// The low hold that encodes one bit value.
#[inline]
#[must_use]
pub const fn bit_hold(value: bool) -> Segment {
    Segment::Hold {
        micros: if value { ONE_HOLD_US } else { ZERO_HOLD_US },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_4000us() {
        let total: u32 = HEADER.iter().map(Segment::duration_us).sum();
        assert_eq!(HEADER[0].duration_us(), 2002);
        assert_eq!(total, 4000);
    }

    #[test]
    fn test_footer_and_marker_are_312us() {
        assert_eq!(FOOTER.duration_us(), 312);
        assert_eq!(BIT_MARKER.duration_us(), 312);
    }

    #[test]
    fn test_bit_holds_differ_by_400us() {
        let one = bit_hold(true).duration_us();
        let zero = bit_hold(false).duration_us();
        assert_eq!(one, 688);
        assert_eq!(zero, 288);
        assert_eq!(one - zero, 400);
    }
}
