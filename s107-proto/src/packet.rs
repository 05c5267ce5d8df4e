//! Packet encoding and decoding.
//!
//! A packet is the header, then 32 bits (4 bytes, most significant bit
//! first), then the footer. Each bit is a marker burst followed by a hold
//! whose length carries the value.

use crate::command::{Command, FRAME_LEN};
use crate::waveform::{
    bit_hold, Segment, BIT_MARKER, BIT_MARKER_CYCLES, FOOTER, FOOTER_CYCLES, HEADER, ONE_HOLD_US,
    ZERO_HOLD_US,
};

/// Payload bytes per packet.
pub const BYTES_IN_PACKET: usize = FRAME_LEN;

/// Payload bits per packet.
pub const BITS_IN_PACKET: usize = BYTES_IN_PACKET * 8;

/// Header (2) + marker/hold per bit (64) + footer (1).
const SEGMENTS_IN_PACKET: usize = HEADER.len() + 2 * BITS_IN_PACKET + 1;

/// Holds at or above this length decode as a 1.
const BIT_THRESHOLD_US: u32 = (ONE_HOLD_US + ZERO_HOLD_US) / 2;

/// Count of ones and zeroes sent in one packet.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTally {
    pub ones: u32,
    pub zeroes: u32,
}

impl BitTally {
    /// Tally of a full payload, MSB-first order does not change the counts.
    #[must_use]
    pub fn of(bytes: &[u8; BYTES_IN_PACKET]) -> Self {
        let ones: u32 = bytes.iter().map(|b| b.count_ones()).sum();
        Self {
            ones,
            zeroes: BITS_IN_PACKET as u32 - ones,
        }
    }

    /// Count one emitted bit.
    #[inline]
    pub fn record(&mut self, value: bool) {
        if value {
            self.ones += 1;
        } else {
            self.zeroes += 1;
        }
    }

    /// Bits counted so far.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.ones + self.zeroes
    }
}

/// Value of bit `index` in a packet, counting from the MSB of the first byte.
#[inline]
fn packet_bit(bytes: &[u8; BYTES_IN_PACKET], index: usize) -> bool {
    let mask = 0x80u8 >> (index % 8);
    bytes[index / 8] & mask != 0
}

/// Iterator over the waveform segments of one packet.
///
/// The command is copied on construction, so the packet always reflects a
/// single consistent snapshot.
///
/// # Example
///
/// ```
/// use s107_proto::{Command, PacketEncoder, Segment, HEADER, FOOTER};
///
/// let segments: Vec<Segment> = PacketEncoder::new(&Command::NEUTRAL).collect();
/// assert_eq!(segments.len(), 67);
/// assert_eq!(segments[..2], HEADER);
/// assert_eq!(segments[66], FOOTER);
/// ```
#[derive(Clone, Debug)]
pub struct PacketEncoder {
    bytes: [u8; BYTES_IN_PACKET],
    pos: usize,
}

impl PacketEncoder {
    #[must_use]
    pub fn new(command: &Command) -> Self {
        Self {
            bytes: command.to_bytes(),
            pos: 0,
        }
    }

    /// Payload bytes this encoder emits.
    #[must_use]
    pub fn bytes(&self) -> [u8; BYTES_IN_PACKET] {
        self.bytes
    }

    fn segment_at(&self, pos: usize) -> Segment {
        match pos {
            0 | 1 => HEADER[pos],
            p if p == SEGMENTS_IN_PACKET - 1 => FOOTER,
            p => {
                let k = p - HEADER.len();
                if k % 2 == 0 {
                    BIT_MARKER
                } else {
                    bit_hold(packet_bit(&self.bytes, k / 2))
                }
            }
        }
    }
}

impl Iterator for PacketEncoder {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.pos >= SEGMENTS_IN_PACKET {
            return None;
        }
        let segment = self.segment_at(self.pos);
        self.pos += 1;
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = SEGMENTS_IN_PACKET - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PacketEncoder {}

/// Error type for packet decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The stream does not start with the header burst and hold.
    MissingHeader,
    /// Bit `n` is not preceded by a marker burst.
    MissingMarker(u8),
    /// Bit `n` has its marker burst but no hold after it.
    MissingHold(u8),
    /// The last bit is not followed by the footer burst.
    MissingFooter,
    /// The stream ended before the packet was complete.
    Truncated,
    /// Segments follow the footer.
    Unexpected,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing header"),
            Self::MissingMarker(bit) => write!(f, "missing marker before bit {}", bit),
            Self::MissingHold(bit) => write!(f, "missing hold after marker of bit {}", bit),
            Self::MissingFooter => write!(f, "missing footer"),
            Self::Truncated => write!(f, "packet truncated"),
            Self::Unexpected => write!(f, "unexpected segment after footer"),
        }
    }
}

/// Recover the payload bytes from one packet's segments.
///
/// Bit holds are classified against the midpoint between the one and zero
/// hold lengths, so moderately stretched or shortened holds still decode.
pub fn decode_packet<I>(segments: I) -> Result<[u8; BYTES_IN_PACKET], DecodeError>
where
    I: IntoIterator<Item = Segment>,
{
    let mut iter = segments.into_iter();

    for expected in HEADER {
        match iter.next() {
            Some(s) if s == expected => {}
            Some(_) => return Err(DecodeError::MissingHeader),
            None => return Err(DecodeError::Truncated),
        }
    }

    let mut bytes = [0u8; BYTES_IN_PACKET];
    for index in 0..BITS_IN_PACKET {
        match iter.next() {
            Some(Segment::Burst {
                cycles: BIT_MARKER_CYCLES,
            }) => {}
            Some(_) => return Err(DecodeError::MissingMarker(index as u8)),
            None => return Err(DecodeError::Truncated),
        }
        let micros = match iter.next() {
            Some(Segment::Hold { micros }) => micros,
            Some(_) => return Err(DecodeError::MissingHold(index as u8)),
            None => return Err(DecodeError::Truncated),
        };
        if micros >= BIT_THRESHOLD_US {
            bytes[index / 8] |= 0x80 >> (index % 8);
        }
    }

    match iter.next() {
        Some(Segment::Burst {
            cycles: FOOTER_CYCLES,
        }) => {}
        Some(_) => return Err(DecodeError::MissingFooter),
        None => return Err(DecodeError::Truncated),
    }

    if iter.next().is_some() {
        return Err(DecodeError::Unexpected);
    }

    Ok(bytes)
}
