//! Syma S107 infrared protocol definitions.
//!
//! This crate describes everything about the helicopter's IR protocol that
//! does not touch hardware:
//!
//! - **Command**: the four control channels and their wire order
//!   - [`Command`] - yaw, pitch, throttle and trim, one byte each
//!   - [`ChannelSelect`] - the channel flag carried in throttle bit 7
//!
//! - **Waveform**: carrier bursts and low holds
//!   - [`Segment`] - one burst or one hold
//!   - [`HEADER`], [`FOOTER`], [`BIT_MARKER`], [`bit_hold()`]
//!
//! - **Packets**: encoding a command into segments and back
//!   - [`PacketEncoder`] - iterator over the segments of one packet
//!   - [`decode_packet()`] - recover the four bytes from a segment stream
//!   - [`BitTally`] - ones/zeroes count of a packet
//!
//! - **Timing**: per-packet cost and idle time for a fixed packet rate
//!   - [`TimingBudget`]
//!
//! # Packet Format
//!
//! ```text
//!     Yaw      Pitch    Throttle   Trim
//! H 0YYYYYYY 0PPPPPPP CTTTTTTT 0AAAAAAA F
//! ```
//!
//! - `H` - 77 carrier cycles (2002us) then 1998us low
//! - each bit, MSB first - 12 carrier cycles (312us) then 688us low for a 1
//!   or 288us low for a 0
//! - `C` - channel select flag
//! - `F` - 12 carrier cycles, no trailing hold
//!
//! One carrier cycle is 13us high followed by 13us low. The high phases are
//! modulated onto a 38kHz optical carrier by the LED drive circuit.
//!
//! # Example
//!
//! ```
//! use s107_proto::{Command, PacketEncoder, TimingBudget, BitTally};
//!
//! let command = Command::NEUTRAL;
//! let total: u32 = PacketEncoder::new(&command).map(|s| s.duration_us()).sum();
//!
//! let budget = TimingBudget::from_tally(BitTally::of(&command.to_bytes()));
//! assert_eq!(budget.packet_time_us, total);
//! assert_eq!(budget.idle_us, 69_288);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod packet;
pub mod timing;
pub mod waveform;

pub use command::{ChannelSelect, Command, FIELD_MAX, FRAME_LEN};
pub use packet::{decode_packet, BitTally, DecodeError, PacketEncoder, BITS_IN_PACKET, BYTES_IN_PACKET};
pub use timing::{TimingBudget, PACKETS_PER_SECOND, PACKET_INTERVAL_US};
pub use waveform::{
    bit_hold, Segment, BIT_MARKER, BIT_MARKER_CYCLES, CARRIER_HZ, CYCLE_US, FOOTER, FOOTER_CYCLES,
    HALF_CYCLE_US, HEADER, HEADER_CYCLES, HEADER_HOLD_US, ONE_HOLD_US, ZERO_HOLD_US,
};
