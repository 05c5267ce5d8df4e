//! Platform-agnostic Syma S107 IR transmitter.
//!
//! This crate drives the IR protocol described by [`s107_proto`] through
//! `embedded-hal` and `embedded-io` traits, with no chip-specific
//! dependencies. It can be used in embedded `no_std` firmware and on host
//! for testing.
//!
//! # Overview
//!
//! - [`pulse`]: carrier bursts and bit encoding ([`PulseGenerator`])
//! - [`transmitter`]: one packet per call ([`PacketTransmitter`], [`Transmit`])
//! - [`buffer`]: latest command from the host ([`CommandBuffer`])
//! - [`handshake`]: host frames and acknowledgments ([`Handshake`], [`HostLink`])
//! - [`control`]: the fixed-rate transmit loop ([`ControlLoop`])
//!
//! # Control Flow
//!
//! Each cycle of [`ControlLoop`]:
//!
//! 1. takes a complete 4-byte frame from the host if one is ready,
//! 2. transmits one packet from the current command,
//! 3. idles for the rest of the 100ms packet interval,
//! 4. sends the acknowledgment byte (129) to request the next frame.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod control;
pub mod handshake;
pub mod pulse;
pub mod transmitter;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use buffer::{CommandBuffer, CommandReader, CommandWriter};
pub use control::{ControlLoop, CycleReport};
pub use handshake::{
    FrameAssembler, Handshake, HostLink, LinkError, SerialHostLink, ACK_BYTE, HOST_BAUDRATE,
};
pub use pulse::{NoIndicator, OutputLine, PulseGenerator, PulseTiming};
pub use transmitter::{PacketTransmitter, Transmit};

pub use s107_proto::{ChannelSelect, Command, TimingBudget, FRAME_LEN};
