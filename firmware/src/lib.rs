//! Syma S107 IR transmitter firmware for RP2040.
//!
//! This crate provides the embedded side of the transmitter: it receives
//! control frames from a host over UART and bit-bangs S107 packets on a
//! GPIO driving an IR LED.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives 4-byte command frames over UART (9600 baud, 8N1)
//! 2. Transmits one IR packet every 100ms from the latest command
//! 3. Sends the byte 129 after each packet to request the next frame
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART0 TX | 0    | Acknowledgments to the host |
//! | UART0 RX | 1    | Command frames from the host |
//! | IR LED   | 15   | Carrier line, through the LED driver transistor |
//! | LED      | 25   | On-board LED, lit while a packet is on the air |
//!
//! The LED driver modulates the 38kHz optical carrier during the high phases
//! of the carrier line.
//!
//! # Modules
//!
//! - [`board`]: pin assignment and link configuration
//! - [`monitor`]: per-cycle logging and statistics ([`CycleMonitor`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`status-led`** (default): Drive the on-board LED during each packet
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`s107_core`] used by the
//! firmware, so the binary only needs to depend on this crate.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

// Re-export core types for convenience
pub use s107_core::{
    Command, CommandBuffer, ControlLoop, CycleReport, Handshake, HostLink, LinkError,
    NoIndicator, PacketTransmitter, PulseTiming, SerialHostLink, TimingBudget, ACK_BYTE,
    HOST_BAUDRATE,
};

pub mod board;
pub mod monitor;

pub use board::{uart_config, PULSE_TIMING, UART_RX_BUFFER, UART_TX_BUFFER};
pub use monitor::CycleMonitor;
