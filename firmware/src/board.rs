//! Board configuration.

use embassy_rp::uart::Config as UartConfig;
use s107_core::{PulseTiming, HOST_BAUDRATE};

/// GPIO writes on the RP2040 go straight to the SIO registers, so the
/// coded half-cycle delay is the full 13us.
pub const PULSE_TIMING: PulseTiming = PulseTiming::DIRECT;

/// UART receive buffer. Holds several frames in case the host sends early.
pub const UART_RX_BUFFER: usize = 64;

/// UART transmit buffer. Only ever holds acknowledgments.
pub const UART_TX_BUFFER: usize = 16;

/// Host link: 9600 baud, 8N1.
#[must_use]
pub fn uart_config() -> UartConfig {
    let mut config = UartConfig::default();
    config.baudrate = HOST_BAUDRATE;
    config
}
