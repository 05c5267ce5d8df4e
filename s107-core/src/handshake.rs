//! Host link and the request/acknowledge handshake.
//!
//! # Protocol
//!
//! - Host to transmitter: 4-byte frames `[yaw, pitch, throttle, trim]`,
//!   no delimiter, no checksum.
//! - Transmitter to host: one [`ACK_BYTE`] after every packet cycle. The host
//!   should send its next frame only after seeing it.
//!
//! A frame is applied only once all four bytes have arrived. Bytes are never
//! dropped: a partial frame waits for the rest, and bytes beyond one frame
//! stay queued for later cycles.

use crate::buffer::CommandWriter;
use core::future::Future;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io::ErrorKind;
use heapless::Vec;
use s107_proto::{Command, FRAME_LEN};

/// Byte sent to the host to request the next frame (`0b1000_0001`).
pub const ACK_BYTE: u8 = 129;

/// Host link bit rate.
pub const HOST_BAUDRATE: u32 = 9_600;

/// Error type for host link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Serial I/O error.
    Io,
    /// Byte framing or parity error.
    Framing,
    /// Receive overrun, bytes were lost by the peripheral.
    Overrun,
    /// The channel is closed.
    Closed,
}

impl From<ErrorKind> for LinkError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidData => LinkError::Framing,
            ErrorKind::OutOfMemory => LinkError::Overrun,
            ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::ConnectionReset => {
                LinkError::Closed
            }
            _ => LinkError::Io,
        }
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Framing => write!(f, "framing error"),
            Self::Overrun => write!(f, "receive overrun"),
            Self::Closed => write!(f, "channel closed"),
        }
    }
}

#[inline]
fn link_error<E: embedded_io::Error>(e: E) -> LinkError {
    e.kind().into()
}

/// Byte channel to the host.
pub trait HostLink {
    /// Return the next complete frame if one is available, without waiting.
    ///
    /// At most one frame is consumed per call.
    fn poll_frame(&mut self) -> Result<Option<[u8; FRAME_LEN]>, LinkError>;

    /// Send [`ACK_BYTE`] to the host.
    fn acknowledge(&mut self) -> impl Future<Output = Result<(), LinkError>>;
}

/// Collects bytes into 4-byte frames.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8, FRAME_LEN>,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Add one byte. Returns the frame once it is complete.
    pub fn push(&mut self, byte: u8) -> Option<[u8; FRAME_LEN]> {
        // Never full here: a complete frame is taken out immediately.
        let _ = self.buffer.push(byte);
        if self.buffer.is_full() {
            let mut frame = [0u8; FRAME_LEN];
            frame.copy_from_slice(&self.buffer);
            self.buffer.clear();
            Some(frame)
        } else {
            None
        }
    }

    /// Bytes of the partial frame received so far.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes still needed to complete the current frame.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        FRAME_LEN - self.buffer.len()
    }
}

/// [`HostLink`] over a serial port.
///
/// Reads use the blocking `embedded-io` traits but only when
/// [`ReadReady`](embedded_io::ReadReady) reports data, so polling never
/// waits. The acknowledgment is written with `embedded-io-async` and is not
/// flushed.
pub struct SerialHostLink<T> {
    io: T,
    assembler: FrameAssembler,
}

impl<T> SerialHostLink<T> {
    pub fn new(io: T) -> Self {
        Self {
            io,
            assembler: FrameAssembler::new(),
        }
    }

    /// Bytes of a partial frame held back until the rest arrives.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.assembler.pending()
    }
}

impl<T> HostLink for SerialHostLink<T>
where
    T: embedded_io::Read + embedded_io::ReadReady + embedded_io_async::Write,
{
    fn poll_frame(&mut self) -> Result<Option<[u8; FRAME_LEN]>, LinkError> {
        let mut chunk = [0u8; FRAME_LEN];

        while embedded_io::ReadReady::read_ready(&mut self.io).map_err(link_error)? {
            // Never read past the current frame, the rest stays queued.
            let want = self.assembler.remaining();
            let n = embedded_io::Read::read(&mut self.io, &mut chunk[..want]).map_err(link_error)?;
            if n == 0 {
                return Err(LinkError::Closed);
            }

            for &byte in &chunk[..n] {
                if let Some(frame) = self.assembler.push(byte) {
                    return Ok(Some(frame));
                }
            }
        }

        Ok(None)
    }

    // Not flushed: draining one byte at 9600 baud takes about 1ms, which the
    // packet interval does not budget for.
    async fn acknowledge(&mut self) -> Result<(), LinkError> {
        embedded_io_async::Write::write_all(&mut self.io, &[ACK_BYTE])
            .await
            .map_err(link_error)
    }
}

/// The host side of the control loop.
///
/// Owns the host link and the only writer of the command buffer.
pub struct Handshake<'a, L, M: RawMutex> {
    link: L,
    writer: CommandWriter<'a, M>,
}

impl<'a, L: HostLink, M: RawMutex> Handshake<'a, L, M> {
    pub fn new(link: L, writer: CommandWriter<'a, M>) -> Self {
        Self { link, writer }
    }

    /// Apply a complete frame from the host, if one is ready.
    ///
    /// Returns the new command when the buffer was replaced. Without a
    /// complete frame the buffer is left untouched.
    pub fn receive(&mut self) -> Result<Option<Command>, LinkError> {
        Ok(self.link.poll_frame()?.map(|frame| self.writer.update(frame)))
    }

    /// Tell the host it may send the next frame.
    pub async fn acknowledge(&mut self) -> Result<(), LinkError> {
        self.link.acknowledge().await
    }
}
