//! Latest command received from the host.
//!
//! The buffer is split into a single writer, owned by the host handshake,
//! and a reader, owned by the control loop. Updates replace all four fields
//! under the mutex, so a reader sees either the old or the new command,
//! never a mix.
//!
//! With [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
//! the two halves may live in different tasks or interrupt contexts.

use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use s107_proto::{Command, FRAME_LEN};

/// Holds the most recent complete command.
pub struct CommandBuffer<M: RawMutex> {
    inner: Mutex<M, Cell<Command>>,
}

impl<M: RawMutex> CommandBuffer<M> {
    /// A buffer holding [`Command::NEUTRAL`].
    pub const fn new() -> Self {
        Self::with_command(Command::NEUTRAL)
    }

    pub const fn with_command(command: Command) -> Self {
        Self {
            inner: Mutex::new(Cell::new(command)),
        }
    }

    /// Hand out the write and read halves.
    ///
    /// Requires exclusive access, so only one writer exists at a time.
    pub fn split(&mut self) -> (CommandWriter<'_, M>, CommandReader<'_, M>) {
        let shared: &Self = self;
        (
            CommandWriter { buffer: shared },
            CommandReader { buffer: shared },
        )
    }

    fn load(&self) -> Command {
        self.inner.lock(|cell| cell.get())
    }

    fn store(&self, command: Command) {
        self.inner.lock(|cell| cell.set(command));
    }
}

impl<M: RawMutex> Default for CommandBuffer<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of a [`CommandBuffer`].
pub struct CommandWriter<'a, M: RawMutex> {
    buffer: &'a CommandBuffer<M>,
}

impl<M: RawMutex> CommandWriter<'_, M> {
    /// Replace the stored command with a raw host frame.
    ///
    /// Byte values are not validated.
    pub fn update(&self, frame: [u8; FRAME_LEN]) -> Command {
        let command = Command::from_frame(frame);
        self.buffer.store(command);
        command
    }
}

/// Read half of a [`CommandBuffer`].
pub struct CommandReader<'a, M: RawMutex> {
    buffer: &'a CommandBuffer<M>,
}

impl<M: RawMutex> CommandReader<'_, M> {
    /// Copy of the current command.
    #[inline]
    pub fn snapshot(&self) -> Command {
        self.buffer.load()
    }
}

impl<M: RawMutex> Clone for CommandReader<'_, M> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
        }
    }
}
