//! ControlLoop: paces packets and talks to the host.

use crate::buffer::CommandReader;
use crate::handshake::{Handshake, HostLink, LinkError};
use crate::transmitter::Transmit;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use s107_proto::{Command, TimingBudget};

/// What happened during one cycle of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Command that was transmitted.
    pub command: Command,
    /// Cost of the packet and the idle time that followed.
    pub budget: TimingBudget,
    /// True if a new frame from the host was applied before transmitting.
    pub updated: bool,
    /// First host link error seen during the cycle, if any.
    pub link_error: Option<LinkError>,
}

/// The transmit loop: receive, transmit, idle, acknowledge.
///
/// Packets are paced to [`PACKET_INTERVAL_US`](s107_proto::PACKET_INTERVAL_US)
/// by idling for the remainder of each packet's budget. The idle delay is
/// async so other tasks can run; packet transmission itself blocks.
///
/// # Error Handling
///
/// Host link errors never stop the loop. They are returned in the
/// [`CycleReport`] and the previous command keeps being transmitted.
pub struct ControlLoop<'a, L, T, D, M: RawMutex> {
    handshake: Handshake<'a, L, M>,
    reader: CommandReader<'a, M>,
    transmitter: T,
    idle: D,
}

impl<'a, L, T, D, M> ControlLoop<'a, L, T, D, M>
where
    L: HostLink,
    T: Transmit,
    D: DelayNs,
    M: RawMutex,
{
    pub fn new(
        handshake: Handshake<'a, L, M>,
        reader: CommandReader<'a, M>,
        transmitter: T,
        idle: D,
    ) -> Self {
        Self {
            handshake,
            reader,
            transmitter,
            idle,
        }
    }

    /// Run the loop forever, handing each cycle's report to `observer`.
    pub async fn run_with<F: FnMut(&CycleReport)>(&mut self, mut observer: F) -> ! {
        loop {
            let report = self.cycle().await;
            observer(&report);
        }
    }

    /// Run a single cycle.
    pub async fn cycle(&mut self) -> CycleReport {
        let mut link_error = None;

        let updated = match self.handshake.receive() {
            Ok(command) => command.is_some(),
            Err(e) => {
                link_error = Some(e);
                false
            }
        };

        let command = self.reader.snapshot();
        let budget = self.transmitter.send_packet(&command);

        self.idle.delay_us(budget.idle_us).await;

        if let Err(e) = self.handshake.acknowledge().await {
            link_error.get_or_insert(e);
        }

        CycleReport {
            command,
            budget,
            updated,
            link_error,
        }
    }
}
