//! Cycle logging and statistics.

use defmt::{debug, info, trace, warn};
use s107_core::{Command, CycleReport};

/// Packets between summary log lines (10 seconds at 10 packets/s).
pub const SUMMARY_INTERVAL: u32 = 100;

/// Watches control loop cycles and logs what matters.
///
/// Command changes are logged at debug level, link errors and timing
/// overruns at warn, and a summary every [`SUMMARY_INTERVAL`] packets.
#[derive(Debug, Default)]
pub struct CycleMonitor {
    packets: u32,
    updates: u32,
    link_errors: u32,
    overruns: u32,
    last: Option<Command>,
}

impl CycleMonitor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packets: 0,
            updates: 0,
            link_errors: 0,
            overruns: 0,
            last: None,
        }
    }

    /// Record one cycle.
    pub fn observe(&mut self, report: &CycleReport) {
        self.packets = self.packets.wrapping_add(1);

        trace!(
            "Packet {:?}: {} us on air, {} us idle",
            report.command,
            report.budget.packet_time_us,
            report.budget.idle_us
        );

        if report.updated {
            self.updates = self.updates.wrapping_add(1);
        }
        if self.last != Some(report.command) {
            debug!("Command changed: {:?}", report.command);
            self.last = Some(report.command);
        }

        if let Some(e) = report.link_error {
            self.link_errors = self.link_errors.wrapping_add(1);
            warn!("Host link error: {:?}", e);
        }

        if report.budget.is_overrun() {
            self.overruns = self.overruns.wrapping_add(1);
            warn!(
                "Packet overran its interval by {} us",
                report.budget.overrun_us
            );
        }

        if self.packets % SUMMARY_INTERVAL == 0 {
            info!(
                "{} packets, {} updates, {} link errors, {} overruns",
                self.packets, self.updates, self.link_errors, self.overruns
            );
        }
    }
}
