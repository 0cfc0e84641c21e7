//! CPU time-in-state from the aggregate line of /proc/stat.

use crate::error::ParseError;
use crate::tokenizer::Cursor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pseudo-file holding the CPU counters.
pub const STAT_FILE: &str = "stat";

const CPU_LABEL: &str = "cpu";

/// Cumulative clock ticks since boot, per CPU state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTime {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTime {
    /// Sum of all eight counters, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        [
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(self.user, |acc, ticks| acc.saturating_add(*ticks))
    }

    /// Ticks spent neither idle nor waiting on I/O.
    pub fn busy(&self) -> u64 {
        self.total()
            .saturating_sub(self.idle)
            .saturating_sub(self.iowait)
    }
}

/// Parses the aggregate `cpu` line (the first line of /proc/stat).
///
/// Equivalent to scanning `"cpu %u %u %u %u %u %u %u %u"`: the eight
/// counters after the label are required, anything after them (guest,
/// guest_nice, per-core lines) is ignored.
pub fn parse_cpu_time(content: &str) -> Result<CpuTime, ParseError> {
    let line = content.lines().next().unwrap_or("");
    let mut cursor = Cursor::new(line);

    match cursor.next_token("cpu") {
        Ok(CPU_LABEL) => {}
        Ok(_) => return Err(ParseError::FieldMissing("cpu")),
        Err(e) => return Err(e),
    }

    let cpu = CpuTime {
        user: cursor.next_value("user")?,
        nice: cursor.next_value("nice")?,
        system: cursor.next_value("system")?,
        idle: cursor.next_value("idle")?,
        iowait: cursor.next_value("iowait")?,
        irq: cursor.next_value("irq")?,
        softirq: cursor.next_value("softirq")?,
        steal: cursor.next_value("steal")?,
    };

    debug!(
        user = cpu.user,
        nice = cpu.nice,
        system = cpu.system,
        idle = cpu.idle,
        iowait = cpu.iowait,
        irq = cpu.irq,
        softirq = cpu.softirq,
        steal = cpu.steal,
        "cpu time"
    );

    Ok(cpu)
}
