use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::HierarchyConfig;
use crate::hierarchy::CacheHierarchy;
use crate::stats::HierarchyStats;

/// The simulator drives a [`CacheHierarchy`] from a memory-access trace and
/// collects results.
///
/// It supports calling simulate multiple times, and will update the time
/// taken to simulate and the results accordingly.
pub struct Simulator {
    hierarchy: CacheHierarchy,
    accesses: u64,
    total_cycles: u64,
    simulation_time: Duration,
}

/// The result of a simulation run. Can be serialised to the output format.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SimulationReport {
    pub accesses: u64,
    pub total_cycles: u64,
    pub average_access_time: f64,
    pub levels: HierarchyStats,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A hierarchy configuration, usually resulting from parsing
    ///   JSON
    ///
    /// returns: Result<Simulator, String>
    pub fn new(config: &HierarchyConfig) -> Result<Self, String> {
        let hierarchy = CacheHierarchy::new(config)
            .map_err(|e| format!("Invalid cache configuration: {e}"))?;
        Ok(Self {
            hierarchy,
            accesses: 0,
            total_cycles: 0,
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Replays a trace against the hierarchy.
    ///
    /// The trace is a byte slice of newline-separated records, each an access
    /// kind (`I` for an instruction fetch, `D` for a data access, either
    /// case) followed by whitespace and a hexadecimal address with an
    /// optional `0x` prefix. Blank lines are skipped. A malformed record
    /// aborts the run with its line number; accesses before it have already
    /// been applied, in order.
    ///
    /// Note that reads from the byte slice are *guaranteed to be sequential*,
    /// so a memory-mapped trace can advise the operating system accordingly
    /// (see the io module).
    ///
    /// # Arguments
    ///
    /// * `bytes`: The input byte slice
    ///
    /// returns: Result<SimulationReport, String>
    pub fn simulate(&mut self, bytes: &[u8]) -> Result<SimulationReport, String> {
        let start = Instant::now();
        for (line_number, line) in bytes.split(|&b| b == b'\n').enumerate() {
            let line = trim_ascii(line);
            if line.is_empty() {
                continue;
            }
            let (kind, address) = parse_record(line)
                .map_err(|e| format!("Malformed trace record on line {}: {e}", line_number + 1))?;
            let cycles = match kind {
                AccessKind::Instruction => self.hierarchy.instruction_access(address),
                AccessKind::Data => self.hierarchy.data_access(address),
            };
            self.accesses += 1;
            self.total_cycles += u64::from(cycles);
        }
        self.simulation_time += start.elapsed();
        Ok(self.report())
    }

    /// The report for everything simulated so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            accesses: self.accesses,
            total_cycles: self.total_cycles,
            average_access_time: if self.accesses == 0 {
                0.0
            } else {
                self.total_cycles as f64 / self.accesses as f64
            },
            levels: *self.hierarchy.statistics(),
        }
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    pub fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut CacheHierarchy {
        &mut self.hierarchy
    }
}

/// The two access kinds a trace record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessKind {
    Instruction,
    Data,
}

fn parse_record(line: &[u8]) -> Result<(AccessKind, u32), String> {
    let kind = match line[0] {
        b'I' | b'i' => AccessKind::Instruction,
        b'D' | b'd' => AccessKind::Data,
        other => return Err(format!("unknown access kind {:?}", other as char)),
    };
    let rest = trim_ascii(&line[1..]);
    if rest.len() == line.len() - 1 {
        return Err("missing whitespace after access kind".to_string());
    }
    let hex = std::str::from_utf8(rest).map_err(|_| "address is not ASCII".to_string())?;
    let hex = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X")).unwrap_or(hex);
    let address = u32::from_str_radix(hex, 16)
        .map_err(|e| format!("bad address {hex:?}: {e}"))?;
    Ok((kind, address))
}

// Handles \r\n traces too
fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |at| at + 1);
    &bytes[start..end]
}
