use super::SystemProbe;
use crate::error::{CcError, Result};

/// Total physical memory formatted like `16.0 GB`.
pub fn collect(probe: &dyn SystemProbe) -> Result<String> {
    let meminfo = probe.meminfo()?;
    parse_mem_total(&meminfo).ok_or_else(|| CcError::other("MemTotal not found in meminfo"))
}

/// Find the MemTotal line and convert kB to GiB with one decimal place.
fn parse_mem_total(meminfo: &str) -> Option<String> {
    let line = meminfo.lines().find(|line| line.starts_with("MemTotal:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    let gb = kb as f64 / 1_048_576.0;
    Some(format!("{:.1} GB", gb))
}
