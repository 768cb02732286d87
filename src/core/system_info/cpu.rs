use super::SystemProbe;
use crate::error::{CcError, Result};

/// CPU model name as reported by /proc/cpuinfo, without the clock suffix.
pub fn collect(probe: &dyn SystemProbe) -> Result<String> {
    let cpuinfo = probe.cpuinfo()?;
    parse_model_name(&cpuinfo).ok_or_else(|| CcError::other("model name not found in cpuinfo"))
}

fn parse_model_name(cpuinfo: &str) -> Option<String> {
    let line = cpuinfo.lines().find(|line| line.starts_with("model name"))?;
    let raw = line.splitn(2, ':').nth(1)?.trim();
    if raw.is_empty() {
        return None;
    }
    // "Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz" -> drop the frequency clause
    let base = raw.split('@').next().unwrap_or(raw).trim();
    if base.is_empty() {
        Some(raw.to_string())
    } else {
        Some(base.to_string())
    }
}
