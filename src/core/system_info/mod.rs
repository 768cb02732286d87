// Cached static system information

pub mod cpu;
pub mod gpu;
pub mod kernel;
pub mod memory;

use std::collections::HashMap;
use std::fs;

use log::warn;
use parking_lot::RwLock;

use crate::error::Result;

/// Placeholder shown when a value cannot be determined
pub const LABEL_NA: &str = "N/A";

/// Static system facts surfaced by the control center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemInfoKey {
    MemoryTotal,
    CpuModel,
    GpuModel,
    KernelVersion,
}

/// Read-only access to the OS sources the collectors parse.
///
/// The default implementation reads /proc and the PCI bus; tests substitute
/// fixtures.
pub trait SystemProbe: Send + Sync {
    fn meminfo(&self) -> Result<String>;
    fn cpuinfo(&self) -> Result<String>;
    fn pci_devices(&self) -> Result<String>;
    fn kernel_version(&self) -> Option<String>;
}

/// Probe backed by /proc, lspci and the platform release string.
pub struct ProcProbe;

impl SystemProbe for ProcProbe {
    fn meminfo(&self) -> Result<String> {
        Ok(fs::read_to_string("/proc/meminfo")?)
    }

    fn cpuinfo(&self) -> Result<String> {
        Ok(fs::read_to_string("/proc/cpuinfo")?)
    }

    fn pci_devices(&self) -> Result<String> {
        gpu::run_lspci(gpu::LSPCI_TIMEOUT)
    }

    fn kernel_version(&self) -> Option<String> {
        sysinfo::System::kernel_version()
    }
}

/// Thread-safe cache of static system values.
///
/// Each key is computed at most once per process lifetime. Failures are
/// cached as [`LABEL_NA`] too, so a broken source is probed once, not on
/// every panel redraw.
pub struct SystemInfoCache {
    probe: Box<dyn SystemProbe>,
    values: RwLock<HashMap<SystemInfoKey, String>>,
}

impl SystemInfoCache {
    pub fn new() -> Self {
        Self::with_probe(Box::new(ProcProbe))
    }

    pub fn with_probe(probe: Box<dyn SystemProbe>) -> Self {
        Self {
            probe,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Retrieve one system value, computing it on first use.
    pub fn get(&self, key: SystemInfoKey) -> String {
        // Fast path without the write lock
        if let Some(value) = self.values.read().get(&key) {
            return value.clone();
        }

        let mut values = self.values.write();
        // Re-check: another thread may have populated the entry while we
        // waited for the lock
        if let Some(value) = values.get(&key) {
            return value.clone();
        }

        let value = self.compute(key);
        values.insert(key, value.clone());
        value
    }

    fn compute(&self, key: SystemInfoKey) -> String {
        let result = match key {
            SystemInfoKey::MemoryTotal => memory::collect(self.probe.as_ref()),
            SystemInfoKey::CpuModel => cpu::collect(self.probe.as_ref()),
            SystemInfoKey::GpuModel => gpu::collect(self.probe.as_ref()),
            SystemInfoKey::KernelVersion => kernel::collect(self.probe.as_ref()),
        };

        result.unwrap_or_else(|e| {
            warn!("Failed to collect {:?}: {}", key, e);
            LABEL_NA.to_string()
        })
    }
}

impl Default for SystemInfoCache {
    fn default() -> Self {
        Self::new()
    }
}
