use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nimbuscc::{CcError, Result, SystemInfoCache, SystemInfoKey, SystemProbe, LABEL_NA};

/// Probe with swappable fixture data and call counting. Cloning shares the
/// underlying state, so a test keeps a handle after the cache owns its copy.
#[derive(Default, Clone)]
struct FakeProbe {
    meminfo: Arc<Mutex<String>>,
    meminfo_calls: Arc<AtomicUsize>,
    meminfo_fails: Arc<AtomicBool>,
    cpuinfo: Arc<Mutex<String>>,
    pci: Arc<Mutex<String>>,
    kernel: Arc<Mutex<Option<String>>>,
}

impl SystemProbe for FakeProbe {
    fn meminfo(&self) -> Result<String> {
        self.meminfo_calls.fetch_add(1, Ordering::SeqCst);
        if self.meminfo_fails.load(Ordering::SeqCst) {
            return Err(CcError::other("meminfo unavailable"));
        }
        Ok(self.meminfo.lock().unwrap().clone())
    }

    fn cpuinfo(&self) -> Result<String> {
        Ok(self.cpuinfo.lock().unwrap().clone())
    }

    fn pci_devices(&self) -> Result<String> {
        Ok(self.pci.lock().unwrap().clone())
    }

    fn kernel_version(&self) -> Option<String> {
        self.kernel.lock().unwrap().clone()
    }
}

fn cache_with(probe: &FakeProbe) -> SystemInfoCache {
    SystemInfoCache::with_probe(Box::new(probe.clone()))
}

#[test]
fn test_memory_total_formatting() {
    let probe = FakeProbe::default();
    *probe.meminfo.lock().unwrap() = "MemTotal:    16777216 kB\n".to_string();
    let cache = cache_with(&probe);
    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), "16.0 GB");
}

#[test]
fn test_lookup_computes_once() {
    let probe = FakeProbe::default();
    *probe.meminfo.lock().unwrap() = "MemTotal:    16777216 kB\n".to_string();
    let cache = cache_with(&probe);

    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), "16.0 GB");
    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), "16.0 GB");
    assert_eq!(probe.meminfo_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cached_value_survives_source_change() {
    let probe = FakeProbe::default();
    *probe.meminfo.lock().unwrap() = "MemTotal:    16777216 kB\n".to_string();
    let cache = cache_with(&probe);

    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), "16.0 GB");

    *probe.meminfo.lock().unwrap() = "MemTotal:    33554432 kB\n".to_string();
    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), "16.0 GB");
    assert_eq!(probe.meminfo_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failure_is_cached_as_sentinel() {
    let probe = FakeProbe::default();
    probe.meminfo_fails.store(true, Ordering::SeqCst);
    *probe.meminfo.lock().unwrap() = "MemTotal:    16777216 kB\n".to_string();
    let cache = cache_with(&probe);

    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), LABEL_NA);

    // Even after the source recovers, the sentinel stays cached
    probe.meminfo_fails.store(false, Ordering::SeqCst);
    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), LABEL_NA);
    assert_eq!(probe.meminfo_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cpu_model_strips_frequency() {
    let probe = FakeProbe::default();
    *probe.cpuinfo.lock().unwrap() =
        "model name\t: Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz\n".to_string();
    let cache = cache_with(&probe);
    assert_eq!(
        cache.get(SystemInfoKey::CpuModel),
        "Intel(R) Core(TM) i7-9750H CPU"
    );
}

#[test]
fn test_gpu_model_from_pci_listing() {
    let probe = FakeProbe::default();
    *probe.pci.lock().unwrap() =
        "00:02.0 VGA compatible controller: Intel Corporation AlderLake-S GT1 (rev 0c)\n"
            .to_string();
    let cache = cache_with(&probe);
    assert_eq!(
        cache.get(SystemInfoKey::GpuModel),
        "Intel Corporation AlderLake-S GT1 (rev 0c)"
    );
}

#[test]
fn test_gpu_missing_yields_sentinel() {
    let probe = FakeProbe::default();
    *probe.pci.lock().unwrap() = "00:00.0 Host bridge: Intel Corporation Device 4621\n".to_string();
    let cache = cache_with(&probe);
    assert_eq!(cache.get(SystemInfoKey::GpuModel), LABEL_NA);
}

#[test]
fn test_kernel_version_passthrough() {
    let probe = FakeProbe::default();
    *probe.kernel.lock().unwrap() = Some("6.9.1-arch1-1".to_string());
    let cache = cache_with(&probe);
    assert_eq!(cache.get(SystemInfoKey::KernelVersion), "6.9.1-arch1-1");
}

#[test]
fn test_kernel_version_unavailable() {
    let cache = cache_with(&FakeProbe::default());
    assert_eq!(cache.get(SystemInfoKey::KernelVersion), LABEL_NA);
}

#[test]
fn test_empty_sources_yield_sentinel() {
    let cache = cache_with(&FakeProbe::default());
    assert_eq!(cache.get(SystemInfoKey::MemoryTotal), LABEL_NA);
    assert_eq!(cache.get(SystemInfoKey::CpuModel), LABEL_NA);
    assert_eq!(cache.get(SystemInfoKey::GpuModel), LABEL_NA);
}
