use super::SystemProbe;
use crate::error::{CcError, Result};

/// Kernel release string, e.g. `6.9.1-arch1-1`.
pub fn collect(probe: &dyn SystemProbe) -> Result<String> {
    probe
        .kernel_version()
        .ok_or_else(|| CcError::other("kernel release unavailable"))
}
