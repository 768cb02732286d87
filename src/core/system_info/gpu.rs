use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::SystemProbe;
use crate::error::{CcError, Result};

pub(crate) const LSPCI_TIMEOUT: Duration = Duration::from_secs(5);

/// Primary GPU description from the PCI listing.
pub fn collect(probe: &dyn SystemProbe) -> Result<String> {
    let listing = probe.pci_devices()?;
    parse_vga_controller(&listing)
        .ok_or_else(|| CcError::other("no VGA or 3D controller in PCI listing"))
}

/// Extract the device description from the first display-controller line.
///
/// An lspci line reads `01:00.0 VGA compatible controller: <description>`;
/// the description is everything after the second colon.
fn parse_vga_controller(listing: &str) -> Option<String> {
    for line in listing.lines() {
        if line.contains("VGA compatible controller") || line.contains("3D controller") {
            if let Some(description) = line.splitn(3, ':').nth(2) {
                return Some(description.trim().to_string());
            }
        }
    }
    None
}

/// Run lspci with a hard deadline, killing the child on expiry.
pub(crate) fn run_lspci(timeout: Duration) -> Result<String> {
    let mut child = Command::new("lspci")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => {
                // The listing fits well within the pipe buffer, so the child
                // exits without us draining it concurrently
                let mut output = String::new();
                if let Some(mut stdout) = child.stdout.take() {
                    stdout.read_to_string(&mut output)?;
                }
                if !status.success() {
                    return Err(CcError::other(format!("lspci exited with {}", status)));
                }
                return Ok(output);
            }
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CcError::timeout("lspci"));
            }
            None => thread::sleep(Duration::from_millis(50)),
        }
    }
}
