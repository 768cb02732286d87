// UWSM-compliant command launching

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{self, Command, Stdio};

use log::{error, warn};

use crate::core::paths;
use crate::error::{CcError, Result};

/// Session-management wrapper every spawned command is routed through
pub const LAUNCH_WRAPPER: &str = "uwsm-app";

/// Terminal emulator used for `run_in_terminal` launches
pub const TERMINAL: &str = "kitty";

const TERMINAL_CLASS: &str = "nimbus-term";
const DEFAULT_TITLE: &str = "Nimbus Terminal";
const SHELL: &str = "sh";

/// Characters requiring shell interpretation
const SHELL_METACHARACTERS: &[char] = &[
    '|', '&', ';', '>', '<', '$', '`', '\\', '"', '\'', '*', '?', '[', ']', '(', ')', '{', '}', '!',
];

/// Expand `~` and environment variables in a command string.
///
/// Undefined variables are left as-is rather than failing the launch.
fn expand(command: &str) -> String {
    shellexpand::full_with_context(
        command,
        || dirs::home_dir().map(|home| home.to_string_lossy().into_owned()),
        |var| Ok::<_, env::VarError>(env::var(var).ok()),
    )
    .map(|expanded| expanded.into_owned())
    .unwrap_or_else(|_| command.to_string())
}

/// Replace control characters in a window title and fall back to the default
/// when nothing printable remains.
fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        cleaned.to_string()
    }
}

fn shell_wrapped(expanded: &str) -> Vec<String> {
    vec![
        LAUNCH_WRAPPER.to_string(),
        "--".to_string(),
        SHELL.to_string(),
        "-c".to_string(),
        expanded.to_string(),
    ]
}

/// Build the argument vector for a command without spawning it.
///
/// Returns `None` for empty or blank commands. Commands free of shell
/// metacharacters are tokenized and launched directly; everything else goes
/// through `sh -c`. Terminal launches always take the shell form because the
/// terminal holds the command string for interpretation.
pub fn build_command_line(command: &str, title: &str, run_in_terminal: bool) -> Option<Vec<String>> {
    if command.is_empty() {
        return None;
    }

    let expanded = expand(command);
    let expanded = expanded.trim();
    if expanded.is_empty() {
        return None;
    }

    if run_in_terminal {
        let safe_title = sanitize_title(title);
        return Some(vec![
            LAUNCH_WRAPPER.to_string(),
            "--".to_string(),
            TERMINAL.to_string(),
            "--class".to_string(),
            TERMINAL_CLASS.to_string(),
            "--title".to_string(),
            safe_title,
            "--hold".to_string(),
            SHELL.to_string(),
            "-c".to_string(),
            expanded.to_string(),
        ]);
    }

    let needs_shell = expanded
        .chars()
        .any(|c| SHELL_METACHARACTERS.contains(&c));
    if needs_shell {
        return Some(shell_wrapped(expanded));
    }

    match shlex::split(expanded) {
        Some(tokens) if !tokens.is_empty() => {
            let mut argv = vec![LAUNCH_WRAPPER.to_string(), "--".to_string()];
            argv.extend(tokens);
            Some(argv)
        }
        Some(_) => None,
        // Malformed quoting; fall back to shell
        None => Some(shell_wrapped(expanded)),
    }
}

/// Spawn an argument vector detached from the control center.
///
/// The child gets its own session, all three standard streams on /dev/null,
/// and is never waited on.
fn spawn_detached(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| CcError::spawn("empty argument vector"))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // setsid detaches the child from our session; failure (already a
        // session leader) is harmless
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    cmd.spawn()?;
    Ok(())
}

/// Execute a command via the launch wrapper, optionally in a terminal.
///
/// Fire-and-forget: no handle or exit status is retained. Returns whether the
/// process was successfully spawned.
pub fn execute_command(command: &str, title: &str, run_in_terminal: bool) -> bool {
    let Some(argv) = build_command_line(command, title, run_in_terminal) else {
        return false;
    };

    match spawn_detached(&argv) {
        Ok(()) => true,
        Err(CcError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            error!("{} or required command not found in PATH", LAUNCH_WRAPPER);
            false
        }
        Err(e) => {
            error!("Execute failed: {}", e);
            false
        }
    }
}

/// Verify required external dependencies before startup. Exits on failure.
///
/// The launch wrapper is a hard requirement: without it nothing can be
/// spawned, so running the application would only produce a broken shell.
pub fn preflight_check() {
    let mut missing: Vec<&str> = Vec::new();

    if which::which(LAUNCH_WRAPPER).is_err() {
        missing.push("uwsm");
    }

    if !missing.is_empty() {
        eprintln!("\n[FATAL] Missing dependencies: {}", missing.join(", "));
        eprintln!("Install with: sudo pacman -S {}\n", missing.join(" "));
        process::exit(1);
    }

    match paths::settings_dir() {
        Ok(dir) => {
            if let Err(e) = probe_writable(&dir) {
                warn!("Settings directory issue ({}): {}", dir.display(), e);
            }
        }
        Err(e) => warn!("Settings directory unavailable: {}", e),
    }
}

fn probe_writable(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(".write_test");
    fs::write(&probe, b"")?;
    fs::remove_file(&probe)
}
