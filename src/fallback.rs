use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::config::FallbackConfig;
use crate::error::ProbeError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub trait CommandRunner {
    /// Runs `program` and returns its stdout if it exits successfully
    /// within `timeout`.
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String, ProbeError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String, ProbeError> {
        (**self).run(program, args, timeout)
    }
}

/// Runs real processes found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String, ProbeError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ProbeError::NotFound {
                    program: program.to_string(),
                },
                _ => ProbeError::Spawn {
                    program: program.to_string(),
                    source,
                },
            })?;

        // Drained on its own thread so a full pipe cannot stall the child.
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stdout.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        }

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => {
                    // A lingering grandchild may hold the pipe open past exit.
                    let remaining = timeout.saturating_sub(start.elapsed());
                    return match rx.recv_timeout(remaining) {
                        Ok(stdout) => Ok(String::from_utf8_lossy(&stdout).into_owned()),
                        Err(_) => Err(ProbeError::TimedOut {
                            program: program.to_string(),
                            timeout,
                        }),
                    };
                }
                Ok(Some(status)) => {
                    return Err(ProbeError::Failed {
                        program: program.to_string(),
                        status,
                    });
                }
                Ok(None) if start.elapsed() > timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::TimedOut {
                        program: program.to_string(),
                        timeout,
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    let _ = child.kill();
                    return Err(ProbeError::Spawn {
                        program: program.to_string(),
                        source,
                    });
                }
            }
        }
    }
}

pub struct FallbackProber<R> {
    runner: R,
    timeout: Duration,
    upower_device: String,
}

impl<R: CommandRunner> FallbackProber<R> {
    pub fn new(runner: R, config: &FallbackConfig) -> Self {
        Self {
            runner,
            timeout: config.timeout(),
            upower_device: config.upower_device.clone(),
        }
    }

    /// Tries `acpi -b`, then `upower -i <device>`. The result is free text
    /// for display, never a parsed cycle count.
    pub fn probe(&self) -> Option<String> {
        self.acpi()
            .or_else(|e| {
                tracing::debug!("Fallback unavailable: {}", e);
                self.upower()
            })
            .inspect_err(|e| tracing::debug!("Fallback unavailable: {}", e))
            .ok()
    }

    fn acpi(&self) -> Result<String, ProbeError> {
        let output = self.runner.run("acpi", &["-b"], self.timeout)?;
        let output = output.trim();
        if output.is_empty() {
            return Err(ProbeError::Empty {
                program: "acpi".to_string(),
            });
        }
        Ok(output.to_string())
    }

    fn upower(&self) -> Result<String, ProbeError> {
        let output = self
            .runner
            .run("upower", &["-i", &self.upower_device], self.timeout)?;
        find_cycle_count_line(&output)
            .map(str::to_string)
            .ok_or_else(|| ProbeError::Empty {
                program: "upower".to_string(),
            })
    }
}

/// First line mentioning `cycle-count` (any case), trimmed.
pub fn find_cycle_count_line(output: &str) -> Option<&str> {
    output
        .lines()
        .find(|line| line.to_lowercase().contains("cycle-count"))
        .map(str::trim)
}
