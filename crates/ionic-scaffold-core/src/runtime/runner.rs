//! Subprocess execution for package manager commands
//!
//! Commands always run in the explicit working directory carried by the
//! [`Invocation`]; the process-wide current directory is never changed.

use crate::error::{Result, ScaffoldError};
use crate::runtime::package_manager::Invocation;
use colored::Colorize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Executes package manager invocations
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run to completion; a non-zero exit is a `PackageManager` error
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Echo the child's output while it runs
    pub verbose: bool,
}

impl ProcessRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let command = invocation.to_string();
        debug!(%command, cwd = %invocation.cwd.display(), "running package manager command");

        let failure = |stderr: String| ScaffoldError::PackageManager {
            command: command.clone(),
            stderr,
        };

        // Resolves npm.cmd and friends on Windows
        let program = which::which(&invocation.program)
            .map_err(|e| failure(format!("{}: {}", invocation.program, e)))?;

        let mut child = TokioCommand::new(program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failure(e.to_string()))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdout), Some(stderr)) = (stdout, stderr) else {
            return Err(failure("failed to capture child output".to_string()));
        };

        let mut stdout_reader = BufReader::new(stdout);
        let mut stderr_reader = BufReader::new(stderr);
        // Partial lines survive a cancelled select branch
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let mut captured = String::new();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout_reader.read_until(b'\n', &mut stdout_buf), if stdout_open => {
                    match read {
                        Ok(0) => stdout_open = false,
                        Ok(_) => {
                            let line = take_line(&mut stdout_buf);
                            if self.verbose {
                                println!("  {}", line.dimmed());
                            }
                        }
                        Err(e) => {
                            debug!("error reading stdout: {}", e);
                            stdout_open = false;
                        }
                    }
                }
                read = stderr_reader.read_until(b'\n', &mut stderr_buf), if stderr_open => {
                    match read {
                        Ok(0) => stderr_open = false,
                        Ok(_) => {
                            let line = take_line(&mut stderr_buf);
                            if self.verbose {
                                eprintln!("  {}", line.yellow());
                            }
                            captured.push_str(&line);
                            captured.push('\n');
                        }
                        Err(e) => {
                            debug!("error reading stderr: {}", e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child.wait().await.map_err(|e| failure(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            debug!(code = ?status.code(), "package manager command failed");
            Err(failure(captured))
        }
    }
}

/// Drain one line from the buffer, decoding lossily
fn take_line(buf: &mut Vec<u8>) -> String {
    let line = String::from_utf8_lossy(buf).trim_end_matches(['\r', '\n']).to_string();
    buf.clear();
    line
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: PathBuf::from("."),
        }
    }

    #[tokio::test]
    async fn test_successful_command() {
        let runner = ProcessRunner::new(false);
        assert!(runner.run(&invocation("sh", &["-c", "echo ok"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_captures_stderr() {
        let runner = ProcessRunner::new(false);
        let err = runner
            .run(&invocation("sh", &["-c", "echo 'npm ERR! boom' >&2; exit 3"]))
            .await
            .unwrap_err();

        match err {
            ScaffoldError::PackageManager { command, stderr } => {
                assert!(command.starts_with("sh -c"));
                assert!(stderr.contains("npm ERR! boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_output_keeps_draining() {
        let runner = ProcessRunner::new(false);
        let script = "printf 'bad \\377 bytes\\n' >&2; \
                      i=0; while [ $i -lt 3000 ]; do echo 'filler output line for the pipe' >&2; i=$((i+1)); done; \
                      echo 'npm ERR! after' >&2; exit 1";
        let err = runner.run(&invocation("sh", &["-c", script])).await.unwrap_err();

        match err {
            ScaffoldError::PackageManager { stderr, .. } => {
                assert!(stderr.contains("bad \u{fffd} bytes"));
                assert!(stderr.contains("npm ERR! after"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_take_line_trims_line_endings() {
        let mut buf = b"done\r\n".to_vec();
        assert_eq!(take_line(&mut buf), "done");
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessRunner::new(false);
        let err = runner
            .run(&invocation("definitely-not-a-package-manager", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::PackageManagerFailure);
    }
}
