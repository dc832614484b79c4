//! External Tool Bridge
//!
//! Runs command-line audio tools (rubberband, sox) against temporary WAV
//! files. Tools are always invoked with an argument vector, never through a
//! shell, and a non-zero exit is a typed error carrying the tool's stderr.

mod rubberband;
mod sox;

pub use rubberband::time_stretch_args;
pub use sox::{compand_args, equalizer_args, CompandPreset, EqualizerBand};

use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::engine::io::{load_wav, write_wav, WavFormat};
use crate::engine::SampleBuffer;
use crate::error::{AugmentError, Result};

/// How often a running tool is polled for completion
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long to wait for stderr after killing a timed-out tool
///
/// Grandchildren of the tool may keep the pipe open after the kill.
const KILLED_STDERR_GRACE: Duration = Duration::from_millis(200);

/// A command-line tool with a fixed executable and timeout
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: PathBuf,
    leading_args: Vec<OsString>,
    timeout: Duration,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout,
        }
    }

    /// Arguments placed before every invocation's own arguments
    ///
    /// Lets a wrapper (an interpreter plus script) stand in for the tool.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Run the tool to completion and return its stdout
    ///
    /// # Errors
    /// * `ExternalToolFailure` - If the tool cannot be started or exits non-zero
    /// * `ExternalToolTimeout` - If the tool runs longer than the timeout
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let tool = self.name();
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Running {:?}", command);

        let mut child = command
            .spawn()
            .map_err(|e| AugmentError::ExternalToolFailure {
                tool: tool.clone(),
                status: "failed to start".to_string(),
                stderr: e.to_string(),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_with_deadline(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AugmentError::ExternalToolTimeout {
                    tool,
                    timeout: self.timeout,
                    stderr: collect(stderr, Some(KILLED_STDERR_GRACE)),
                });
            }
        };

        let stdout = collect(stdout, None);
        let stderr = collect(stderr, None);
        if !status.success() {
            return Err(AugmentError::ExternalToolFailure {
                tool,
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }

    /// Pass `input` through the tool via temporary WAV files
    ///
    /// `build_args` receives the input and output paths and returns the
    /// argument vector. Temporary files are removed on every exit path.
    pub fn process<F>(
        &self,
        input: &SampleBuffer,
        format: WavFormat,
        build_args: F,
    ) -> Result<SampleBuffer>
    where
        F: FnOnce(&Path, &Path) -> Result<Vec<OsString>>,
    {
        let scratch = tempfile::Builder::new().prefix("augment-").tempdir()?;
        let in_path = scratch.path().join("in.wav");
        let out_path = scratch.path().join("out.wav");

        let args = build_args(&in_path, &out_path)?;
        write_wav(input, &in_path, format)?;
        info!("{} {}", self.name(), display_args(&args));
        self.run(&args)?;

        if !out_path.is_file() {
            return Err(AugmentError::ExternalToolFailure {
                tool: self.name(),
                status: "exit status: 0".to_string(),
                stderr: format!("no output written to {}", out_path.display()),
            });
        }
        load_wav(&out_path)
    }
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Read a child pipe to EOF on a background thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            let _ = tx.send(String::from_utf8_lossy(&bytes).into_owned());
        });
        rx
    })
}

fn collect(rx: Option<Receiver<String>>, wait: Option<Duration>) -> String {
    match (rx, wait) {
        (Some(rx), Some(wait)) => rx.recv_timeout(wait).unwrap_or_default(),
        (Some(rx), None) => rx.recv().unwrap_or_default(),
        (None, _) => String::new(),
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::engine::io::generate_test_tone;

    fn sh(script: &str) -> ExternalTool {
        ExternalTool::new("sh", Duration::from_secs(10))
            .with_leading_args(["-c", script, "fake-tool"])
    }

    #[test]
    fn test_run_returns_stdout() {
        let out = sh("echo hello").run(Vec::<OsString>::new()).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_non_zero_exit_carries_stderr() {
        match sh("echo 'sox FAIL: bad effect' >&2; exit 3").run(Vec::<OsString>::new()) {
            Err(AugmentError::ExternalToolFailure { tool, status, stderr }) => {
                assert_eq!(tool, "sh");
                assert!(status.contains('3'), "{}", status);
                assert_eq!(stderr, "sox FAIL: bad effect");
            }
            other => panic!("Expected ExternalToolFailure, got: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_kills_tool() {
        let tool = ExternalTool::new("sh", Duration::from_millis(200))
            .with_leading_args(["-c", "echo started >&2; sleep 5"]);
        let started = Instant::now();
        match tool.run(Vec::<OsString>::new()) {
            Err(AugmentError::ExternalToolTimeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("Expected ExternalToolTimeout, got: {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program_is_tool_failure() {
        let tool = ExternalTool::new("/nonexistent/bin/rubberband", Duration::from_secs(1));
        let err = tool.run(["--help"]).unwrap_err();
        assert_eq!(err.error_code(), "EXTERNAL_TOOL_FAILURE");
    }

    #[test]
    fn test_arguments_are_not_shell_expanded() {
        let out = sh(r#"printf '%s' "$1""#).run(["$(echo injected); rm -rf /"]).unwrap();
        assert_eq!(out, "$(echo injected); rm -rf /");
    }

    #[test]
    fn test_process_round_trips_through_copy() {
        let input = generate_test_tone(440.0, 0.5, 0.1, 16000).unwrap();
        let tool = sh(r#"cp "$1" "$2""#);
        let output = tool
            .process(&input, WavFormat::default(), |i, o| {
                Ok(vec![i.as_os_str().to_owned(), o.as_os_str().to_owned()])
            })
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_process_without_output_file_fails() {
        let input = generate_test_tone(440.0, 0.5, 0.1, 16000).unwrap();
        let err = sh("true")
            .process(&input, WavFormat::default(), |i, o| {
                Ok(vec![i.as_os_str().to_owned(), o.as_os_str().to_owned()])
            })
            .unwrap_err();
        assert!(err.to_string().contains("no output"));
    }
}
