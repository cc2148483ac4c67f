use std::{
    io::Read as _,
    path::Path,
    process::{Command, Stdio},
    sync::mpsc,
    time::{Duration, Instant},
};

use crate::{
    fetch::BackgroundFetcher,
    foundation::error::{TemplateError, TemplateResult},
    render::encode::ensure_parent_dir,
};

pub const DEFAULT_BG_PROGRAM: &str = "python3";
pub const DEFAULT_BG_ARGS: &[&str] = &["ai_enhance.py"];
pub const DEFAULT_BG_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How the background generator is launched.
///
/// The child is run as `program args... <theme> <output>`, each a separate argv
/// entry; nothing passes through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_BG_PROGRAM.to_owned(),
            args: DEFAULT_BG_ARGS.iter().map(|s| (*s).to_owned()).collect(),
            timeout: DEFAULT_BG_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `TEMPLATE_GEN_BG_PROGRAM`, `TEMPLATE_GEN_BG_ARGS`
    /// (whitespace-separated) and `TEMPLATE_GEN_BG_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let program = lookup("TEMPLATE_GEN_BG_PROGRAM")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.program);
        let args = lookup("TEMPLATE_GEN_BG_ARGS")
            .map(|v| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or(defaults.args);
        let timeout = lookup("TEMPLATE_GEN_BG_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self {
            program,
            args,
            timeout,
            poll_interval: defaults.poll_interval,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if self.program.trim().is_empty() {
            return Err(TemplateError::validation(
                "background program must be non-empty",
            ));
        }
        if self.timeout.is_zero() {
            return Err(TemplateError::validation(
                "background timeout must be > 0",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(TemplateError::validation(
                "background poll interval must be > 0",
            ));
        }
        Ok(())
    }
}

/// [`BackgroundFetcher`] backed by an external generator process.
#[derive(Clone, Debug, Default)]
pub struct CommandFetcher {
    cfg: FetchConfig,
}

impl CommandFetcher {
    pub fn new(cfg: FetchConfig) -> TemplateResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.cfg
    }

    /// Run the generator to completion (or timeout) and confirm it left a file at `output`.
    pub fn run(&self, theme: &str, output: &Path) -> TemplateResult<()> {
        ensure_parent_dir(output)?;
        // A file left by an earlier run must not pass for this run's result.
        match std::fs::remove_file(output) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TemplateError::io(format!(
                    "remove stale '{}': {e}",
                    output.display()
                )));
            }
        }

        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(&self.cfg.args)
            .arg(theme)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            TemplateError::external_process(format!(
                "failed to spawn '{}': {e}",
                self.cfg.program
            ))
        })?;

        // Drained on a separate thread so a chatty child cannot block on a full pipe.
        // Grandchildren may keep the pipe open after the child exits, so the
        // result is only awaited until the deadline and the thread is otherwise detached.
        let (stderr_tx, stderr_rx) = mpsc::channel::<String>();
        if let Some(mut pipe) = child.stderr.take() {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                let _ = stderr_tx.send(buf);
            });
        } else {
            drop(stderr_tx);
        }

        let deadline = Instant::now() + self.cfg.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TemplateError::external_process(format!(
                        "'{}' timed out after {:?}",
                        self.cfg.program, self.cfg.timeout
                    )));
                }
                Ok(None) => std::thread::sleep(self.cfg.poll_interval),
                Err(e) => {
                    let _ = child.kill();
                    return Err(TemplateError::external_process(format!(
                        "failed to wait for '{}': {e}",
                        self.cfg.program
                    )));
                }
            }
        };

        let stderr = stderr_rx
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
            .unwrap_or_default();
        if !status.success() {
            return Err(TemplateError::external_process(format!(
                "'{}' exited with {status}: {}",
                self.cfg.program,
                stderr.trim()
            )));
        }
        if !output.is_file() {
            return Err(TemplateError::external_process(format!(
                "'{}' succeeded but wrote nothing to '{}'",
                self.cfg.program,
                output.display()
            )));
        }
        Ok(())
    }
}

impl BackgroundFetcher for CommandFetcher {
    fn fetch_background(&self, theme: &str, output: &Path) -> bool {
        tracing::info!(theme, output = %output.display(), "generating background");
        match self.run(theme, output) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "background generation failed; continuing without it");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/command.rs"]
mod tests;
