//! Resolver backed by an external extraction process (yt-dlp compatible)

use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::domain::video::{MetadataResolver, SourceUrl};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_resolver_invocation;

/// Arguments requesting one JSON document for a single item
const FIXED_ARGS: [&str; 2] = ["-j", "--no-playlist"];

/// Launches one resolver process per call and returns its standard output
#[derive(Debug, Clone)]
pub struct ProcessResolver {
    program: String,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
    kill_on_drop: bool,
}

impl ProcessResolver {
    /// Creates a resolver running the given program with default settings
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            timeout: None,
            kill_on_drop: false,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
            timeout: config.timeout(),
            kill_on_drop: config.kill_on_disconnect,
        }
    }

    /// Adds arguments passed before the fixed ones
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Sets the upper bound for one invocation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Kills the process when the resolving future is dropped
    pub fn with_kill_on_drop(mut self, kill: bool) -> Self {
        self.kill_on_drop = kill;
        self
    }

    /// Full argument list for one invocation
    pub fn args_for(&self, url: &SourceUrl) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend(FIXED_ARGS.iter().map(|arg| arg.to_string()));
        args.push("--".to_string());
        args.push(url.as_str().to_string());
        args
    }

    fn build_command(&self, url: &SourceUrl) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(self.kill_on_drop);
        cmd
    }

    async fn run(&self, url: &SourceUrl) -> Result<Vec<u8>, DomainError> {
        let mut child = self.build_command(url).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DomainError::resolution_failed(format!(
                    "resolver '{}' not found",
                    self.program
                ))
            } else {
                DomainError::resolution_failed(format!(
                    "failed to launch resolver '{}': {}",
                    self.program, e
                ))
            }
        })?;

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collect_output(&mut child))
                .await
                .map_err(|_| limit),
            None => Ok(collect_output(&mut child).await),
        };

        let output = match waited {
            Ok(output) => output.map_err(|e| {
                DomainError::resolution_failed(format!("resolver I/O error: {}", e))
            })?,
            Err(limit) => {
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed out resolver");
                }

                return Err(DomainError::resolution_failed(format!(
                    "resolver timed out after {}ms",
                    limit.as_millis()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = stderr.trim();

            return Err(DomainError::resolution_failed(if diagnostic.is_empty() {
                format!("resolver exited with {}", output.status)
            } else {
                diagnostic.to_string()
            }));
        }

        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Err(DomainError::resolution_failed("resolver produced no output"));
        }

        Ok(output.stdout)
    }
}

/// Waits for the child while draining both pipes
async fn collect_output(child: &mut Child) -> std::io::Result<Output> {
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let read_stdout = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(buf)
    };

    let read_stderr = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(buf)
    };

    let (status, stdout, stderr) = tokio::try_join!(child.wait(), read_stdout, read_stderr)?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

#[async_trait]
impl MetadataResolver for ProcessResolver {
    async fn resolve(&self, url: &SourceUrl) -> Result<Vec<u8>, DomainError> {
        info!(url = %url, program = %self.program, "Invoking resolver");
        let start = Instant::now();

        let result = self.run(url).await;
        let elapsed = start.elapsed();
        record_resolver_invocation(result.is_ok(), elapsed);

        match &result {
            Ok(stdout) => debug!(
                url = %url,
                bytes = stdout.len(),
                duration_ms = %elapsed.as_millis(),
                "Resolver finished"
            ),
            Err(e) => warn!(
                url = %url,
                duration_ms = %elapsed.as_millis(),
                error = %e,
                "Resolver failed"
            ),
        }

        result
    }
}
