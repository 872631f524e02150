//! Running external tools and classifying how they exited.

use std::ffi::OsString;
use std::process::{Output, Stdio};
use tracing::debug;

use super::error::ToolError;
use super::resolver::ToolHandle;

/// How an external process finished.
///
/// A non-zero exit is not an error by itself: callers decide whether a
/// rejection is recoverable (a native encoder refusing its input) or fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit status zero.
    Success { stdout: Vec<u8> },
    /// Non-zero exit status, or terminated by a signal.
    Rejected { code: Option<i32>, stderr: String },
}

impl ProcessOutcome {
    fn from_output(output: Output) -> Self {
        if output.status.success() {
            Self::Success {
                stdout: output.stdout,
            }
        } else {
            Self::Rejected {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        }
    }

    /// Whether the process exited successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Treats a rejection as fatal, returning stdout on success.
    pub fn into_result(self, tool: &ToolHandle) -> Result<Vec<u8>, ToolError> {
        match self {
            Self::Success { stdout } => Ok(stdout),
            Self::Rejected { code, stderr } => {
                Err(ToolError::process_failure(tool.name(), code, stderr))
            }
        }
    }
}

/// Runs `tool` with `args` to completion, capturing its output.
pub async fn run(tool: &ToolHandle, args: &[OsString]) -> Result<ProcessOutcome, ToolError> {
    debug!("Running {} {:?}", tool.name(), args);

    let output = tool
        .command()
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ToolError::SpawnFailed {
            path: tool.path().to_path_buf(),
            source: e,
        })?;

    Ok(ProcessOutcome::from_output(output))
}

/// Runs `producer | consumer`, streaming the producer's stdout into the
/// consumer's stdin without touching the filesystem.
///
/// The consumer's own exit is returned as an outcome. A failing producer is
/// fatal only when the consumer succeeded: once the consumer is rejected the
/// producer usually dies on the broken pipe, and the consumer's stderr is the
/// one that explains what went wrong.
pub async fn run_piped(
    producer: &ToolHandle,
    producer_args: &[OsString],
    consumer: &ToolHandle,
    consumer_args: &[OsString],
) -> Result<ProcessOutcome, ToolError> {
    debug!(
        "Running {} {:?} | {} {:?}",
        producer.name(),
        producer_args,
        consumer.name(),
        consumer_args
    );

    let mut upstream = producer
        .command()
        .args(producer_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::SpawnFailed {
            path: producer.path().to_path_buf(),
            source: e,
        })?;

    let pipe_error = |source: std::io::Error| ToolError::PipeFailed {
        producer: producer.name().to_string(),
        consumer: consumer.name().to_string(),
        source,
    };

    let stream: Stdio = upstream
        .stdout
        .take()
        .ok_or_else(|| pipe_error(std::io::ErrorKind::BrokenPipe.into()))?
        .try_into()
        .map_err(pipe_error)?;

    let downstream = consumer
        .command()
        .args(consumer_args)
        .stdin(stream)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::SpawnFailed {
            path: consumer.path().to_path_buf(),
            source: e,
        })?;

    let (upstream_output, downstream_output) =
        tokio::try_join!(upstream.wait_with_output(), downstream.wait_with_output())?;

    let downstream_outcome = ProcessOutcome::from_output(downstream_output);
    if downstream_outcome.is_success() {
        ProcessOutcome::from_output(upstream_output).into_result(producer)?;
    } else if !upstream_output.status.success() {
        debug!(
            "{} exited with {} after {} was rejected",
            producer.name(),
            upstream_output.status,
            consumer.name()
        );
    }

    Ok(downstream_outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::tools::ToolResolver;

    fn sh() -> ToolHandle {
        ToolResolver::new().resolve("/bin/sh").unwrap()
    }

    fn args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[tokio::test]
    async fn test_success_captures_stdout() {
        let outcome = run(&sh(), &args(&["-c", "printf 2"])).await.unwrap();
        assert_eq!(
            outcome,
            ProcessOutcome::Success {
                stdout: b"2".to_vec()
            }
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_rejection() {
        let outcome = run(&sh(), &args(&["-c", "echo unsupported >&2; exit 3"]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ProcessOutcome::Rejected {
                code: Some(3),
                stderr: "unsupported".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_into_result_maps_rejection_to_failure() {
        let tool = sh();
        let outcome = run(&tool, &args(&["-c", "exit 1"])).await.unwrap();

        let err = outcome.into_result(&tool).unwrap_err();
        assert!(matches!(
            err,
            ToolError::ExternalProcessFailure { code: Some(1), .. }
        ));
    }

    #[tokio::test]
    async fn test_piped_streams_between_processes() {
        let tool = sh();
        let outcome = run_piped(
            &tool,
            &args(&["-c", "printf 'hello pipe'"]),
            &tool,
            &args(&["-c", "tr a-z A-Z"]),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ProcessOutcome::Success {
                stdout: b"HELLO PIPE".to_vec()
            }
        );
    }

    #[tokio::test]
    async fn test_piped_producer_failure_is_fatal() {
        let tool = sh();
        let err = run_piped(
            &tool,
            &args(&["-c", "echo broken >&2; exit 4"]),
            &tool,
            &args(&["-c", "cat > /dev/null"]),
        )
        .await
        .unwrap_err();

        match err {
            ToolError::ExternalProcessFailure { code, stderr, .. } => {
                assert_eq!(code, Some(4));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_piped_consumer_failure_wins_over_broken_pipe() {
        let tool = sh();
        let outcome = run_piped(
            &tool,
            &args(&["-c", "head -c 4000000 /dev/zero"]),
            &tool,
            &args(&["-c", "echo 'opusenc: cannot open output' >&2; exit 7"]),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ProcessOutcome::Rejected {
                code: Some(7),
                stderr: "opusenc: cannot open output".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_piped_consumer_rejection_is_returned() {
        let tool = sh();
        let outcome = run_piped(
            &tool,
            &args(&["-c", "printf data"]),
            &tool,
            &args(&["-c", "cat > /dev/null; exit 2"]),
        )
        .await
        .unwrap();

        assert!(!outcome.is_success());
    }
}
