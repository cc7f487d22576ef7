//! Build-system drivers.
//!
//! A recipe's build step is a generic configure/build/install triad
//! delegated to an external toolchain. Both drivers here build their
//! command lines as plain data first, so tests can assert on the exact
//! invocation without running anything, and execute them through
//! [`run_tool`] with the dependency-derived environment applied.

pub mod autotools;
pub mod cmake;
pub mod env;

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::RecipeError;
use crate::toolchain::env::BuildEnv;

/// Run an external build tool, appending its output to the build log.
///
/// The program is located on `PATH` first; a missing tool is reported as
/// [`RecipeError::ToolNotFound`] rather than a cryptic spawn failure. On a
/// non-zero exit the log tail is emitted through `tracing` and the error
/// carries the log path.
pub fn run_tool(
    program: &str,
    args: &[String],
    cwd: &Path,
    env: &BuildEnv,
    log_path: &Path,
) -> Result<(), RecipeError> {
    let resolved =
        which::which(program).map_err(|_| RecipeError::ToolNotFound(program.to_string()))?;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing::info!(program, ?args, cwd = %cwd.display(), "running build tool");

    let mut cmd = Command::new(resolved);
    cmd.args(args)
        .current_dir(cwd)
        .stdout(Stdio::from(log_file.try_clone()?))
        .stderr(Stdio::from(log_file));
    env.apply(&mut cmd);

    let status = cmd.status()?;
    if !status.success() {
        if let Ok(tail) = read_last_lines(log_path, 20) {
            tracing::error!(program, "build tool failed:\n{tail}");
        }
        return Err(RecipeError::Toolchain {
            program: program.to_string(),
            code: status.code(),
            log: log_path.display().to_string(),
        });
    }

    Ok(())
}

/// Read the last N lines from a file without loading all of it.
///
/// Build logs can be large; only a fixed-size tail is read back.
fn read_last_lines(path: &Path, n: usize) -> std::io::Result<String> {
    const TAIL_SIZE: u64 = 16 * 1024;

    let mut file = std::fs::File::open(path)?;
    let file_len = file.metadata()?.len();

    let seek_pos = file_len.saturating_sub(TAIL_SIZE);
    file.seek(SeekFrom::Start(seek_pos))?;

    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;

    // If we seeked mid-file, skip the first (partial) line.
    let content = if seek_pos > 0 {
        buffer
            .find('\n')
            .map_or(buffer.as_str(), |idx| &buffer[idx + 1..])
    } else {
        &buffer
    };

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            "kiln-no-such-tool",
            &[],
            dir.path(),
            &BuildEnv::default(),
            &dir.path().join("build.log"),
        )
        .unwrap_err();
        assert!(matches!(err, RecipeError::ToolNotFound(_)));
    }

    #[test]
    fn test_failing_tool_reports_exit_code_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("build.log");
        let err = run_tool(
            "false",
            &[],
            dir.path(),
            &BuildEnv::default(),
            &log,
        )
        .unwrap_err();

        match err {
            RecipeError::Toolchain { program, code, .. } => {
                assert_eq!(program, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(log.exists());
    }

    #[test]
    fn test_successful_tool_output_lands_in_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("build.log");
        run_tool(
            "echo",
            &["hello from the build".to_string()],
            dir.path(),
            &BuildEnv::default(),
            &log,
        )
        .unwrap();

        let contents = std::fs::read_to_string(&log).unwrap();
        assert!(contents.contains("hello from the build"));
    }

    #[test]
    fn test_read_last_lines_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        let body: String = (0..100).map(|i| format!("line {i}\n")).collect();
        std::fs::write(&path, body).unwrap();

        let tail = read_last_lines(&path, 3).unwrap();
        assert_eq!(tail, "line 97\nline 98\nline 99");
    }
}
