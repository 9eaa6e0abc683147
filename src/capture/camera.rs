//! Camera capture through an external command
//!
//! Desktop builds have no camera API of their own, so capture is delegated
//! to a user-configured command (e.g. `fswebcam --no-banner {output}` or
//! `imagesnap {output}`). The command must write a photo to `{output}`;
//! when the placeholder is missing, the path is appended as last argument.

use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Placeholder replaced by the capture target path
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Directory where captured photos are kept
/// Returns ~/.cache/plant-doctor/captures on Linux
pub fn capture_dir() -> Result<PathBuf, String> {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "Could not determine cache directory".to_string())?;

    path.push("plant-doctor");
    path.push("captures");
    Ok(path)
}

/// Capture a photo with the configured command.
///
/// `Ok(None)` means the command ran but produced no photo (user cancelled).
pub async fn capture(command: Option<&str>) -> Result<Option<PathBuf>, String> {
    let command = command.ok_or_else(|| {
        format!(
            "No camera available. Set {} to a capture command.",
            crate::config::CAMERA_CMD_VAR
        )
    })?;

    capture_into(command, &capture_dir()?).await
}

/// Run `command` so that it writes a new photo inside `dir`
pub async fn capture_into(command: &str, dir: &Path) -> Result<Option<PathBuf>, String> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Failed to create capture directory: {}", e))?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S%3f");
    let target = dir.join(format!("capture-{}.jpg", stamp));
    let line = expand_command(command, &target);
    debug!("📷 Running camera command: {}", line);

    let output = shell(&line)
        .output()
        .await
        .map_err(|e| format!("Failed to start camera command: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        return Err(if stderr.is_empty() {
            format!("Camera command failed ({})", output.status)
        } else {
            format!("Camera command failed ({}): {}", output.status, stderr)
        });
    }

    let captured = tokio::fs::metadata(&target)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false);

    if captured {
        info!("📸 Captured photo: {}", target.display());
        Ok(Some(target))
    } else {
        debug!("📷 Camera command produced no photo, treating as cancelled");
        Ok(None)
    }
}

/// Substitute the target path into the command line
fn expand_command(command: &str, target: &Path) -> String {
    let quoted = shell_quote(&target.to_string_lossy());
    if command.contains(OUTPUT_PLACEHOLDER) {
        command.replace(OUTPUT_PLACEHOLDER, &quoted)
    } else {
        format!("{} {}", command.trim_end(), quoted)
    }
}

#[cfg(unix)]
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(not(unix))]
fn shell_quote(value: &str) -> String {
    format!("\"{}\"", value)
}

#[cfg(unix)]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(not(unix))]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_command() {
        let target = Path::new("/tmp/caps/capture-1.jpg");
        assert_eq!(
            expand_command("fswebcam -r 1280x720 {output}", target),
            "fswebcam -r 1280x720 '/tmp/caps/capture-1.jpg'"
        );
        assert_eq!(
            expand_command("imagesnap ", target),
            "imagesnap '/tmp/caps/capture-1.jpg'"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_camera_is_an_error() {
        let err = capture(None).await.unwrap_err();
        assert!(err.contains(crate::config::CAMERA_CMD_VAR));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_into_writes_photo() {
        let dir = tempfile::tempdir().unwrap();
        let path = capture_into("printf 'jpegbytes' > {output}", dir.path())
            .await
            .unwrap()
            .expect("photo should be captured");

        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpegbytes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_without_output_is_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let result = capture_into("true", dir.path()).await.unwrap();
        assert_eq!(result, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = capture_into("echo 'no device' >&2; exit 3 #", dir.path())
            .await
            .unwrap_err();
        assert!(err.contains("no device"), "{}", err);
    }
}
