use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output},
};

use log::{debug, warn};
use thiserror::Error;

/// Something that can put an image on the desktop
pub trait WallpaperSetter {
    fn set_wallpaper(&self, path: &Path) -> Result<(), ApplyError>;
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Wallpaper path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit {
        program: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

impl ApplyError {
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Exit { stdout, stderr, .. } => Some(format!(
                "Script output: {}\nScript error: {}",
                stdout.trim_end(),
                stderr.trim_end()
            )),
            _ => None,
        }
    }
}

/// Sets the desktop picture through Finder with `osascript`
#[derive(Debug, Clone)]
pub struct AppleScript {
    interpreter: OsString,
}

impl Default for AppleScript {
    fn default() -> Self {
        Self {
            interpreter: "osascript".into(),
        }
    }
}

impl AppleScript {
    /// Use something other than `osascript` on the `PATH` to run the script
    #[must_use]
    pub fn with_interpreter(interpreter: impl Into<OsString>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// The script handed to the interpreter for `path`
    pub fn script(path: &Path) -> Result<String, ApplyError> {
        let path = path
            .to_str()
            .ok_or_else(|| ApplyError::NonUtf8Path(path.to_path_buf()))?;
        let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");

        Ok(format!(
            "tell application \"Finder\"\n    set desktop picture to POSIX file \"{escaped}\"\nend tell"
        ))
    }

    fn program(&self) -> String {
        self.interpreter.to_string_lossy().into_owned()
    }
}

impl WallpaperSetter for AppleScript {
    fn set_wallpaper(&self, path: &Path) -> Result<(), ApplyError> {
        let script = Self::script(path)?;
        debug!("Running {}:\n{script}", self.program());

        let output = Command::new(&self.interpreter)
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|source| ApplyError::Spawn {
                program: self.program(),
                source,
            })?;

        check_output(self.program(), output)
    }
}

/// A failed exit is fatal; anything on stderr after a clean exit is only worth a warning.
fn check_output(program: String, output: Output) -> Result<(), ApplyError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ApplyError::Exit {
            program,
            status: output.status,
            stdout,
            stderr,
        });
    }

    if !stderr.trim().is_empty() {
        warn!("{program} warning/error output: {}", stderr.trim_end());
    }

    Ok(())
}
