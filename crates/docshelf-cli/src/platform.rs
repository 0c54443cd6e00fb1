//! Desktop implementations of the device services
//!
//! - `PathPicker`: the file named on the command line
//! - `SystemShare`: opens the file with the desktop's default handler
//! - `CommandRecorder`: runs an external recorder program
//! - `PromptAuthenticator`: confirmation challenge on the terminal

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use docshelf_core::platform::{
    AudioCapture, AuthOutcome, Biometric, CaptureHandle, CaptureOptions, DocumentPicker,
    Permission, PickedFile, Sharing,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::prompt::{command_exists, confirm, is_interactive};

/// Placeholder in the recorder template replaced by the capture path
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// How long a recorder may take to flush after being interrupted
const STOP_GRACE: Duration = Duration::from_secs(3);

/// Picks a single path given up front
pub struct PathPicker {
    path: PathBuf,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentPicker for PathPicker {
    fn pick(&self) -> io::Result<Option<PickedFile>> {
        PickedFile::from_path(&self.path).map(Some).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{:?} does not name a file", self.path),
            )
        })
    }
}

/// Shares by handing the file to the default application
pub struct SystemShare;

impl Sharing for SystemShare {
    fn is_available(&self) -> bool {
        cfg!(any(target_os = "macos", target_os = "windows"))
            || std::env::var_os("DISPLAY").is_some()
            || std::env::var_os("WAYLAND_DISPLAY").is_some()
    }

    fn share(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}

/// Authenticates by asking the user at the terminal
pub struct PromptAuthenticator;

impl Biometric for PromptAuthenticator {
    fn has_hardware(&self) -> bool {
        is_interactive()
    }

    fn authenticate(&self, prompt: &str) -> AuthOutcome {
        match confirm(prompt) {
            Ok(true) => AuthOutcome::Success,
            Ok(false) => AuthOutcome::Failure,
            Err(e) => {
                warn!("Authentication prompt failed: {}", e);
                AuthOutcome::Failure
            }
        }
    }
}

/// Captures audio by running an external recorder
///
/// The template is split on whitespace; `{output}` is replaced with the
/// temporary capture path (appended if absent).
pub struct CommandRecorder {
    template: String,
    format: String,
}

impl CommandRecorder {
    pub fn new(template: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            format: format.into(),
        }
    }

    fn program(&self) -> Option<&str> {
        self.template.split_whitespace().next()
    }

    fn command_line(&self, output: &Path) -> Vec<String> {
        let output = output.display().to_string();
        let mut args: Vec<String> = self
            .template
            .split_whitespace()
            .map(|part| part.replace(OUTPUT_PLACEHOLDER, &output))
            .collect();
        if !self.template.contains(OUTPUT_PLACEHOLDER) {
            args.push(output);
        }
        args
    }

    fn capture_path(&self) -> PathBuf {
        std::env::temp_dir().join(format!(
            "docshelf-capture-{}.{}",
            Uuid::new_v4(),
            self.format.trim_start_matches('.')
        ))
    }
}

impl AudioCapture for CommandRecorder {
    type Handle = RecorderHandle;

    fn request_permission(&self) -> Permission {
        match self.program() {
            Some(program) if command_exists(program) => Permission::Granted,
            Some(program) => {
                warn!("Recorder program '{}' not found on PATH", program);
                Permission::Denied
            }
            None => Permission::Denied,
        }
    }

    fn start(&mut self, options: &CaptureOptions) -> io::Result<RecorderHandle> {
        let path = self.capture_path();
        let args = self.command_line(&path);
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty recorder command"))?;

        debug!("Starting recorder {:?} ({:?})", args, options.preset);
        let child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(RecorderHandle { child, path })
    }
}

/// A running recorder process
pub struct RecorderHandle {
    child: Child,
    path: PathBuf,
}

impl RecorderHandle {
    /// Ask the recorder to finish so it can write trailers, then force it
    fn terminate(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        {
            let pid = self.child.id().to_string();
            match Command::new("kill").arg("-INT").arg(&pid).status() {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("Interrupting recorder {} failed: kill exited with {}", pid, status),
                Err(e) => warn!("Could not run kill for recorder {}: {}", pid, e),
            }

            let deadline = Instant::now() + STOP_GRACE;
            while Instant::now() < deadline {
                if self.child.try_wait()?.is_some() {
                    return Ok(());
                }
                thread::sleep(Duration::from_millis(50));
            }
            warn!("Recorder did not exit after interrupt, killing it");
        }

        self.child.kill()?;
        self.child.wait().map(|_| ())
    }
}

impl CaptureHandle for RecorderHandle {
    fn stop(&mut self) -> io::Result<PathBuf> {
        match self.child.try_wait()? {
            Some(status) => debug!("Recorder already exited: {}", status),
            None => self.terminate()?,
        }

        if !self.path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("recorder produced no output at {:?}", self.path),
            ));
        }
        info!("Capture written to {:?}", self.path);
        Ok(self.path.clone())
    }

    fn has_finished(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}
