//! Recording session
//!
//! State machine around a single audio capture:
//!
//! ```text
//! Idle --start()--> Recording --stop()/device finished--> Idle
//! ```
//!
//! The driver calls `tick()` once per second while the session is live.
//! Each tick either advances the elapsed counter or, if the device
//! stopped on its own, finalizes the capture into the library.
//!
//! Dropping a session that is still recording stops and stores the capture.

use tracing::{debug, info, warn};

use crate::error::{Capability, LibraryError, Result};
use crate::models::Document;
use crate::platform::{AudioCapture, CaptureHandle, CaptureOptions, Permission};
use crate::repository::DocumentRepository;
use crate::storage::Storage;

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

/// Result of a clock tick
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Nothing is being recorded
    Idle,
    /// Still recording, with total elapsed seconds
    Elapsed(u64),
    /// The device finished by itself and the capture was stored
    AutoStopped(Document),
}

/// One recording screen's worth of capture state
pub struct RecordingSession<'a, S: Storage, A: AudioCapture> {
    repository: &'a DocumentRepository<S>,
    capture: A,
    options: CaptureOptions,
    handle: Option<A::Handle>,
    elapsed_secs: u64,
}

impl<'a, S: Storage, A: AudioCapture> RecordingSession<'a, S, A> {
    pub fn new(repository: &'a DocumentRepository<S>, capture: A) -> Self {
        Self::with_options(repository, capture, CaptureOptions::default())
    }

    pub fn with_options(
        repository: &'a DocumentRepository<S>,
        capture: A,
        options: CaptureOptions,
    ) -> Self {
        Self {
            repository,
            capture,
            options,
            handle: None,
            elapsed_secs: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.handle.is_some() {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.handle.is_some()
    }

    /// Seconds counted during the current (or last) recording
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Get the capture device
    pub fn capture(&self) -> &A {
        &self.capture
    }

    /// Request permission and begin capturing
    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Err(LibraryError::AlreadyRecording);
        }

        if self.capture.request_permission() == Permission::Denied {
            warn!("Microphone permission denied");
            return Err(LibraryError::PermissionDenied(Capability::Microphone));
        }

        let handle = self
            .capture
            .start(&self.options)
            .map_err(|e| LibraryError::Capture(e.to_string()))?;

        self.handle = Some(handle);
        self.elapsed_secs = 0;
        info!("Recording started");
        Ok(())
    }

    /// Advance the session clock by one second
    pub fn tick(&mut self) -> Result<SessionEvent> {
        let finished = match self.handle.as_mut() {
            None => return Ok(SessionEvent::Idle),
            Some(handle) => handle.has_finished(),
        };

        if finished {
            info!("Capture device finished after {}s", self.elapsed_secs);
            let doc = self.finish()?;
            return Ok(doc.map_or(SessionEvent::Idle, SessionEvent::AutoStopped));
        }

        self.elapsed_secs += 1;
        Ok(SessionEvent::Elapsed(self.elapsed_secs))
    }

    /// Stop capturing and store the recording
    ///
    /// Does nothing and returns `None` when no capture is active. The
    /// session is idle afterwards even if storing fails.
    pub fn stop(&mut self) -> Result<Option<Document>> {
        if self.handle.is_none() {
            debug!("Stop requested with no active recording");
            return Ok(None);
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<Option<Document>> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(None);
        };

        let artifact = handle
            .stop()
            .map_err(|e| LibraryError::Capture(e.to_string()))?;
        let doc = match self.repository.store_recording(&artifact) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Could not store recording, capture left at {:?}: {}", artifact, e);
                return Err(LibraryError::RecordingNotStored {
                    artifact,
                    source: Box::new(e),
                });
            }
        };
        info!("Recording saved as {} after {}s", doc.name, self.elapsed_secs);
        Ok(Some(doc))
    }
}

impl<S: Storage, A: AudioCapture> Drop for RecordingSession<'_, S, A> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.stop() {
                warn!("Failed to stop recording during teardown: {}", e);
            }
        }
    }
}
