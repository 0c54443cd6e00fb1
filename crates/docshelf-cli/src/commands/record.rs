//! Voice recording command

use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use docshelf_core::{Library, SessionEvent};

use crate::output::Output;
use crate::platform::CommandRecorder;

/// Record until Ctrl-C, the time limit, or the recorder exits
///
/// Stopping waits on the recorder process, so it runs via `block_in_place`
/// and needs the multi-threaded runtime.
pub async fn record(library: &Library, max_secs: Option<u64>, output: &Output) -> Result<()> {
    let config = library.config();
    let recorder = CommandRecorder::new(config.recorder.as_str(), config.recording_format.as_str());
    let mut session = library.recording_session(recorder);

    session.start()?;
    output.progress(0);

    let mut clock = interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    clock.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let doc = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("Interrupted after {}s", session.elapsed_secs());
                break tokio::task::block_in_place(|| session.stop())?;
            }
            _ = clock.tick() => match session.tick()? {
                SessionEvent::Elapsed(secs) => {
                    output.progress(secs);
                    if max_secs.is_some_and(|max| secs >= max) {
                        break tokio::task::block_in_place(|| session.stop())?;
                    }
                }
                SessionEvent::AutoStopped(doc) => break Some(doc),
                SessionEvent::Idle => break None,
            },
        }
    };
    output.finish_progress();

    match doc {
        Some(doc) => {
            output.success(&format!("Saved recording: {}", doc.name));
            if !output.is_quiet() {
                output.print_document(&doc);
            }
        }
        None => output.message("No recording was saved."),
    }
    Ok(())
}
