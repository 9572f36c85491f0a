//! Headless replay of a recorded lobby transcript.
//!
//! A transcript is JSON lines, one [`Envelope`] per line. Blank lines and
//! lines starting with `#` are skipped.

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::lobby::{LobbyFrame, LobbySyncView, ViewEffect};
use crate::protocol::Envelope;

/// A line that could not be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why the line was skipped.
    pub reason: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Frame after the last event.
    pub frame: LobbyFrame,
    /// Requests the client would have sent, in order.
    pub emitted: Vec<String>,
    /// How many reloads were triggered.
    pub reloads: usize,
    /// How many times the in-place reload hook ran.
    pub hook_calls: usize,
    /// Lines that were not valid envelopes.
    pub skipped: Vec<SkippedLine>,
}

/// Feeds every envelope in `reader` through `view`.
///
/// Effects are performed the way the terminal host performs them, except
/// that requests are recorded instead of sent.
#[instrument(skip_all)]
pub fn replay_transcript<R: BufRead>(reader: R, mut view: LobbySyncView) -> std::io::Result<ReplayReport> {
    let mut emitted = Vec::new();
    let mut reloads = 0;
    let mut hook_calls = 0;
    let mut skipped = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let envelope: Envelope = match serde_json::from_str(trimmed) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(line = number, error = %e, "Skipping unreadable transcript line");
                skipped.push(SkippedLine {
                    line: number,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        debug!(line = number, event = %envelope.event, "Replaying envelope");
        let mut queue: std::collections::VecDeque<ViewEffect> =
            view.handle_envelope(&envelope).into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                ViewEffect::Emit(event) => emitted.push(event.name().to_string()),
                ViewEffect::ReloadPage => {
                    reloads += 1;
                    queue.extend(view.reload());
                }
                ViewEffect::InvokeReloaded => hook_calls += 1,
                ViewEffect::CloseChannel => {}
            }
        }
    }

    info!(
        emitted = emitted.len(),
        reloads,
        skipped = skipped.len(),
        "Replay finished"
    );
    Ok(ReplayReport {
        frame: view.frame(),
        emitted,
        reloads,
        hook_calls,
        skipped,
    })
}
