// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced render pipeline.
//!
//! Buffer changes are coalesced into at most one backend dispatch per settled
//! value: a pending slot holds the latest value and its due instant, and a
//! monotonically increasing sequence number is compared at response time so a
//! late response to a superseded request is discarded instead of applied.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::session::EditorSession;

/// Default delay between the last buffer change and the render dispatch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A dispatched render request. `seq` identifies the request so that late
/// responses to superseded requests can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub seq: u64,
    pub source: String,
}

/// Failure reported by a render backend. Recoverable; it lands in session
/// state as `render_error` and never blocks further edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    message: String,
}

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.message)
    }
}

impl std::error::Error for RenderFailure {}

/// Asynchronous diagram renderer (e.g. a WebView-hosted Mermaid runtime).
/// Resolves to the rendered artifact markup, passed through opaquely.
pub trait RenderBackend {
    fn render(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<String, RenderFailure>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRender {
    source: String,
    due: Instant,
}

/// Debounce-and-supersede scheduler for the render pipeline.
///
/// Holds at most one pending value; a newer value restarts the window and
/// replaces the slot. Blank sources and an uninitialized render surface clear
/// the slot instead of scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderScheduler {
    debounce: Duration,
    surface_ready: bool,
    pending: Option<PendingRender>,
    next_seq: u64,
    current: Option<u64>,
}

impl RenderScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            surface_ready: false,
            pending: None,
            next_seq: 0,
            current: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn surface_ready(&self) -> bool {
        self.surface_ready
    }

    pub fn set_surface_ready(&mut self, ready: bool) {
        self.surface_ready = ready;
        if !ready {
            self.pending = None;
        }
    }

    /// Restarts the debounce window for `source`.
    pub fn schedule(&mut self, source: &str, now: Instant) {
        if !self.surface_ready || source.trim().is_empty() {
            self.pending = None;
            return;
        }
        self.pending = Some(PendingRender {
            source: source.to_owned(),
            due: now + self.debounce,
        });
    }

    /// Takes the pending slot once its window has elapsed and assigns the
    /// dispatch sequence. At most one dispatch per settled value.
    pub fn poll(&mut self, now: Instant) -> Option<RenderRequest> {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        let pending = self.pending.take()?;
        self.next_seq += 1;
        self.current = Some(self.next_seq);
        Some(RenderRequest {
            seq: self.next_seq,
            source: pending.source,
        })
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Due instant of the pending slot, if any; drivers sleep until this.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// True while `seq` is the most recently dispatched request. Responses
    /// failing this check must be discarded silently.
    pub fn is_current(&self, seq: u64) -> bool {
        self.current == Some(seq)
    }

    /// Session switches drop the pending slot and orphan any in-flight seq so
    /// its eventual result cannot land on the new session's state.
    pub fn invalidate(&mut self) {
        self.pending = None;
        self.current = None;
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

const IDLE_POLL: Duration = Duration::from_millis(50);

/// Drives a session's debounced pipeline against a backend.
///
/// One dispatch at a time on a single sequential stream. The backend call
/// runs without holding the session lock so user intents keep flowing; the
/// settled result is applied back through the sequence gate, which drops
/// stale responses. Runs until the task is dropped or aborted.
pub async fn drive_session<B>(session: Arc<Mutex<EditorSession>>, backend: B)
where
    B: RenderBackend + Send + Sync,
{
    loop {
        let request = {
            let mut session = session.lock().await;
            session.tick(Instant::now())
        };

        match request {
            Some(request) => {
                let result = backend.render(&request.source).await;
                let mut session = session.lock().await;
                match result {
                    Ok(artifact) => session.on_render_success(request.seq, artifact),
                    Err(failure) => {
                        session.on_render_error(request.seq, failure.message().to_owned());
                    }
                }
            }
            None => {
                let sleep_for = {
                    let session = session.lock().await;
                    session
                        .next_render_due()
                        .map(|due| due.saturating_duration_since(Instant::now()))
                        .map_or(IDLE_POLL, |remaining| remaining.min(IDLE_POLL))
                };
                tokio::time::sleep(sleep_for.max(Duration::from_millis(1))).await;
            }
        }
    }
}
