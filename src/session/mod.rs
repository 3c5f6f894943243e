// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session controller.
//!
//! One `EditorSession` per editing context. It owns the authoritative text
//! buffer, dirty flag, and bounded undo/redo history, and feeds committed
//! buffer values into the debounced render pipeline. All mutating calls run
//! on one sequential stream; the presentation layer serializes user intents
//! onto it, and render/store results are applied behind them.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::model::{now_millis, Diagram, DiagramTemplate};
use crate::render::{RenderRequest, RenderScheduler};
use crate::store::DiagramStore;

pub mod history;

pub use history::{History, HISTORY_CAP};

/// System clipboard seam. Platform clipboards are interior-mutable, so both
/// operations take `&self`.
pub trait Clipboard {
    /// `None` when the clipboard holds no text.
    fn read_text(&self) -> Option<String>;
    fn write_text(&self, text: &str);
}

/// One-shot notifications for the presentation layer; drained via
/// [`EditorSession::take_notices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    Saved,
    SaveFailed(String),
    Copied,
    Pasted,
    ClipboardEmpty,
}

/// Observable session state, owned by the controller and exposed read-only.
///
/// `render_error` and `last_artifact` always refer to the most recently
/// settled render request; stale responses never overwrite them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    buffer: String,
    is_dirty: bool,
    is_rendering: bool,
    render_error: Option<String>,
    last_artifact: Option<String>,
    surface_ready: bool,
}

impl SessionState {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_rendering(&self) -> bool {
        self.is_rendering
    }

    pub fn render_error(&self) -> Option<&str> {
        self.render_error.as_deref()
    }

    pub fn last_artifact(&self) -> Option<&str> {
        self.last_artifact.as_deref()
    }

    pub fn surface_ready(&self) -> bool {
        self.surface_ready
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            buffer: Diagram::DEFAULT_CODE.to_owned(),
            is_dirty: false,
            is_rendering: false,
            render_error: None,
            last_artifact: None,
            surface_ready: false,
        }
    }
}

/// The editing session controller.
pub struct EditorSession {
    state: SessionState,
    history: History,
    // Snapshot used to decide whether an edit is undo-worthy. Starts empty
    // even though the buffer starts at the default snippet, so the very
    // first keystroke transition does not pollute history.
    last_committed: String,
    loaded: Option<Diagram>,
    scheduler: RenderScheduler,
    notices: VecDeque<SessionNotice>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            history: History::default(),
            last_committed: String::new(),
            loaded: None,
            scheduler: RenderScheduler::default(),
            notices: VecDeque::new(),
        }
    }

    /// A session with a non-default debounce window (tests, slow surfaces).
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            scheduler: RenderScheduler::new(debounce),
            ..Self::new()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The saved record this session is bound to, or `None` for a new,
    /// never-saved session.
    pub fn loaded_diagram(&self) -> Option<&Diagram> {
        self.loaded.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drains the pending one-shot notices.
    pub fn take_notices(&mut self) -> Vec<SessionNotice> {
        self.notices.drain(..).collect()
    }

    /// Commits a new buffer value from the editor widget.
    ///
    /// The previous committed value is pushed onto the undo stack only when
    /// it is non-empty and actually differs, which skips both the initial
    /// empty-sentinel transition and programmatic echoes of the same value.
    pub fn on_text_changed(&mut self, new_text: impl Into<String>) {
        let new_text = new_text.into();
        if !self.last_committed.is_empty() && self.last_committed != new_text {
            let snapshot = std::mem::take(&mut self.last_committed);
            self.history.record_edit(snapshot);
        }
        self.last_committed = new_text.clone();
        self.state.buffer = new_text;
        self.state.is_dirty = true;
        self.schedule_render();
    }

    /// Restores the most recent undo snapshot; no-op when there is none.
    pub fn undo(&mut self) {
        let current = self.state.buffer.clone();
        if let Some(previous) = self.history.undo(current) {
            self.replace_buffer(previous);
        }
    }

    /// Re-applies the most recently undone snapshot; no-op when there is
    /// none.
    pub fn redo(&mut self) {
        let current = self.state.buffer.clone();
        if let Some(next) = self.history.redo(current) {
            self.replace_buffer(next);
        }
    }

    /// Swaps in a starter template. Unlike loading a saved diagram this is
    /// an edit within the current context, so it stays undoable.
    pub fn load_template(&mut self, template: DiagramTemplate) {
        self.history.record_edit(self.state.buffer.clone());
        self.replace_buffer(template.code().to_owned());
    }

    /// Empties the buffer, undoably.
    pub fn clear(&mut self) {
        self.history.record_edit(self.state.buffer.clone());
        self.replace_buffer(String::new());
    }

    /// Binds the session to a saved record: new editing context, history
    /// reset, clean baseline, any pending or in-flight render orphaned.
    pub fn load_diagram(&mut self, diagram: Diagram) {
        let code = diagram.code().to_owned();
        self.reset_context(code, Some(diagram));
    }

    /// Starts over with the default snippet and no bound record.
    pub fn new_session(&mut self) {
        self.reset_context(Diagram::DEFAULT_CODE.to_owned(), None);
    }

    /// Persists the session through the store: updates the bound record in
    /// place, or creates a fresh one with generated identity on first save.
    /// A store failure leaves the dirty flag (and everything else) alone so
    /// the user can retry.
    pub fn save<S>(&mut self, store: &mut S, title: Option<&str>)
    where
        S: DiagramStore + ?Sized,
    {
        let now = now_millis();
        let diagram = match &self.loaded {
            Some(current) => current.resaved(title, self.state.buffer.clone(), now),
            None => Diagram::new(
                title.unwrap_or(Diagram::DEFAULT_TITLE),
                self.state.buffer.clone(),
                now,
            ),
        };

        match store.save_diagram(&diagram) {
            Ok(()) => {
                self.loaded = Some(diagram);
                self.state.is_dirty = false;
                self.notices.push_back(SessionNotice::Saved);
            }
            Err(err) => {
                self.notices.push_back(SessionNotice::SaveFailed(err.to_string()));
            }
        }
    }

    /// Appends clipboard text to the buffer, joined by a newline when the
    /// buffer is non-blank. An empty clipboard is a no-op notice.
    pub fn paste_from_clipboard(&mut self, clipboard: &dyn Clipboard) {
        let Some(text) = clipboard.read_text() else {
            self.notices.push_back(SessionNotice::ClipboardEmpty);
            return;
        };
        let joined = if self.state.buffer.trim().is_empty() {
            text
        } else {
            format!("{}\n{}", self.state.buffer, text)
        };
        self.on_text_changed(joined);
        self.notices.push_back(SessionNotice::Pasted);
    }

    /// Writes the full current buffer to the clipboard.
    pub fn copy_all_to_clipboard(&mut self, clipboard: &dyn Clipboard) {
        clipboard.write_text(&self.state.buffer);
        self.notices.push_back(SessionNotice::Copied);
    }

    /// Marks the presentation layer's render surface (un)initialized.
    /// Renders are gated on readiness; becoming ready schedules the current
    /// buffer.
    pub fn set_surface_ready(&mut self, ready: bool) {
        self.state.surface_ready = ready;
        self.scheduler.set_surface_ready(ready);
        if ready {
            self.schedule_render();
        }
    }

    /// Dispatch point for the debounce window. Returns the request to hand
    /// to the render backend once the window has elapsed, `None` otherwise.
    pub fn tick(&mut self, now: Instant) -> Option<RenderRequest> {
        let request = self.scheduler.poll(now)?;
        self.state.is_rendering = true;
        Some(request)
    }

    /// Due instant of the pending debounce window, if any.
    pub fn next_render_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Applies a successful render result, unless `seq` has been superseded.
    pub fn on_render_success(&mut self, seq: u64, artifact: impl Into<String>) {
        if !self.scheduler.is_current(seq) {
            return;
        }
        self.state.is_rendering = false;
        self.state.render_error = None;
        self.state.last_artifact = Some(artifact.into());
    }

    /// Applies a render failure, unless `seq` has been superseded. The prior
    /// artifact is kept; a stale preview beats a blanked one.
    pub fn on_render_error(&mut self, seq: u64, message: impl Into<String>) {
        if !self.scheduler.is_current(seq) {
            return;
        }
        self.state.is_rendering = false;
        self.state.render_error = Some(message.into());
    }

    fn replace_buffer(&mut self, text: String) {
        self.last_committed = text.clone();
        self.state.buffer = text;
        self.state.is_dirty = true;
        self.schedule_render();
    }

    fn reset_context(&mut self, baseline: String, loaded: Option<Diagram>) {
        self.history.clear();
        self.scheduler.invalidate();
        self.last_committed = baseline.clone();
        self.state.buffer = baseline;
        self.state.is_dirty = false;
        self.state.is_rendering = false;
        self.state.render_error = None;
        self.state.last_artifact = None;
        self.loaded = loaded;
        self.schedule_render();
    }

    fn schedule_render(&mut self) {
        self.scheduler.schedule(&self.state.buffer, Instant::now());
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
