// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use rstest::rstest;
use tokio::time::Instant;

use super::{Clipboard, EditorSession, History, SessionNotice, HISTORY_CAP};
use crate::model::{Diagram, DiagramTemplate, DiagramType};
use crate::store::{DiagramStore, StoreError};

#[derive(Default)]
struct MemoryStore {
    saved: Vec<Diagram>,
    fail: bool,
}

impl DiagramStore for MemoryStore {
    fn save_diagram(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Io {
                path: PathBuf::from("memory"),
                source: io::Error::other("store offline"),
            });
        }
        self.saved.push(diagram.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeClipboard {
    text: RefCell<Option<String>>,
}

impl FakeClipboard {
    fn holding(text: &str) -> Self {
        Self {
            text: RefCell::new(Some(text.to_owned())),
        }
    }
}

impl Clipboard for FakeClipboard {
    fn read_text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    fn write_text(&self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_owned());
    }
}

// Comfortably past the 500 ms default window relative to any `Instant::now()`
// taken earlier in the same test.
fn after_debounce() -> Instant {
    Instant::now() + Duration::from_millis(600)
}

fn ready_session() -> EditorSession {
    let mut session = EditorSession::new();
    session.set_surface_ready(true);
    session
}

// --- history ---

#[test]
fn first_change_seeds_baseline_without_push() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD\n    A");
    assert_eq!(session.history().undo_len(), 0);
    assert!(session.state().is_dirty());
}

#[test]
fn distinct_changes_push_from_second_call_on() {
    let mut session = EditorSession::new();
    for n in 1..=10 {
        session.on_text_changed(format!("graph TD\n    A{n}"));
    }
    assert_eq!(session.history().undo_len(), 9);
}

#[test]
fn unchanged_value_is_not_pushed() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD");
    session.on_text_changed("graph TD");
    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn undo_then_redo_restores_pre_undo_buffer() {
    let mut session = EditorSession::new();
    session.on_text_changed("v1");
    session.on_text_changed("v2");
    session.undo();
    assert_eq!(session.state().buffer(), "v1");
    session.redo();
    assert_eq!(session.state().buffer(), "v2");
    assert!(session.state().is_dirty());
}

#[test]
fn undo_with_empty_stack_is_noop() {
    let mut session = EditorSession::new();
    session.on_text_changed("v1");
    session.undo();
    assert_eq!(session.state().buffer(), "v1");
    assert!(!session.can_redo());
}

#[test]
fn edit_after_undo_clears_redo() {
    let mut session = EditorSession::new();
    session.on_text_changed("v1");
    session.on_text_changed("v2");
    session.undo();
    assert!(session.can_redo());
    session.on_text_changed("v3");
    assert!(!session.can_redo());
    session.redo();
    assert_eq!(session.state().buffer(), "v3");
}

#[test]
fn history_caps_at_fifty_evicting_oldest() {
    let mut session = EditorSession::new();
    for n in 1..=60 {
        session.on_text_changed(format!("v{n}"));
    }
    assert_eq!(session.history().undo_len(), HISTORY_CAP);

    for _ in 0..HISTORY_CAP {
        session.undo();
    }
    // v1..=v9 were evicted; the deepest surviving snapshot is v10.
    assert_eq!(session.state().buffer(), "v10");
    assert!(!session.can_undo());
}

#[test]
fn redo_mirror_push_is_capacity_checked() {
    let mut history = History::new(2);
    history.record_edit("a".to_owned());
    history.record_edit("b".to_owned());
    assert_eq!(history.undo("c".to_owned()), Some("b".to_owned()));
    assert_eq!(history.undo("b".to_owned()), Some("a".to_owned()));
    // Three redos would overflow cap 2; the redo stack held c then b.
    assert_eq!(history.redo_len(), 2);
    assert_eq!(history.redo("a".to_owned()), Some("b".to_owned()));
    assert_eq!(history.redo("b".to_owned()), Some("c".to_owned()));
    assert_eq!(history.undo_len(), 2);
}

// --- templates, clear, context switches ---

#[test]
fn load_template_is_undoable() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD\n    X");
    session.load_template(DiagramTemplate::Sequence);
    assert_eq!(session.state().buffer(), DiagramTemplate::Sequence.code());
    assert!(session.state().is_dirty());
    session.undo();
    assert_eq!(session.state().buffer(), "graph TD\n    X");
}

#[test]
fn clear_empties_buffer_undoably() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD");
    session.clear();
    assert_eq!(session.state().buffer(), "");
    assert!(session.state().is_dirty());
    session.undo();
    assert_eq!(session.state().buffer(), "graph TD");
}

#[test]
fn load_diagram_resets_history_and_baseline() {
    let mut session = EditorSession::new();
    session.on_text_changed("v1");
    session.on_text_changed("v2");

    let diagram = Diagram::new("Flow", "graph TD\n    L", 1_000);
    let id = diagram.id().clone();
    session.load_diagram(diagram);

    assert_eq!(session.state().buffer(), "graph TD\n    L");
    assert!(!session.state().is_dirty());
    assert!(!session.can_undo());
    assert!(!session.can_redo());
    assert_eq!(session.loaded_diagram().map(Diagram::id), Some(&id));
}

#[test]
fn new_session_resets_to_default_snippet() {
    let mut session = ready_session();
    session.on_text_changed("v1");
    session.on_text_changed("v2");
    session.new_session();

    assert_eq!(session.state().buffer(), Diagram::DEFAULT_CODE);
    assert!(!session.state().is_dirty());
    assert!(!session.can_undo());
    assert!(!session.state().is_rendering());
    assert!(session.state().last_artifact().is_none());
}

// --- save ---

#[test]
fn save_new_session_assigns_fresh_identity_and_equal_timestamps() {
    let mut session = EditorSession::new();
    let mut store = MemoryStore::default();
    session.on_text_changed("sequenceDiagram\n    A->>B: hi");
    session.save(&mut store, Some("Handshake"));

    let saved = session.loaded_diagram().expect("bound after save");
    assert_eq!(saved.title(), "Handshake");
    assert_eq!(saved.diagram_type(), DiagramType::Sequence);
    assert_eq!(saved.created_at(), saved.modified_at());
    assert!(!session.state().is_dirty());
    assert_eq!(store.saved.len(), 1);
    assert_eq!(session.take_notices(), vec![SessionNotice::Saved]);
}

#[test]
fn save_without_title_uses_default() {
    let mut session = EditorSession::new();
    let mut store = MemoryStore::default();
    session.on_text_changed("graph TD");
    session.save(&mut store, None);
    assert_eq!(
        session.loaded_diagram().map(Diagram::title),
        Some(Diagram::DEFAULT_TITLE)
    );
}

#[test]
fn save_loaded_session_preserves_identity_and_advances_modified() {
    let mut session = EditorSession::new();
    let mut store = MemoryStore::default();

    let original = Diagram::new("Flow", "graph TD\n    A", 1_000);
    let id = original.id().clone();
    session.load_diagram(original);
    session.on_text_changed("graph TD\n    A --> B");
    session.save(&mut store, None);

    let saved = session.loaded_diagram().expect("still bound");
    assert_eq!(saved.id(), &id);
    assert_eq!(saved.created_at(), 1_000);
    assert!(saved.modified_at() > 1_000);
    assert_eq!(saved.title(), "Flow");
    assert_eq!(saved.code(), "graph TD\n    A --> B");
}

#[test]
fn save_failure_keeps_dirty_and_notifies() {
    let mut session = EditorSession::new();
    let mut store = MemoryStore {
        fail: true,
        ..MemoryStore::default()
    };
    session.on_text_changed("graph TD");
    session.save(&mut store, None);

    assert!(session.state().is_dirty());
    assert!(session.loaded_diagram().is_none());
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], SessionNotice::SaveFailed(_)));
}

// --- classification ---

#[rstest]
#[case("graph TD\nA-->B", DiagramType::Flowchart)]
#[case("sequenceDiagram\nA->>B: hi", DiagramType::Sequence)]
#[case("  classDiagram\n  class A", DiagramType::ClassDiagram)]
#[case("stateDiagram-v2\n[*] --> S", DiagramType::StateDiagram)]
#[case("erDiagram\nA ||--o{ B : has", DiagramType::ErDiagram)]
#[case("gantt\ntitle Plan", DiagramType::Gantt)]
#[case("pie title Share", DiagramType::Pie)]
#[case("mindmap\n  root((x))", DiagramType::Mindmap)]
#[case("GITGRAPH", DiagramType::GitGraph)]
#[case("C4Context\ntitle System", DiagramType::C4Context)]
#[case("something else entirely", DiagramType::Flowchart)]
#[case("", DiagramType::Flowchart)]
fn classifies_by_leading_keyword(#[case] code: &str, #[case] expected: DiagramType) {
    assert_eq!(DiagramType::classify(code), expected);
}

// --- debounced render pipeline ---

#[test]
fn rapid_edits_coalesce_into_one_dispatch_with_last_value() {
    let mut session = ready_session();
    let base = Instant::now();
    for n in 1..=5 {
        session.on_text_changed(format!("graph TD\n    E{n}"));
    }

    assert!(session.tick(base).is_none());
    let request = session.tick(after_debounce()).expect("one dispatch");
    assert_eq!(request.source, "graph TD\n    E5");
    assert!(session.state().is_rendering());
    assert!(session.tick(after_debounce()).is_none());
}

#[test]
fn blank_buffer_is_never_dispatched() {
    let mut session = ready_session();
    session.on_text_changed("   \n  ");
    assert!(session.tick(after_debounce()).is_none());
}

#[test]
fn renders_are_gated_on_surface_readiness() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD");
    assert!(session.tick(after_debounce()).is_none());

    session.set_surface_ready(true);
    let request = session.tick(after_debounce()).expect("dispatch");
    assert_eq!(request.source, "graph TD");
}

#[test]
fn success_settles_state_and_clears_error() {
    let mut session = ready_session();
    session.on_text_changed("graph TD");
    let request = session.tick(after_debounce()).expect("dispatch");

    session.on_render_success(request.seq, "<svg/>");
    assert!(!session.state().is_rendering());
    assert_eq!(session.state().last_artifact(), Some("<svg/>"));
    assert!(session.state().render_error().is_none());
}

#[test]
fn failure_keeps_prior_artifact() {
    let mut session = ready_session();
    session.on_text_changed("graph TD");
    let first = session.tick(after_debounce()).expect("dispatch");
    session.on_render_success(first.seq, "<svg/>");

    session.on_text_changed("graph TD\n    broken [");
    let second = session.tick(after_debounce()).expect("dispatch");
    session.on_render_error(second.seq, "parse error on line 2");

    assert_eq!(session.state().render_error(), Some("parse error on line 2"));
    assert_eq!(session.state().last_artifact(), Some("<svg/>"));
    assert!(!session.state().is_rendering());
}

#[test]
fn stale_response_is_discarded() {
    let mut session = ready_session();
    session.on_text_changed("graph TD\n    E1");
    let first = session.tick(after_debounce()).expect("dispatch E1");

    session.on_text_changed("graph TD\n    E2");
    let second = session.tick(after_debounce()).expect("dispatch E2");

    // E2 resolves first, then the older, slower E1 response arrives.
    session.on_render_success(second.seq, "<svg>E2</svg>");
    session.on_render_success(first.seq, "<svg>E1</svg>");
    assert_eq!(session.state().last_artifact(), Some("<svg>E2</svg>"));

    session.on_render_error(first.seq, "late failure");
    assert!(session.state().render_error().is_none());
    assert!(!session.state().is_rendering());
}

#[test]
fn switching_sessions_orphans_inflight_render() {
    let mut session = ready_session();
    session.on_text_changed("graph TD\n    E1");
    let inflight = session.tick(after_debounce()).expect("dispatch");
    assert!(session.state().is_rendering());

    session.load_diagram(Diagram::new("Other", "graph TD\n    L", 1_000));
    assert!(!session.state().is_rendering());

    session.on_render_success(inflight.seq, "<svg>old</svg>");
    assert!(session.state().last_artifact().is_none());

    // The new context's buffer is itself scheduled.
    let next = session.tick(after_debounce()).expect("dispatch");
    assert_eq!(next.source, "graph TD\n    L");
}

// --- clipboard ---

#[test]
fn paste_into_blank_buffer_takes_clipboard_text_verbatim() {
    let mut session = EditorSession::new();
    session.clear();
    session.take_notices();

    let clipboard = FakeClipboard::holding("graph TD\n    P");
    session.paste_from_clipboard(&clipboard);
    assert_eq!(session.state().buffer(), "graph TD\n    P");
    assert_eq!(session.take_notices(), vec![SessionNotice::Pasted]);
}

#[test]
fn paste_into_nonempty_buffer_appends_with_newline() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD");

    let clipboard = FakeClipboard::holding("A --> B");
    session.paste_from_clipboard(&clipboard);
    assert_eq!(session.state().buffer(), "graph TD\nA --> B");
}

#[test]
fn paste_with_empty_clipboard_is_a_noop_notice() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD");

    let clipboard = FakeClipboard::default();
    session.paste_from_clipboard(&clipboard);
    assert_eq!(session.state().buffer(), "graph TD");
    assert_eq!(session.take_notices(), vec![SessionNotice::ClipboardEmpty]);
}

#[test]
fn copy_writes_full_buffer() {
    let mut session = EditorSession::new();
    session.on_text_changed("graph TD\n    A --> B");

    let clipboard = FakeClipboard::default();
    session.copy_all_to_clipboard(&clipboard);
    assert_eq!(
        clipboard.read_text().as_deref(),
        Some("graph TD\n    A --> B")
    );
    assert_eq!(session.take_notices(), vec![SessionNotice::Copied]);
}

#[test]
fn notices_drain_once() {
    let mut session = EditorSession::new();
    let clipboard = FakeClipboard::default();
    session.copy_all_to_clipboard(&clipboard);
    assert_eq!(session.take_notices(), vec![SessionNotice::Copied]);
    assert!(session.take_notices().is_empty());
}
