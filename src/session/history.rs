// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

/// Default capacity of each history stack.
pub const HISTORY_CAP: usize = 50;

/// Bounded linear undo/redo history of buffer snapshots.
///
/// Both stacks evict their oldest entry once at capacity. A fresh edit always
/// clears the redo stack; redo entries only ever come from `undo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    undo: VecDeque<String>,
    redo: VecDeque<String>,
    cap: usize,
}

impl History {
    pub fn new(cap: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Records the pre-edit snapshot, discarding any divergent redo history.
    pub fn record_edit(&mut self, snapshot: String) {
        Self::push_bounded(&mut self.undo, snapshot, self.cap);
        self.redo.clear();
    }

    /// Pops the most recent undo snapshot, stashing `current` for redo.
    /// Returns `None` (without touching the redo stack) when empty.
    pub fn undo(&mut self, current: String) -> Option<String> {
        let previous = self.undo.pop_back()?;
        Self::push_bounded(&mut self.redo, current, self.cap);
        Some(previous)
    }

    /// Pops the most recent redo snapshot, stashing `current` for undo. The
    /// mirrored push is still capacity-checked.
    pub fn redo(&mut self, current: String) -> Option<String> {
        let next = self.redo.pop_back()?;
        Self::push_bounded(&mut self.undo, current, self.cap);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_bounded(stack: &mut VecDeque<String>, snapshot: String, cap: usize) {
        if cap == 0 {
            return;
        }
        if stack.len() == cap {
            stack.pop_front();
        }
        stack.push_back(snapshot);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAP)
    }
}
