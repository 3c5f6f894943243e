// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad — editing-session core for a Mermaid diagram studio.
//!
//! The crate owns the authoritative text buffer, dirty flag, and bounded
//! undo/redo history of one editing session, and orchestrates a debounced
//! pipeline into an external render backend. Saved diagrams persist through
//! a keyed JSON-folder store with live-query subscriptions. The presentation
//! layer, the Mermaid grammar, and the text widget itself are external
//! collaborators.

pub mod model;
pub mod render;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
