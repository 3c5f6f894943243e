// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for saved diagrams.
//!
//! The store module keeps one JSON record per diagram under a single folder
//! and exposes the query surface the studio screens run against (recency
//! listing, favorites, substring search) plus a live-query subscription
//! contract.

pub mod diagram_folder;

pub use diagram_folder::{
    DiagramFolder, StoreError, StoreObserver, SubscriptionId, WriteDurability,
};

use crate::model::Diagram;

/// Persistence seam the editing session saves through.
pub trait DiagramStore {
    /// Upserts `diagram` keyed by its id.
    fn save_diagram(&mut self, diagram: &Diagram) -> Result<(), StoreError>;
}
