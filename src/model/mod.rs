// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Saved diagram records, their type vocabulary, and starter templates.

pub mod diagram;
pub mod ids;
pub mod templates;

pub use diagram::{now_millis, Diagram, DiagramType};
pub use ids::{DiagramId, IdError};
pub use templates::DiagramTemplate;
