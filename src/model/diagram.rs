// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::ids::DiagramId;

/// Milliseconds since the Unix epoch; the timestamp unit for saved records.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Supported Mermaid diagram kinds, classified from the source's leading
/// keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    ClassDiagram,
    StateDiagram,
    ErDiagram,
    Gantt,
    Pie,
    Mindmap,
    Timeline,
    Journey,
    GitGraph,
    C4Context,
}

impl DiagramType {
    /// Ordered (prefix, type) vocabulary; classification takes the first
    /// match against the trimmed, lowercased source.
    const PREFIXES: [(&'static str, Self); 12] = [
        ("graph", Self::Flowchart),
        ("sequencediagram", Self::Sequence),
        ("classdiagram", Self::ClassDiagram),
        ("statediagram-v2", Self::StateDiagram),
        ("erdiagram", Self::ErDiagram),
        ("gantt", Self::Gantt),
        ("pie", Self::Pie),
        ("mindmap", Self::Mindmap),
        ("timeline", Self::Timeline),
        ("journey", Self::Journey),
        ("gitgraph", Self::GitGraph),
        ("c4context", Self::C4Context),
    ];

    /// Classifies `code` by its leading keyword. Total and deterministic;
    /// unrecognized input falls back to [`DiagramType::Flowchart`].
    pub fn classify(code: &str) -> Self {
        let normalized = code.trim().to_lowercase();
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map(|(_, diagram_type)| *diagram_type)
            .unwrap_or(Self::Flowchart)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Flowchart => "Flowchart",
            Self::Sequence => "Sequence",
            Self::ClassDiagram => "Class",
            Self::StateDiagram => "State",
            Self::ErDiagram => "Entity Relationship",
            Self::Gantt => "Gantt",
            Self::Pie => "Pie",
            Self::Mindmap => "Mind Map",
            Self::Timeline => "Timeline",
            Self::Journey => "User Journey",
            Self::GitGraph => "Git Graph",
            Self::C4Context => "C4 Context",
        }
    }
}

impl Default for DiagramType {
    fn default() -> Self {
        Self::Flowchart
    }
}

/// A saved diagram record. Identity and `created_at` are fixed at creation;
/// every subsequent save refreshes `modified_at` and reclassifies the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    id: DiagramId,
    title: String,
    code: String,
    diagram_type: DiagramType,
    created_at: u64,
    modified_at: u64,
    is_favorite: bool,
}

impl Diagram {
    pub const DEFAULT_TITLE: &'static str = "Untitled";

    /// Canonical starter snippet for a fresh editing session.
    pub const DEFAULT_CODE: &'static str = "graph TD\n    A[Start] --> B{Decision}\n    B -->|Yes| C[Do the thing]\n    B -->|No| D[Do the other thing]\n    C --> E[End]\n    D --> E";

    /// A brand-new record with a fresh identity and both timestamps set to
    /// `now`.
    pub fn new(title: impl Into<String>, code: impl Into<String>, now: u64) -> Self {
        let code = code.into();
        Self {
            id: DiagramId::generate(),
            title: title.into(),
            diagram_type: DiagramType::classify(&code),
            code,
            created_at: now,
            modified_at: now,
            is_favorite: false,
        }
    }

    pub fn id(&self) -> &DiagramId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn modified_at(&self) -> u64 {
        self.modified_at
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// The record as it should be persisted on a subsequent save: identity
    /// and `created_at` preserved, type reclassified from the new code,
    /// `modified_at` refreshed.
    pub fn resaved(&self, title: Option<&str>, code: impl Into<String>, now: u64) -> Self {
        let code = code.into();
        Self {
            id: self.id.clone(),
            title: title.map(str::to_owned).unwrap_or_else(|| self.title.clone()),
            diagram_type: DiagramType::classify(&code),
            code,
            created_at: self.created_at,
            modified_at: now,
            is_favorite: self.is_favorite,
        }
    }

    /// The record with its favorite flag replaced. Does not count as an
    /// edit, so `modified_at` is left alone.
    pub fn with_favorite(&self, is_favorite: bool) -> Self {
        Self {
            is_favorite,
            ..self.clone()
        }
    }
}
