// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Starter templates offered by the template picker. Loading one replaces
/// the buffer wholesale but stays undoable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramTemplate {
    Flowchart,
    Sequence,
    ClassDiagram,
    StateDiagram,
    Pie,
    Gantt,
    ErDiagram,
    Mindmap,
}

impl DiagramTemplate {
    pub const ALL: [Self; 8] = [
        Self::Flowchart,
        Self::Sequence,
        Self::ClassDiagram,
        Self::StateDiagram,
        Self::Pie,
        Self::Gantt,
        Self::ErDiagram,
        Self::Mindmap,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Flowchart => "Flowchart",
            Self::Sequence => "Sequence",
            Self::ClassDiagram => "Class",
            Self::StateDiagram => "State",
            Self::Pie => "Pie",
            Self::Gantt => "Gantt",
            Self::ErDiagram => "Entity Relationship",
            Self::Mindmap => "Mind Map",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Flowchart => {
                "graph TD\n    A[Start] --> B{Condition}\n    B -->|Yes| C[Run step]\n    B -->|No| D[Fallback step]\n    C --> E[End]\n    D --> E"
            }
            Self::Sequence => {
                "sequenceDiagram\n    participant A as User\n    participant B as Service\n    participant C as Database\n    A->>B: Send request\n    B->>C: Query data\n    C-->>B: Return rows\n    B-->>A: Respond"
            }
            Self::ClassDiagram => {
                "classDiagram\n    class Animal {\n        +String name\n        +int age\n        +makeSound()\n    }\n    class Dog {\n        +bark()\n    }\n    class Cat {\n        +meow()\n    }\n    Animal <|-- Dog\n    Animal <|-- Cat"
            }
            Self::StateDiagram => {
                "stateDiagram-v2\n    [*] --> Pending\n    Pending --> Processing: start\n    Processing --> Done: success\n    Processing --> Failed: failure\n    Failed --> Pending: retry\n    Done --> [*]"
            }
            Self::Pie => {
                "pie title Time allocation\n    \"Development\" : 45\n    \"Testing\" : 25\n    \"Documentation\" : 15\n    \"Meetings\" : 15"
            }
            Self::Gantt => {
                "gantt\n    title Project plan\n    dateFormat YYYY-MM-DD\n    section Design\n    Requirements    :a1, 2024-01-01, 7d\n    Architecture    :after a1, 5d\n    section Build\n    Frontend        :2024-01-15, 14d\n    Backend         :2024-01-15, 14d\n    section Test\n    Integration     :2024-02-01, 7d"
            }
            Self::ErDiagram => {
                "erDiagram\n    USER ||--o{ ORDER : places\n    ORDER ||--|{ LINE_ITEM : contains\n    PRODUCT ||--o{ LINE_ITEM : included_in\n\n    USER {\n        int id PK\n        string name\n        string email\n    }\n    ORDER {\n        int id PK\n        date created_at\n        int user_id FK\n    }"
            }
            Self::Mindmap => {
                "mindmap\n  root((Project))\n    Plan\n      Requirements\n      Resourcing\n      Schedule\n    Execute\n      Build\n      Test\n      Ship\n    Monitor\n      Progress\n      Risk\n      Quality"
            }
        }
    }
}
