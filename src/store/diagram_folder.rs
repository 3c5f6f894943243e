// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Diagram, DiagramId};

use super::DiagramStore;

/// Durability policy for record writes. `Durable` opts into slower,
/// best-effort durable persistence (fsync/sync where supported).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDurability {
    #[default]
    BestEffort,
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "io error at {}: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "invalid diagram record at {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Handle returned by [`DiagramFolder::subscribe`]; pass it back to
/// [`DiagramFolder::unsubscribe`] to stop receiving updates.
pub type SubscriptionId = u64;

/// Live-query observer. Invoked with the full recency-ordered result set on
/// subscription and again after every mutation.
pub type StoreObserver = Box<dyn FnMut(&[Diagram]) + Send>;

/// Keyed JSON-record store for saved diagrams: one `<id>.json` per record
/// under a single folder, written atomically (temp file then rename).
/// Mutations write through an in-memory index and re-notify subscribers.
pub struct DiagramFolder {
    dir: PathBuf,
    durability: WriteDurability,
    index: BTreeMap<DiagramId, Diagram>,
    observers: Vec<(SubscriptionId, StoreObserver)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for DiagramFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramFolder")
            .field("dir", &self.dir)
            .field("durability", &self.durability)
            .field("records", &self.index.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl DiagramFolder {
    /// Opens (creating if needed) a diagram folder with best-effort writes.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_durability(dir, WriteDurability::BestEffort)
    }

    pub fn open_with_durability(
        dir: impl Into<PathBuf>,
        durability: WriteDurability,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut index = BTreeMap::new();
        let entries = fs::read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let diagram: Diagram =
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?;
            index.insert(diagram.id().clone(), diagram);
        }

        Ok(Self {
            dir,
            durability,
            index,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get_by_id(&self, id: &DiagramId) -> Option<&Diagram> {
        self.index.get(id)
    }

    /// All records, most recently modified first. Ties break on id so the
    /// ordering is stable.
    pub fn list_all(&self) -> Vec<Diagram> {
        let mut all: Vec<Diagram> = self.index.values().cloned().collect();
        all.sort_by(|a, b| {
            b.modified_at()
                .cmp(&a.modified_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        all
    }

    /// Favorited records, same ordering as [`Self::list_all`].
    pub fn list_favorites(&self) -> Vec<Diagram> {
        let mut favorites = self.list_all();
        favorites.retain(Diagram::is_favorite);
        favorites
    }

    /// Case-insensitive code-point substring match over title and code, same
    /// ordering as [`Self::list_all`].
    pub fn search(&self, query: &str) -> Vec<Diagram> {
        let needle = query.to_lowercase();
        let mut hits = self.list_all();
        hits.retain(|diagram| {
            diagram.title().to_lowercase().contains(&needle)
                || diagram.code().to_lowercase().contains(&needle)
        });
        hits
    }

    /// Upserts `diagram` keyed by its id: both the create-on-first-save and
    /// the update-on-resave paths land here.
    pub fn save_diagram(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        let path = self.record_path(diagram.id());
        write_record(&path, diagram, self.durability)?;
        self.index.insert(diagram.id().clone(), diagram.clone());
        self.notify();
        Ok(())
    }

    /// Removes the record if present; unknown ids are a no-op.
    pub fn delete_by_id(&mut self, id: &DiagramId) -> Result<(), StoreError> {
        if self.index.remove(id).is_none() {
            return Ok(());
        }
        let path = self.record_path(id);
        if let Err(source) = fs::remove_file(&path) {
            if source.kind() != io::ErrorKind::NotFound {
                return Err(StoreError::Io { path, source });
            }
        }
        self.notify();
        Ok(())
    }

    /// Replaces the favorite flag on an existing record. Returns `false`
    /// when the id is unknown.
    pub fn set_favorite(&mut self, id: &DiagramId, is_favorite: bool) -> Result<bool, StoreError> {
        let Some(diagram) = self.index.get(id) else {
            return Ok(false);
        };
        let updated = diagram.with_favorite(is_favorite);
        self.save_diagram(&updated)?;
        Ok(true)
    }

    /// Registers a live-query observer. The observer fires immediately with
    /// the current result set and again after every mutation.
    pub fn subscribe(&mut self, mut observer: StoreObserver) -> SubscriptionId {
        let snapshot = self.list_all();
        observer(&snapshot);

        self.next_subscription += 1;
        let id = self.next_subscription;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(subscription, _)| *subscription != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.list_all();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }

    fn record_path(&self, id: &DiagramId) -> PathBuf {
        // Ids are validated path segments, so this cannot escape the folder.
        self.dir.join(format!("{}.json", id.as_str()))
    }
}

impl DiagramStore for DiagramFolder {
    fn save_diagram(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        DiagramFolder::save_diagram(self, diagram)
    }
}

fn write_record(
    path: &Path,
    diagram: &Diagram,
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(diagram).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".naiad.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    let write_result = file
        .write_all(&json)
        .and_then(|()| {
            if matches!(durability, WriteDurability::Durable) {
                file.sync_all()
            } else {
                Ok(())
            }
        })
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        });
    drop(file);
    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if matches!(durability, WriteDurability::Durable) {
        // Directory sync is best-effort; not all platforms support it.
        let _ = fs::File::open(parent).and_then(|dir| dir.sync_all());
    }

    Ok(())
}
