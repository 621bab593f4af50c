//! In-process service implementations.
//!
//! Used by tests and headless hosts. [`MemoryFileService`] serves a small in-memory
//! tree, counts calls, and can hold requests for a path until released so
//! callers can control the order in which responses arrive.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use futures::channel::oneshot;

use super::files::FileService;
use super::objects::ObjectService;
use crate::error::{FileServiceError, ObjectServiceError};
use crate::types::{FileInfo, FullFile, MetaMap, ORef};

// =============================================================================
// FILES
// =============================================================================

struct Entry {
    info: FileInfo,
    bytes: Vec<u8>,
}

#[derive(Default)]
pub struct MemoryFileService {
    entries: RefCell<BTreeMap<String, Entry>>,
    failures: RefCell<HashMap<String, FileServiceError>>,
    held: RefCell<HashSet<String>>,
    gates: RefCell<HashMap<String, Vec<oneshot::Sender<()>>>>,
    stat_calls: RefCell<Vec<String>>,
    read_calls: RefCell<Vec<String>>,
}

fn parent_of(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some(("", name)) if !name.is_empty() => Some("/"),
        Some((parent, _)) if !parent.is_empty() => Some(parent),
        _ => None,
    }
}

impl MemoryFileService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with contents. Size is taken from the contents.
    pub fn add_file(&self, path: &str, mime_type: &str, bytes: impl Into<Vec<u8>>) {
        let bytes = bytes.into();
        let info = FileInfo::new(path, mime_type, bytes.len() as u64);
        self.entries
            .borrow_mut()
            .insert(path.to_string(), Entry { info, bytes });
    }

    /// Add a file that reports `size` but carries no contents.
    pub fn add_sized(&self, path: &str, mime_type: &str, size: u64) {
        let info = FileInfo::new(path, mime_type, size);
        self.entries.borrow_mut().insert(
            path.to_string(),
            Entry {
                info,
                bytes: Vec::new(),
            },
        );
    }

    pub fn add_dir(&self, path: &str) {
        self.add_sized(path, "directory", 0);
    }

    /// Make every call for `path` fail with `error`.
    pub fn fail(&self, path: &str, error: FileServiceError) {
        self.failures.borrow_mut().insert(path.to_string(), error);
    }

    /// Hold calls for `path` until [`release`](Self::release).
    pub fn hold(&self, path: &str) {
        self.held.borrow_mut().insert(path.to_string());
    }

    /// Let held calls for `path` complete.
    pub fn release(&self, path: &str) {
        self.held.borrow_mut().remove(path);
        let gates = self.gates.borrow_mut().remove(path).unwrap_or_default();
        for gate in gates {
            let _ = gate.send(());
        }
    }

    pub fn stat_calls(&self) -> Vec<String> {
        self.stat_calls.borrow().clone()
    }

    pub fn read_calls(&self) -> Vec<String> {
        self.read_calls.borrow().clone()
    }

    async fn wait_if_held(&self, path: &str) {
        if !self.held.borrow().contains(path) {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push(tx);
        let _ = rx.await;
    }

    fn listing(&self, dir: &str) -> Result<Vec<u8>, FileServiceError> {
        let entries = self.entries.borrow();
        let children: Vec<&FileInfo> = entries
            .values()
            .filter(|entry| parent_of(&entry.info.path) == Some(dir))
            .map(|entry| &entry.info)
            .collect();
        serde_json::to_vec(&children).map_err(|err| FileServiceError::Rpc(err.to_string()))
    }

    fn lookup(&self, path: &str) -> Result<FileInfo, FileServiceError> {
        if let Some(err) = self.failures.borrow().get(path) {
            return Err(err.clone());
        }
        self.entries
            .borrow()
            .get(path)
            .map(|entry| entry.info.clone())
            .ok_or_else(|| FileServiceError::NotFound(path.to_string()))
    }
}

#[async_trait(?Send)]
impl FileService for MemoryFileService {
    async fn stat_file(&self, path: &str) -> Result<FileInfo, FileServiceError> {
        self.stat_calls.borrow_mut().push(path.to_string());
        self.wait_if_held(path).await;
        self.lookup(path)
    }

    async fn read_file(&self, path: &str) -> Result<FullFile, FileServiceError> {
        self.read_calls.borrow_mut().push(path.to_string());
        self.wait_if_held(path).await;
        let info = self.lookup(path)?;
        if info.is_dir {
            let listing = self.listing(path)?;
            return Ok(FullFile::from_bytes(Some(info), &listing));
        }
        let entries = self.entries.borrow();
        let bytes = entries
            .get(path)
            .map(|entry| entry.bytes.as_slice())
            .unwrap_or_default();
        Ok(FullFile::from_bytes(Some(info), bytes))
    }
}

// =============================================================================
// OBJECTS
// =============================================================================

/// Records every metadata update it receives.
#[derive(Default)]
pub struct MemoryObjectService {
    calls: RefCell<Vec<(ORef, MetaMap)>>,
}

impl MemoryObjectService {
    pub fn calls(&self) -> Vec<(ORef, MetaMap)> {
        self.calls.borrow().clone()
    }

    /// Remove and return the recorded updates.
    pub fn drain(&self) -> Vec<(ORef, MetaMap)> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

#[async_trait(?Send)]
impl ObjectService for MemoryObjectService {
    async fn update_object_meta(
        &self,
        oref: &ORef,
        meta: MetaMap,
    ) -> Result<(), ObjectServiceError> {
        self.calls.borrow_mut().push((oref.clone(), meta));
        Ok(())
    }
}
