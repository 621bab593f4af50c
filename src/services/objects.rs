//! Object store - workspace objects (blocks, tabs, windows) by reference.
//!
//! Each object reference is backed by one source cell holding an
//! [`ObjectState`]. The backend pushes new versions with [`ObjectStore::put`];
//! views read them through [`ObjectStore::get`] or derive from
//! [`ObjectStore::atom`]. Metadata updates are sent to the backend and are
//! not applied locally: the authoritative value arrives through `put`.

use std::rc::Rc;

use async_trait::async_trait;

use crate::cells::{Cell, CellStore};
use crate::error::ObjectServiceError;
use crate::types::{Block, MetaMap, ORef, WaveObj};

#[async_trait(?Send)]
pub trait ObjectService {
    /// `UpdateObjectMeta(oref, meta)`.
    async fn update_object_meta(
        &self,
        oref: &ORef,
        meta: MetaMap,
    ) -> Result<(), ObjectServiceError>;
}

/// Value and loading flag for one object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectState<T> {
    pub value: Option<T>,
    pub loading: bool,
}

impl<T> ObjectState<T> {
    pub fn loading() -> Self {
        Self {
            value: None,
            loading: true,
        }
    }

    pub fn loaded(value: Option<T>) -> Self {
        Self {
            value,
            loading: false,
        }
    }
}

#[derive(Clone)]
pub struct ObjectStore {
    cells: CellStore,
    service: Rc<dyn ObjectService>,
}

impl ObjectStore {
    pub fn new(cells: CellStore, service: Rc<dyn ObjectService>) -> Self {
        Self { cells, service }
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    /// Source cell for an object. Unknown objects start out loading.
    pub fn atom<T: WaveObj>(&self, oid: &str) -> Cell<ObjectState<T>> {
        let oref = ORef::new(T::OTYPE, oid);
        self.cells.keyed(&format!("wos:{oref}"), |cells| {
            cells.source(ObjectState::<T>::loading())
        })
    }

    /// Derived cell holding just the object value.
    pub fn value_atom<T: WaveObj>(&self, oid: &str) -> Cell<Option<T>> {
        let oref = ORef::new(T::OTYPE, oid);
        let atom = self.atom::<T>(oid);
        self.cells.keyed(&format!("wos:{oref}:value"), move |cells| {
            cells.derive(move |g| g.get(&atom).value)
        })
    }

    /// `get(oref) -> (value, loading)`.
    pub fn get<T: WaveObj>(&self, oid: &str) -> (Option<T>, bool) {
        let state = self.cells.get(&self.atom::<T>(oid));
        (state.value, state.loading)
    }

    /// Store the authoritative value of an object.
    pub fn put<T: WaveObj>(&self, object: T) {
        let atom = self.atom::<T>(object.oid());
        self.cells.set(&atom, ObjectState::loaded(Some(object)));
    }

    /// Record that the backend has no object for this id.
    pub fn remove<T: WaveObj>(&self, oid: &str) {
        self.cells.set(&self.atom::<T>(oid), ObjectState::loaded(None));
    }

    /// Mark an object as being (re)loaded, dropping the current value.
    pub fn set_loading<T: WaveObj>(&self, oid: &str) {
        self.cells.set(&self.atom::<T>(oid), ObjectState::loading());
    }

    /// Apply a metadata update pushed by the backend to a block.
    pub fn merge_block_meta(&self, oid: &str, meta: &MetaMap) {
        let (block, _) = self.get::<Block>(oid);
        match block {
            Some(mut block) => {
                block
                    .meta
                    .extend(meta.iter().map(|(k, v)| (k.clone(), v.clone())));
                self.put(block);
            }
            None => log::debug!("meta update for unknown block {oid}"),
        }
    }

    pub fn service(&self) -> Rc<dyn ObjectService> {
        self.service.clone()
    }

    /// Send `UpdateObjectMeta` to the backend without waiting for it.
    pub fn update_object_meta(&self, oref: ORef, meta: MetaMap) {
        send_meta_update(&self.cells, self.service.clone(), oref, meta);
    }
}

/// Spawn an `UpdateObjectMeta` call. Failures are logged, never returned.
pub fn send_meta_update(
    cells: &CellStore,
    service: Rc<dyn ObjectService>,
    oref: ORef,
    meta: MetaMap,
) {
    cells.spawn(async move {
        if let Err(err) = service.update_object_meta(&oref, meta).await {
            log::warn!("update meta for {oref} failed: {err}");
        }
    });
}
