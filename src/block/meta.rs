//! Block metadata accessor.
//!
//! Maps a block id to its descriptor in the object store and exposes the
//! previewed path as a writable cell. The path cell is derived from the
//! stored block every time; writing it sends `UpdateObjectMeta` and waits for
//! the store to push the new descriptor back.

use crate::cells::{Cell, CellStore, WritableCell};
use crate::services::objects::send_meta_update;
use crate::services::{ObjectState, ObjectStore};
use crate::types::{Block, META_FILE, MetaMap, ORef};
use crate::view::Icon;

/// Handle to one block's descriptor and per-block cells.
#[derive(Clone)]
pub struct BlockMeta {
    block_id: String,
    objects: ObjectStore,
}

impl BlockMeta {
    pub fn new(objects: ObjectStore, block_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            objects,
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn cells(&self) -> &CellStore {
        self.objects.cells()
    }

    /// Cache key for a per-block cell: `block:<id>:<name>`.
    pub fn key(&self, name: &str) -> String {
        format!("block:{}:{name}", self.block_id)
    }

    pub fn atom(&self) -> Cell<ObjectState<Block>> {
        self.objects.atom::<Block>(&self.block_id)
    }

    /// The stored descriptor, or `None` if the store has none.
    pub fn read(&self) -> Option<Block> {
        self.objects.get::<Block>(&self.block_id).0
    }

    /// Previewed path (`meta.file`).
    pub fn path(&self) -> WritableCell<Option<String>> {
        let atom = self.atom();
        let oref = ORef::block(self.block_id.clone());
        let service = self.objects.service();
        self.cells().keyed(&self.key("preview:filename"), move |cells| {
            cells.derive_writable(
                move |g| {
                    g.get(&atom)
                        .value
                        .and_then(|block| block.file().map(str::to_string))
                },
                move |cells: &CellStore, path: Option<String>| match path {
                    Some(path) => {
                        let mut meta = MetaMap::new();
                        meta.insert(META_FILE.to_string(), path);
                        send_meta_update(cells, service.clone(), oref.clone(), meta);
                    }
                    None => log::debug!("ignoring empty path write for {oref}"),
                },
            )
        })
    }

    /// Current path, read through the path cell.
    pub fn file(&self) -> Option<String> {
        self.cells().get(&self.path().cell())
    }

    /// Navigate: fire-and-forget metadata update of `file`.
    pub fn set_path(&self, path: impl Into<String>) {
        self.cells().write(&self.path(), Some(path.into()));
    }

    /// Chrome cell holding the icon chosen by the content view.
    pub fn icon_override(&self) -> Cell<Option<Icon>> {
        self.cells()
            .keyed(&self.key("blockicon:override"), |cells| cells.source(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryObjectService;
    use crate::types::ViewTag;
    use futures::executor::LocalPool;
    use std::rc::Rc;

    fn setup() -> (LocalPool, BlockMeta, Rc<MemoryObjectService>) {
        let pool = LocalPool::new();
        let service = Rc::new(MemoryObjectService::default());
        let objects = ObjectStore::new(CellStore::new(pool.spawner()), service.clone());
        (pool, BlockMeta::new(objects, "b1"), service)
    }

    #[test]
    fn test_missing_block_reads_none() {
        let (_pool, meta, _) = setup();
        assert_eq!(meta.read(), None);
        assert_eq!(meta.file(), None);
    }

    #[test]
    fn test_path_follows_store() {
        let (_pool, meta, _) = setup();
        meta.objects()
            .put(Block::new("b1", ViewTag::Preview).with_meta("file", "/a"));
        assert_eq!(meta.file().as_deref(), Some("/a"));

        meta.objects()
            .put(Block::new("b1", ViewTag::Preview).with_meta("file", "/b"));
        assert_eq!(meta.file().as_deref(), Some("/b"));
    }

    #[test]
    fn test_set_path_sends_update_without_local_cache() {
        let (mut pool, meta, service) = setup();
        meta.objects()
            .put(Block::new("b1", ViewTag::Preview).with_meta("file", "/a"));

        meta.set_path("/a/b");
        pool.run_until_stalled();

        let calls = service.drain();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to_string(), "block:b1");
        assert_eq!(calls[0].1.get("file").map(String::as_str), Some("/a/b"));

        // The store still holds the old value until the backend pushes.
        assert_eq!(meta.file().as_deref(), Some("/a"));
        meta.objects().merge_block_meta("b1", &calls[0].1);
        assert_eq!(meta.file().as_deref(), Some("/a/b"));
    }

    #[test]
    fn test_icon_override_starts_empty() {
        let (_pool, meta, _) = setup();
        let icon = meta.icon_override();
        assert_eq!(meta.cells().get(&icon), None);
        meta.cells().set(&icon, Some(Icon::Folder));
        assert_eq!(meta.cells().get(&meta.icon_override()), Some(Icon::Folder));
    }
}
