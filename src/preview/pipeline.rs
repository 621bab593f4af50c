//! File resolution pipeline.
//!
//! ```text
//! path ──┬── stat ──── mime_type
//!        └── full_file ── decoded_text
//! ```
//!
//! Every cell is keyed per block and defined once. `stat` and `full_file`
//! depend only on `path`, so they fetch independently; neither waits for the
//! other. Nothing is fetched until a view reads the cell: streaming and
//! oversize previews never read `full_file`, so the read call never happens.
//!
//! Service errors become `None` here. Not-found is expected during
//! navigation and logged at debug, anything else at warn.

use std::rc::Rc;

use crate::block::BlockMeta;
use crate::cells::{Cell, Loadable, WritableCell};
use crate::error::FileServiceError;
use crate::services::FileService;
use crate::types::{FileInfo, FullFile};

/// Handles to one block's pipeline cells.
#[derive(Clone)]
pub struct PreviewCells {
    pub path: WritableCell<Option<String>>,
    pub stat: Cell<Loadable<Option<FileInfo>>>,
    pub full_file: Cell<Loadable<Option<FullFile>>>,
    pub mime_type: Cell<Loadable<Option<String>>>,
    pub decoded_text: Cell<Loadable<String>>,
}

fn log_failure(op: &str, path: &str, err: &FileServiceError) {
    if err.is_not_found() {
        log::debug!("{op} {path}: {err}");
    } else {
        log::warn!("{op} {path} failed: {err}");
    }
}

impl PreviewCells {
    /// Look up (or define) the pipeline for `meta`'s block.
    pub fn new(meta: &BlockMeta, files: Rc<dyn FileService>) -> Self {
        let cells = meta.cells();
        let path = meta.path();
        let path_cell = path.cell();

        let stat = {
            let files = files.clone();
            cells.keyed(&meta.key("preview:statfile"), move |cells| {
                cells.derive_async(move |g| {
                    let path = g.get(&path_cell);
                    let files = files.clone();
                    async move {
                        let Some(path) = path else {
                            return None;
                        };
                        match files.stat_file(&path).await {
                            Ok(info) => Some(info),
                            Err(err) => {
                                log_failure("stat", &path, &err);
                                None
                            }
                        }
                    }
                })
            })
        };

        let full_file = cells.keyed(&meta.key("preview:fullfile"), move |cells| {
            cells.derive_async(move |g| {
                let path = g.get(&path_cell);
                let files = files.clone();
                async move {
                    let Some(path) = path else {
                        return None;
                    };
                    match files.read_file(&path).await {
                        Ok(file) => Some(file),
                        Err(err) => {
                            log_failure("read", &path, &err);
                            None
                        }
                    }
                }
            })
        });

        let mime_type = cells.keyed(&meta.key("preview:mimetype"), move |cells| {
            cells.derive(move |g| {
                g.get(&stat)
                    .map(|info| info.map(|info| info.mime_type))
            })
        });

        let decoded_text = cells.keyed(&meta.key("preview:filecontent"), move |cells| {
            cells.derive(move |g| {
                g.get(&full_file)
                    .map(|file| file.map(|file| file.decode_text()).unwrap_or_default())
            })
        });

        Self {
            path,
            stat,
            full_file,
            mime_type,
            decoded_text,
        }
    }
}
