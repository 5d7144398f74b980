//! Figure asset storage shared by all pages of a document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageFormat, RgbImage};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// How to treat an asset folder that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetPolicy {
    /// The folder must not exist yet
    #[default]
    Exclusive,
    /// Reuse an existing folder, overwriting assets with the same id
    Reuse,
}

/// Reference to a persisted figure asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Document-wide figure number
    pub id: usize,
    /// Location of the written file
    pub path: PathBuf,
}

impl AssetRef {
    /// File name of the asset (e.g. `"0.jpg"`).
    pub fn file_name(&self) -> String {
        asset_file_name(self.id)
    }
}

/// File name for the figure with the given id.
pub fn asset_file_name(id: usize) -> String {
    format!("{}.jpg", id)
}

/// Asset folder plus the document-wide figure counter.
///
/// The counter is only ever advanced with an atomic fetch-and-increment, so
/// ids stay unique even when several threads persist figures at once.
#[derive(Debug)]
pub struct AssetStore {
    dir: PathBuf,
    next_id: AtomicUsize,
}

impl AssetStore {
    /// Allocate the asset folder at `dir`.
    ///
    /// With [`AssetPolicy::Exclusive`] an existing folder is an error. Missing
    /// parent directories are created either way.
    pub fn create<P: AsRef<Path>>(dir: P, policy: AssetPolicy) -> Result<Self> {
        let dir = dir.as_ref();

        if let Some(parent) = dir.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match policy {
            AssetPolicy::Exclusive => fs::create_dir(dir).map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    Error::AssetFolderExists(dir.to_path_buf())
                } else {
                    Error::Io(e)
                }
            })?,
            AssetPolicy::Reuse => fs::create_dir_all(dir)?,
        }

        let dir = fs::canonicalize(dir)?;
        log::debug!("Allocated asset folder {}", dir.display());

        Ok(Self {
            dir,
            next_id: AtomicUsize::new(0),
        })
    }

    /// Absolute path of the asset folder.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve the next figure id.
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of ids handed out so far.
    pub fn figure_count(&self) -> usize {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Write a figure region as the next numbered asset.
    pub fn persist(&self, figure: &RgbImage) -> Result<AssetRef> {
        let id = self.next_id();
        let path = self.dir.join(asset_file_name(id));
        figure.save_with_format(&path, ImageFormat::Jpeg)?;
        log::debug!(
            "Saved figure {} ({}x{}) to {}",
            id,
            figure.width(),
            figure.height(),
            path.display()
        );
        Ok(AssetRef { id, path })
    }
}

impl Serialize for AssetStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AssetStore", 2)?;
        state.serialize_field("dir", &self.dir)?;
        state.serialize_field("figure_count", &self.figure_count())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_rejects_existing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("docassets");

        let store = AssetStore::create(&dir, AssetPolicy::Exclusive).unwrap();
        assert!(store.dir().is_absolute());

        let again = AssetStore::create(&dir, AssetPolicy::Exclusive);
        assert!(matches!(again, Err(Error::AssetFolderExists(_))));
    }

    #[test]
    fn test_reuse_accepts_existing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("docassets");
        fs::create_dir(&dir).unwrap();

        let store = AssetStore::create(&dir, AssetPolicy::Reuse).unwrap();
        assert_eq!(store.figure_count(), 0);
    }

    #[test]
    fn test_persist_numbers_sequentially() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::create(tmp.path().join("a"), AssetPolicy::Exclusive).unwrap();
        let figure = RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));

        let first = store.persist(&figure).unwrap();
        let second = store.persist(&figure).unwrap();

        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(second.file_name(), "1.jpg");
        assert!(first.path.exists());
        assert!(second.path.exists());
        assert_eq!(store.figure_count(), 2);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        use rayon::prelude::*;

        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::create(tmp.path().join("a"), AssetPolicy::Exclusive).unwrap();

        let mut ids: Vec<usize> = (0..64).into_par_iter().map(|_| store.next_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);
        assert_eq!(store.figure_count(), 64);
    }
}
