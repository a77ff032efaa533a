//! Corpus listing and image loading.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader};

use crate::error::ImageLoadError;

/// Enumerates the images of a named corpus.
pub trait CorpusSource {
    /// Filenames of the corpus in listing order, or `None` if the corpus does
    /// not exist.
    fn list(&self, corpus: &str) -> Option<Vec<String>>;
}

/// Opens and decodes a corpus image by its path relative to the asset root,
/// e.g. `"val2017_500/000000397133.jpg"`.
pub trait ImageLoader {
    fn open(&self, path: &str) -> Result<DynamicImage, ImageLoadError>;
}

/// A directory holding one sub-directory per corpus.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CorpusSource for AssetDir {
    /// Everything directly inside `root/corpus` except sub-directories,
    /// sorted by name.
    ///
    /// Symlinks are followed. Broken links and names that are not valid
    /// UTF-8 (converted lossily) stay in the listing so that the scan
    /// records them as failures.
    fn list(&self, corpus: &str) -> Option<Vec<String>> {
        let dir = self.root.join(corpus);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "corpus not readable");
                return None;
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "unreadable corpus entry");
                    continue;
                }
            };
            if entry.path().is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Some(names)
    }
}

impl ImageLoader for AssetDir {
    fn open(&self, path: &str) -> Result<DynamicImage, ImageLoadError> {
        let full = self.root.join(path);
        ImageReader::open(&full)
            .map_err(ImageError::IoError)
            .and_then(|reader| reader.with_guessed_format().map_err(ImageError::IoError))
            .and_then(|reader| reader.decode())
            .map_err(|source| ImageLoadError {
                path: path.to_string(),
                source,
            })
    }
}
