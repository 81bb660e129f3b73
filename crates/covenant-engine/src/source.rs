//! Filing retrieval seam and the on-disk cache reader
//!
//! Downloading filings is someone else's job. The aggregator only needs a
//! [`FilingSource`] that hands back readable documents for an
//! (entity, filing type) pair. [`LocalCacheSource`] serves them from a cache
//! laid out as `<root>/<cik>_<form>/...`, e.g. `filings/320193_10-K/`.

use crate::error::RetrievalError;
use filing_types::FilingType;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Manifest of source URLs inside a cached pair directory, one per line
pub const URL_MANIFEST: &str = "urls.txt";

/// A readable filing and where it was fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingDocument {
    pub path: PathBuf,
    pub url: Option<String>,
}

/// Supplies the documents for one (entity, filing type) pair
pub trait FilingSource {
    fn documents(
        &self,
        entity_id: &str,
        filing_type: FilingType,
    ) -> Result<Vec<FilingDocument>, RetrievalError>;
}

impl<T: FilingSource + ?Sized> FilingSource for &T {
    fn documents(
        &self,
        entity_id: &str,
        filing_type: FilingType,
    ) -> Result<Vec<FilingDocument>, RetrievalError> {
        (**self).documents(entity_id, filing_type)
    }
}

/// Reads previously downloaded filings from a local directory tree
#[derive(Debug, Clone)]
pub struct LocalCacheSource {
    root: PathBuf,
}

impl LocalCacheSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache directory for one pair
    pub fn pair_dir(&self, entity_id: &str, filing_type: FilingType) -> PathBuf {
        self.root
            .join(format!("{}_{}", entity_id, filing_type.as_str()))
    }

    fn read_manifest(dir: &Path) -> Result<Vec<String>, RetrievalError> {
        let path = dir.join(URL_MANIFEST);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&path).map_err(|source| RetrievalError::Io { path, source })?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// URL whose last path segment is `file_name`
fn url_for(urls: &[String], file_name: &str) -> Option<String> {
    urls.iter()
        .find(|url| url.rsplit('/').next() == Some(file_name))
        .cloned()
}

impl FilingSource for LocalCacheSource {
    fn documents(
        &self,
        entity_id: &str,
        filing_type: FilingType,
    ) -> Result<Vec<FilingDocument>, RetrievalError> {
        let dir = self.pair_dir(entity_id, filing_type);
        if !dir.is_dir() {
            return Err(RetrievalError::NotCached {
                entity_id: entity_id.to_string(),
                filing_type,
                path: dir,
            });
        }
        debug!(path = %dir.display(), "Using cached filings");

        let urls = Self::read_manifest(&dir)?;
        let mut documents = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|source| RetrievalError::Walk {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if file_name == URL_MANIFEST || file_name.starts_with('.') {
                continue;
            }
            let url = url_for(&urls, &file_name);
            documents.push(FilingDocument {
                path: entry.into_path(),
                url,
            });
        }
        Ok(documents)
    }
}
