use super::naming::{binary_filename, document_filename, extension_for_content_type};
use crate::url::site_name;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// How an artifact was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Page rendered to a document by the renderer
    Document,
    /// Response body saved as-is
    Binary,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// A file written for one terminal resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub source_url: String,
}

/// Output directory layout: one folder per crawled site under `data_root`
///
/// Site folders are created lazily, right before the first write.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    data_root: PathBuf,
}

impl ArtifactStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// `{data_root}/{site_name(home_url)}`
    pub fn site_dir(&self, home_url: &str) -> PathBuf {
        self.data_root.join(site_name(home_url))
    }

    /// Creates the site folder if needed and returns the document path for `url`
    pub async fn prepare_document(&self, home_url: &str, url: &str) -> io::Result<PathBuf> {
        let folder = self.ensure_site_dir(home_url).await?;
        Ok(document_filename(url, &folder))
    }

    /// Saves a response body when its content type is a storable binary
    ///
    /// Returns `Ok(None)` without touching the filesystem for any other type.
    pub async fn save_binary(
        &self,
        home_url: &str,
        url: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> io::Result<Option<Artifact>> {
        let extension = match content_type.and_then(extension_for_content_type) {
            Some(extension) => extension,
            None => return Ok(None),
        };

        let folder = self.ensure_site_dir(home_url).await?;
        let path = binary_filename(url, &folder, extension);
        tokio::fs::write(&path, body).await?;

        tracing::info!("Saved {} ({} bytes)", path.display(), body.len());

        Ok(Some(Artifact {
            path,
            kind: ArtifactKind::Binary,
            source_url: url.to_string(),
        }))
    }

    async fn ensure_site_dir(&self, home_url: &str) -> io::Result<PathBuf> {
        let folder = self.site_dir(home_url);
        tokio::fs::create_dir_all(&folder).await?;
        Ok(folder)
    }
}
