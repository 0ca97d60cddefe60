use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Scratch directory holding the HTML artifacts of one submission run.
///
/// Each page is written here before upload and read back as the multipart
/// file part. The directory is removed when the value is dropped.
pub struct UploadArtifacts {
    dir: TempDir,
}

impl UploadArtifacts {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("translation-upload-")
            .tempdir()
            .context("Failed to create upload artifact directory")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Stable artifact name for a (locale, slug) pair
    pub fn artifact_name(locale: &str, slug: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(locale.as_bytes());
        hasher.update(slug.as_bytes());
        let digest = hasher.finalize();
        let hex: String = digest.iter().take(16).map(|b| format!("{:02x}", b)).collect();
        format!("{}.html", hex)
    }

    /// Materialize a rendered page and return the artifact path
    pub async fn write(&self, locale: &str, slug: &str, html: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(Self::artifact_name(locale, slug));
        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("Failed to write upload artifact: {:?}", path))?;
        Ok(path)
    }
}
