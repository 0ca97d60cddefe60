/*!
 * Common test utilities for the doc-translation-queue test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use doc_translation_queue::app_config::{Config, VendorConfig};
use doc_translation_queue::database::{Repository, TranslationRecord};


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a source document at `slug` under `root`, with parent directories
pub fn create_source_file(root: &Path, slug: &str, content: &str) -> Result<PathBuf> {
    let file_path = root.join(slug);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small MDX document with front matter
pub fn sample_mdx(title: &str) -> String {
    format!(
        "---\ntitle: '{}'\n---\n\n## Overview\n\nThis page explains {}.\n",
        title, title
    )
}

/// Configuration pointing both the vendor API and the docs site at `base_url`
pub fn test_config(base_url: &str, source_dir: &Path) -> Config {
    let mut config = Config::default();
    config.vendor = VendorConfig {
        api_url: base_url.to_string(),
        user_identifier: "test-user".to_string(),
        user_secret: "test-secret".to_string(),
        project_id: "proj-1".to_string(),
    };
    config.docs_site_url = base_url.to_string();
    config.source_dir = source_dir.to_path_buf();
    config.retry.backoff_base_ms = 1;
    config.request_timeout_secs = 5;
    config
}

/// In-memory repository with the given (locale, slug) requests queued
pub async fn seeded_repository(entries: &[(&str, &str)]) -> Result<(Repository, Vec<TranslationRecord>)> {
    let repository = Repository::new_in_memory()?;
    let mut records = Vec::with_capacity(entries.len());
    for (locale, slug) in entries {
        records.push(repository.add_translation(locale, slug).await?);
    }
    Ok((repository, records))
}
