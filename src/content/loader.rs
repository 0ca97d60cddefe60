/*!
 * Content loading for queued translations.
 *
 * Queued slugs are resolved against the source directory. Slugs whose file
 * is gone (renamed or deleted since it was queued) are skipped: they are not
 * failures and never reach the vendor. Everything else is read and rendered,
 * keeping the queue order within each locale.
 */

use futures::future::join_all;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::content::Page;
use crate::content::renderer::{HtmlRenderer, MdxRenderer};
use crate::errors::LoadError;
use crate::file_utils::FileManager;

/// Queued slugs grouped by internal locale code, in queue order
pub type LocaleQueue = BTreeMap<String, Vec<String>>;

/// Reads and renders queued documents
#[derive(Clone)]
pub struct ContentLoader {
    source_dir: PathBuf,
    renderer: Arc<dyn HtmlRenderer>,
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("source_dir", &self.source_dir)
            .finish_non_exhaustive()
    }
}

impl ContentLoader {
    /// Loader using the default MDX renderer
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self::with_renderer(source_dir, Arc::new(MdxRenderer))
    }

    pub fn with_renderer(source_dir: impl Into<PathBuf>, renderer: Arc<dyn HtmlRenderer>) -> Self {
        Self {
            source_dir: source_dir.into(),
            renderer,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Load every locale of the queue
    ///
    /// Each locale maps to its pages in queue order, or to the first error
    /// hit while reading or rendering one of its files. Locales are loaded
    /// concurrently, as are the files of a locale.
    pub async fn load(&self, queue: &LocaleQueue) -> BTreeMap<String, Result<Vec<Page>, LoadError>> {
        let loads = queue.iter().map(|(locale, slugs)| async move {
            (locale.clone(), self.load_locale(locale, slugs).await)
        });

        join_all(loads).await.into_iter().collect()
    }

    /// Load one locale's slugs, dropping the ones that no longer exist
    pub async fn load_locale(&self, locale: &str, slugs: &[String]) -> Result<Vec<Page>, LoadError> {
        let existing: Vec<&String> = slugs
            .iter()
            .filter(|slug| {
                let exists = FileManager::file_exists(self.source_dir.join(slug.as_str()));
                if !exists {
                    warn!("Skipping {} ({}): file no longer exists", slug, locale);
                }
                exists
            })
            .collect();

        let pages = join_all(existing.into_iter().map(|slug| self.load_page(slug))).await;
        let pages = pages.into_iter().collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} of {} queued pages for {}", pages.len(), slugs.len(), locale);
        Ok(pages)
    }

    async fn load_page(&self, slug: &str) -> Result<Page, LoadError> {
        let path = self.source_dir.join(slug);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                slug: slug.to_string(),
                source,
            })?;

        let html = self
            .renderer
            .render(slug, &source)
            .map_err(|e| LoadError::Render {
                slug: slug.to_string(),
                message: e.to_string(),
            })?;

        Ok(Page::new(slug, html))
    }
}
