use anyhow::{Context, Result};
use url::Url;

use crate::app_config::Config;

/// The public documentation site the queued documents are published on
#[derive(Debug, Clone, PartialEq)]
pub struct DocsSite {
    base_url: Url,
    content_root: String,
    extension: String,
}

impl DocsSite {
    pub fn new(base_url: &str, content_root: &str, extension: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid docs site URL: {}", base_url))?;
        Ok(Self {
            base_url,
            content_root: content_root.to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.docs_site_url,
            &config.content_root,
            &config.content_extension,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Live URL of a queued slug
    ///
    /// `src/content/docs/apm/intro.mdx` becomes `<base>/docs/apm/intro`.
    pub fn public_url(&self, slug: &str) -> Result<Url> {
        let path = slug.strip_prefix(&self.content_root).unwrap_or(slug);
        let path = path.strip_suffix(&self.extension).unwrap_or(path);

        self.base_url
            .join(path)
            .with_context(|| format!("Cannot build public URL for {}", slug))
    }
}
