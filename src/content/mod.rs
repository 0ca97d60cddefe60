/*!
 * Source content for translation.
 *
 * - `loader`: resolves queued slugs on disk and renders them to HTML
 * - `renderer`: the injectable HTML renderer and the default MDX renderer
 * - `site`: maps slugs to pages on the live documentation site
 */

pub mod loader;
pub mod renderer;
pub mod site;

pub use loader::{ContentLoader, LocaleQueue};
pub use renderer::{HtmlRenderer, MdxRenderer};
pub use site::DocsSite;

/// A queued document rendered and ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// File URI sent to the vendor; the queued slug
    pub file: String,
    /// Rendered HTML
    pub html: String,
}

impl Page {
    pub fn new(file: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            html: html.into(),
        }
    }
}
