//! URL opening seam.

use crate::error::Result;

/// External collaborator that opens a URL in the user's browser.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}
