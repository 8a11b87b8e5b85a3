//! Session - driver-facing traits
//!
//! A [`BrowserSession`] is the single long-lived automation session shared by
//! one publishing run. Each stage that needs a page opens its own through
//! [`BrowserSession::open`]; the session keeps login state (cookies, local
//! storage) between pages.
//!
//! Locators are passed as strings in the driver's own syntax. The adapters in
//! this workspace use three forms: `testid=<id>`, `text=<visible text>` and
//! `role=<role>[name=<accessible name>]`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// A long-lived browser automation session
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a new page at `url` and wait for it to settle
    async fn open(&self, url: &str) -> Result<Box<dyn PageDriver>>;
}

/// Interaction with a single open page
#[async_trait::async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate this page to a new URL
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Click the element matching `locator`
    async fn click(&mut self, locator: &str) -> Result<()>;

    /// Replace the content of the input matching `locator` with `text`
    async fn fill(&mut self, locator: &str, text: &str) -> Result<()>;

    /// Press a keyboard key (e.g. `Enter`, `Control+V`) on the focused element
    async fn press(&mut self, key: &str) -> Result<()>;

    /// Click `trigger` and feed `file` to the file chooser it opens
    async fn upload(&mut self, trigger: &str, file: &Path) -> Result<()>;

    /// Wait until `locator` is visible, up to `timeout`
    ///
    /// Returns [`crate::Error::Timeout`] when the wait elapses; any other
    /// error means the driver itself failed.
    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()>;

    /// Text content of the element matching `locator`
    async fn text_of(&mut self, locator: &str) -> Result<String>;

    /// Current OS clipboard text as seen by the driver
    async fn clipboard_text(&mut self) -> Result<String>;

    /// Click `trigger` and collect the files it downloads into `dest_dir`
    ///
    /// Waits up to `timeout` for downloads to start; an empty vec means the
    /// trigger produced none, which is not an error.
    async fn capture_downloads(
        &mut self,
        trigger: &str,
        dest_dir: &Path,
        timeout: Duration,
    ) -> Result<Vec<PathBuf>>;
}
