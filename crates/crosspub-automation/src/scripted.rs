//! Scripted - in-process stub session for tests
//!
//! A [`ScriptedSession`] records every action and answers reads from queued
//! canned values, so collaborator and adapter flows can be exercised without
//! a browser. Stubs shipped in-tree keep the dependent crates' tests honest
//! about the exact driver calls a flow makes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::session::{BrowserSession, PageDriver};

#[derive(Default)]
struct ScriptState {
    log: Vec<String>,
    clipboard: VecDeque<String>,
    texts: HashMap<String, String>,
    hidden: HashSet<String>,
    downloads: VecDeque<Vec<PathBuf>>,
    failing: HashSet<String>,
}

/// A stub [`BrowserSession`] with scripted answers
#[derive(Clone, Default)]
pub struct ScriptedSession {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSession {
    /// Create an empty scripted session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a clipboard value; each [`PageDriver::clipboard_text`] pops one
    pub fn push_clipboard(&self, text: impl Into<String>) {
        self.state.lock().unwrap().clipboard.push_back(text.into());
    }

    /// Set the text content returned for `locator`
    pub fn set_text(&self, locator: impl Into<String>, text: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .texts
            .insert(locator.into(), text.into());
    }

    /// Make waits on `locator` time out
    pub fn hide(&self, locator: impl Into<String>) {
        self.state.lock().unwrap().hidden.insert(locator.into());
    }

    /// Make clicks on `locator` fail with a driver error
    pub fn fail_clicks_on(&self, locator: impl Into<String>) {
        self.state.lock().unwrap().failing.insert(locator.into());
    }

    /// Queue the file list returned by the next download capture
    pub fn push_downloads(&self, files: Vec<PathBuf>) {
        self.state.lock().unwrap().downloads.push_back(files);
    }

    /// Every action recorded so far, in order
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// Whether any recorded action contains `needle`
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .any(|entry| entry.contains(needle))
    }
}

#[async_trait::async_trait]
impl BrowserSession for ScriptedSession {
    async fn open(&self, url: &str) -> Result<Box<dyn PageDriver>> {
        self.state.lock().unwrap().log.push(format!("open {url}"));
        Ok(Box::new(ScriptedPage {
            state: self.state.clone(),
        }))
    }
}

/// Page half of [`ScriptedSession`]
pub struct ScriptedPage {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedPage {
    fn record(&self, entry: String) {
        self.state.lock().unwrap().log.push(entry);
    }
}

#[async_trait::async_trait]
impl PageDriver for ScriptedPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        Ok(())
    }

    async fn click(&mut self, locator: &str) -> Result<()> {
        if self.state.lock().unwrap().failing.contains(locator) {
            return Err(Error::Driver(format!("scripted failure on {locator}")));
        }
        self.record(format!("click {locator}"));
        Ok(())
    }

    async fn fill(&mut self, locator: &str, text: &str) -> Result<()> {
        self.record(format!("fill {locator} = {text}"));
        Ok(())
    }

    async fn press(&mut self, key: &str) -> Result<()> {
        self.record(format!("press {key}"));
        Ok(())
    }

    async fn upload(&mut self, trigger: &str, file: &Path) -> Result<()> {
        self.record(format!("upload {trigger} <- {}", file.display()));
        Ok(())
    }

    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()> {
        if self.state.lock().unwrap().hidden.contains(locator) {
            return Err(Error::Timeout {
                what: locator.to_string(),
                waited_ms: timeout.as_millis() as u64,
            });
        }
        self.record(format!("wait {locator}"));
        Ok(())
    }

    async fn text_of(&mut self, locator: &str) -> Result<String> {
        self.record(format!("text {locator}"));
        let state = self.state.lock().unwrap();
        state
            .texts
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::ElementMissing(locator.to_string()))
    }

    async fn clipboard_text(&mut self) -> Result<String> {
        self.record("clipboard".to_string());
        Ok(self
            .state
            .lock()
            .unwrap()
            .clipboard
            .pop_front()
            .unwrap_or_default())
    }

    async fn capture_downloads(
        &mut self,
        trigger: &str,
        dest_dir: &Path,
        _timeout: Duration,
    ) -> Result<Vec<PathBuf>> {
        self.record(format!("downloads {trigger} -> {}", dest_dir.display()));
        Ok(self
            .state
            .lock()
            .unwrap()
            .downloads
            .pop_front()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_actions_are_logged_in_order() {
        let session = ScriptedSession::new();
        let mut page = session.open("https://example.com").await.unwrap();
        page.fill("testid=title", "hello").await.unwrap();
        page.click("text=发布").await.unwrap();

        let log = session.log();
        assert_eq!(log[0], "open https://example.com");
        assert_eq!(log[1], "fill testid=title = hello");
        assert_eq!(log[2], "click text=发布");
    }

    #[tokio::test]
    async fn test_clipboard_values_pop_in_order() {
        let session = ScriptedSession::new();
        session.push_clipboard("first");
        session.push_clipboard("second");

        let mut page = session.open("about:blank").await.unwrap();
        assert_eq!(page.clipboard_text().await.unwrap(), "first");
        assert_eq!(page.clipboard_text().await.unwrap(), "second");
        assert_eq!(page.clipboard_text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_hidden_locator_times_out() {
        let session = ScriptedSession::new();
        session.hide("testid=copy");

        let mut page = session.open("about:blank").await.unwrap();
        let err = page
            .wait_visible("testid=copy", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_scripted_click_failure() {
        let session = ScriptedSession::new();
        session.fail_clicks_on("text=保存");

        let mut page = session.open("about:blank").await.unwrap();
        assert!(page.click("text=保存").await.is_err());
        assert!(page.click("text=其他").await.is_ok());
    }
}
