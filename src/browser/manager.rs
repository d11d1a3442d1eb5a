use anyhow::{anyhow, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::models::Viewport;

/// Manages browser lifecycle and the single driven page.
pub struct BrowserManager {
    browser: Arc<Mutex<Option<Browser>>>,
    page: Arc<Mutex<Option<Page>>>,
    /// Lock to prevent concurrent browser launches (race condition fix)
    launch_lock: tokio::sync::Mutex<()>,
}

impl BrowserManager {
    pub fn new() -> Self {
        Self {
            browser: Arc::new(Mutex::new(None)),
            page: Arc::new(Mutex::new(None)),
            launch_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Launch browser and navigate to URL
    pub async fn launch(&self, url: &str, headless: bool, viewport: Option<Viewport>) -> Result<()> {
        // Acquire launch lock to prevent race condition (double Chrome instances)
        let _launch_guard = self.launch_lock.lock().await;

        // Close any existing browser first
        self.close().await.ok();

        let viewport = viewport.unwrap_or_default();

        let mut config = BrowserConfig::builder()
            .window_size(viewport.width as u32, viewport.height as u32);

        if !headless {
            config = config.with_head();
        }

        // Disable automation detection flags and default apps/extensions so
        // the driven window behaves like an ordinary session
        config = config
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-default-apps")
            .arg("--disable-extensions");

        let config = config
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        // Wrap browser launch with 30-second timeout to prevent indefinite hangs
        let (browser, mut handler) = timeout(Duration::from_secs(30), Browser::launch(config))
            .await
            .map_err(|_| {
                anyhow!("Browser launch timeout (30s) - Chrome may not be installed or is unresponsive")
            })?
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        // Spawn handler task to process browser events
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                tracing::trace!("Browser event: {:?}", event);
            }
        });

        // Minimal delay for Chrome to initialize
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Get default pages BEFORE creating the target page; closed after so
        // only one window stays visible
        let default_pages = browser
            .pages()
            .await
            .map_err(|e| anyhow!("Failed to get pages: {}", e))?;
        tracing::debug!("Found {} default page(s) to close later", default_pages.len());

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| anyhow!("Failed to create page: {}", e))?;

        for default_page in default_pages {
            if let Err(e) = default_page.close().await {
                tracing::warn!("Failed to close default page: {}", e);
            }
        }

        // Set viewport via emulation
        let emulation_params =
            chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
                .width(viewport.width as i64)
                .height(viewport.height as i64)
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|e| anyhow!("Failed to build viewport params: {}", e))?;

        page.execute(emulation_params)
            .await
            .map_err(|e| anyhow!("Failed to set viewport: {}", e))?;

        *self.browser.lock().await = Some(browser);
        *self.page.lock().await = Some(page);

        tracing::info!("Browser launched and navigated to {}", url);
        Ok(())
    }

    /// Get current page URL
    pub async fn current_url(&self) -> Result<String> {
        let page_guard = self.page.lock().await;
        let page = page_guard
            .as_ref()
            .ok_or_else(|| anyhow!("No page available"))?;

        page.url()
            .await
            .map_err(|e| anyhow!("Failed to get URL: {}", e))?
            .ok_or_else(|| anyhow!("URL is None"))
    }

    /// Navigate to a URL
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let page_guard = self.page.lock().await;
        let page = page_guard
            .as_ref()
            .ok_or_else(|| anyhow!("No page available"))?;

        page.goto(url)
            .await
            .map_err(|e| anyhow!("Failed to navigate to {}: {}", url, e))?;

        Ok(())
    }

    /// Execute JavaScript and return result
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let page_guard = self.page.lock().await;
        let page = page_guard
            .as_ref()
            .ok_or_else(|| anyhow!("No page available"))?;

        let result = page
            .evaluate(script)
            .await
            .map_err(|e| anyhow!("Failed to evaluate script: {}", e))?;

        result
            .into_value()
            .map_err(|e| anyhow!("Failed to parse script result: {}", e))
    }

    /// Register a script that runs on every new document, so page-side
    /// helpers survive navigations.
    pub async fn add_script_on_new_document(&self, script: &str) -> Result<()> {
        let page_guard = self.page.lock().await;
        let page = page_guard
            .as_ref()
            .ok_or_else(|| anyhow!("No page available"))?;

        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(script)
            .build()
            .map_err(|e| anyhow!("Failed to build new-document script params: {}", e))?;

        page.execute(params)
            .await
            .map_err(|e| anyhow!("Failed to register new-document script: {}", e))?;

        Ok(())
    }

    /// Close the browser
    pub async fn close(&self) -> Result<()> {
        let mut page_guard = self.page.lock().await;
        let mut browser_guard = self.browser.lock().await;

        // Close page first
        if let Some(page) = page_guard.take() {
            let _ = page.close().await;
        }

        // Then close browser
        if let Some(mut browser) = browser_guard.take() {
            let _ = browser.close().await;
        }

        tracing::info!("Browser closed");
        Ok(())
    }

    /// Get the underlying page for advanced operations
    pub async fn page(&self) -> Option<Page> {
        self.page.lock().await.clone()
    }
}

impl Default for BrowserManager {
    fn default() -> Self {
        Self::new()
    }
}
