//! Record and list-view URLs, and opening them in a browser

use std::process::{Command, ExitStatus};

/// Object whose standard list view holds every pending work item
pub const WORK_ITEM_OBJECT: &str = "ProcessInstanceWorkitem";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    instance_url: String,
}

impl Navigator {
    pub fn new(instance_url: &str) -> Self {
        Self {
            instance_url: instance_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn record_url(&self, record_id: &str) -> String {
        format!("{}/lightning/r/{}/view", self.instance_url, record_id)
    }

    pub fn list_view_url(&self, object_type: &str) -> String {
        format!("{}/lightning/o/{}/list", self.instance_url, object_type)
    }

    /// Resolve an item link. Relative hrefs are joined to the instance URL.
    pub fn resolve_href(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(path) = href.strip_prefix('/') {
            format!("{}/{}", self.instance_url, path)
        } else {
            self.record_url(href)
        }
    }
}

/// The browser command: `$BROWSER`, else the platform opener
pub fn browser_command() -> String {
    if let Ok(browser) = std::env::var("BROWSER") {
        if !browser.trim().is_empty() {
            return browser;
        }
    }
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else {
        "xdg-open".to_string()
    }
}

/// Launch `url` in the browser and wait for the launcher to exit
pub fn open_url(url: &str) -> std::io::Result<ExitStatus> {
    let browser = browser_command();
    tracing::info!(%browser, %url, "opening url");
    Command::new(&browser).arg(url).status()
}
