//! Page-context bridge: installs the sidecar's helper namespace into the
//! driven page and renders user-facing notification banners.
//!
//! Installation is once-per-context: an explicit capability probe decides
//! whether the helpers are already present, so re-running `ensure_installed`
//! is idempotent and a navigation (which tears down the context) simply
//! leads to a reinstall. Registering the script for new documents keeps the
//! helpers alive across navigations.

use anyhow::{anyhow, Result};
use chromiumoxide::Page;

use crate::injector::scripts::js_string;

/// Severity of an on-page notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn background(self) -> &'static str {
        match self {
            Severity::Info => "#3b82f6",
            Severity::Success => "#10b981",
            Severity::Warning => "#f59e0b",
            Severity::Error => "#ef4444",
        }
    }

    /// Warnings linger longer than the other severities.
    pub fn duration_ms(self) -> u32 {
        match self {
            Severity::Warning => 6000,
            _ => 4000,
        }
    }
}

/// Probe for the installed helper namespace.
pub const CAPABILITY_PROBE: &str = "typeof window.__promptRelay === 'object'";

/// Helper namespace installed into the page. Guarded so running it twice in
/// one context is a no-op.
pub const INSTALL_SCRIPT: &str = r#"
(() => {
    if (window.__promptRelay) return true;
    window.__promptRelay = {
        notify(message, background, durationMs) {
            const banner = document.createElement('div');
            banner.style.cssText = [
                'position: fixed',
                'top: 20px',
                'right: 20px',
                'background: ' + background,
                'color: white',
                'padding: 12px 20px',
                'border-radius: 6px',
                "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif",
                'font-size: 14px',
                'box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15)',
                'z-index: 999999',
                'max-width: 300px',
                'word-wrap: break-word'
            ].join('; ');
            banner.textContent = message;
            document.body.appendChild(banner);
            setTimeout(() => {
                if (banner.parentNode) {
                    banner.parentNode.removeChild(banner);
                }
            }, durationMs);
            return true;
        }
    };
    return true;
})()
"#;

/// Whether the helper namespace is present in the current page context.
pub async fn installed(page: &Page) -> Result<bool> {
    let result = page
        .evaluate(CAPABILITY_PROBE)
        .await
        .map_err(|e| anyhow!("Capability probe failed: {}", e))?;
    Ok(result.into_value::<bool>().unwrap_or(false))
}

/// Install the helper namespace unless the capability probe says it is
/// already there.
pub async fn ensure_installed(page: &Page) -> Result<()> {
    if installed(page).await? {
        return Ok(());
    }
    page.evaluate(INSTALL_SCRIPT)
        .await
        .map_err(|e| anyhow!("Failed to install page helpers: {}", e))?;
    tracing::debug!("Page helpers installed");
    Ok(())
}

/// Show a transient banner in the page's top-right corner.
pub async fn notify(page: &Page, message: &str, severity: Severity) -> Result<()> {
    ensure_installed(page).await?;
    let script = format!(
        "window.__promptRelay.notify({}, '{}', {})",
        js_string(message),
        severity.background(),
        severity.duration_ms(),
    );
    page.evaluate(script)
        .await
        .map_err(|e| anyhow!("Failed to show notification: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_banners_linger_longest() {
        for severity in [Severity::Info, Severity::Success, Severity::Error] {
            assert!(Severity::Warning.duration_ms() > severity.duration_ms());
        }
    }

    #[test]
    fn test_severity_backgrounds_are_distinct() {
        let colors = [
            Severity::Info.background(),
            Severity::Success.background(),
            Severity::Warning.background(),
            Severity::Error.background(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_install_script_is_guarded() {
        assert!(INSTALL_SCRIPT.contains("if (window.__promptRelay) return true;"));
    }
}
