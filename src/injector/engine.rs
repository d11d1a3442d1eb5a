//! Injection state machine.
//!
//! One invocation: locate a target, write through the path matching the
//! target's kind (content-editable region vs value-bearing field), fall back
//! to the native insert-text command when the chosen path fails, and leave
//! clipboard fallback to the caller when every tier is exhausted. Each tier
//! catches its own failure; nothing here surfaces an unhandled rejection.

use anyhow::{anyhow, Result};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::catalog;
use super::scripts::{self, TargetInfo, WriteResult};

/// How an insertion succeeded. Transient; reported to the caller and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// Property write plus synthetic events was enough.
    Direct,
    /// The direct path failed; the native insert-text command succeeded.
    ExecCommand,
}

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("No suitable input field found")]
    NoTargetFound,
    #[error("All insertion strategies failed: {0}")]
    InsertionFailed(String),
    #[error(transparent)]
    Page(#[from] anyhow::Error),
}

/// Selector order for the page's current hostname.
async fn selector_order(page: &Page) -> Result<Vec<&'static str>> {
    let hostname: String = eval(page, scripts::HOSTNAME_SCRIPT.to_owned()).await?;
    let order = catalog::search_order(&hostname);
    tracing::debug!(
        "Searching for input field on '{}' with {} selectors",
        hostname,
        order.len()
    );
    Ok(order)
}

/// Locate the best injection target on the current page. Read-only: the
/// page is queried but never mutated.
pub async fn find_target(page: &Page) -> Result<Option<TargetInfo>> {
    let selectors = selector_order(page).await?;
    let found: Option<TargetInfo> =
        eval(page, scripts::find_target_script(&selectors)).await?;
    match &found {
        Some(info) => tracing::debug!(
            "Valid target found: <{}> via selector '{}'",
            info.tag,
            info.selector
        ),
        None => tracing::warn!("No suitable input field found"),
    }
    Ok(found)
}

/// Write `text` into the page's input field, replacing existing content.
pub async fn insert_text(page: &Page, text: &str) -> Result<InjectionOutcome, InjectError> {
    let selectors = selector_order(page).await?;
    let target: Option<TargetInfo> = eval(page, scripts::find_target_script(&selectors)).await?;
    let target = target.ok_or(InjectError::NoTargetFound)?;

    tracing::info!(
        "Injecting {} chars into <{}> ('{}')",
        text.chars().count(),
        target.tag,
        target.selector
    );

    let write_script = if target.editable {
        scripts::insert_editable_script(&selectors, text)
    } else {
        scripts::insert_value_script(&selectors, text)
    };

    let direct = run_write(page, write_script).await;
    if direct.ok {
        return Ok(InjectionOutcome::Direct);
    }
    let direct_error = direct.error.unwrap_or_else(|| "unknown error".to_owned());
    tracing::warn!(
        "Direct insertion failed ({}), trying insert-text command",
        direct_error
    );

    let command = run_write(page, scripts::exec_command_script(&selectors, text)).await;
    if command.ok {
        return Ok(InjectionOutcome::ExecCommand);
    }
    let command_error = command.error.unwrap_or_else(|| "unknown error".to_owned());

    Err(InjectError::InsertionFailed(format!(
        "direct path: {}; command path: {}",
        direct_error, command_error
    )))
}

/// Copy `text` to the system clipboard. This is the fallback of last resort,
/// so any failure (including a broken evaluation) reports `false` rather
/// than erroring further.
pub async fn copy_to_clipboard(page: &Page, text: &str) -> bool {
    let params = match EvaluateParams::builder()
        .expression(scripts::clipboard_script(text))
        .await_promise(true)
        .return_by_value(true)
        .build()
    {
        Ok(params) => params,
        Err(e) => {
            tracing::error!("Failed to build clipboard evaluation: {}", e);
            return false;
        }
    };

    match page.evaluate(params).await {
        Ok(result) => {
            let copied = result.into_value::<bool>().unwrap_or(false);
            if copied {
                tracing::info!("Text copied to clipboard");
            } else {
                tracing::error!("Clipboard copy reported failure");
            }
            copied
        }
        Err(e) => {
            tracing::error!("Clipboard copy failed: {}", e);
            false
        }
    }
}

/// A write-path evaluation that cannot be parsed or transported still counts
/// as that path failing, so the caller can move to the next tier.
async fn run_write(page: &Page, script: String) -> WriteResult {
    match eval::<WriteResult>(page, script).await {
        Ok(result) => result,
        Err(e) => WriteResult {
            ok: false,
            error: Some(e.to_string()),
        },
    }
}

async fn eval<T: DeserializeOwned>(page: &Page, script: String) -> Result<T> {
    let result = page
        .evaluate(script)
        .await
        .map_err(|e| anyhow!("Failed to evaluate script: {}", e))?;
    result
        .into_value()
        .map_err(|e| anyhow!("Failed to parse script result: {}", e))
}
