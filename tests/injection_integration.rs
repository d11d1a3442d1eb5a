//! Integration tests for the injection subsystem.
//!
//! These tests launch real Chrome instances in headless mode and drive the
//! locator, the insertion tiers, and the clipboard fallback against local
//! fixture pages.
//!
//! Run with: cargo test --test injection_integration -- --test-threads=1

use std::time::Duration;
use tokio::time::sleep;

use chromiumoxide::Page;
use promptrelay_sidecar::browser::{bridge, BrowserManager, Severity};
use promptrelay_sidecar::injector::{self, InjectError, InjectionOutcome};
use promptrelay_sidecar::models::Viewport;

/// Get file:// URL for a fixture page
fn fixture_url(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    format!("file://{}/tests/fixtures/{}", manifest_dir, name)
}

/// Launch headless Chrome on a fixture and hand back the driven page.
async fn open_fixture(manager: &BrowserManager, name: &str) -> Page {
    manager
        .launch(&fixture_url(name), true, Some(Viewport::default()))
        .await
        .unwrap();
    // Wait for page load
    sleep(Duration::from_millis(800)).await;
    manager.page().await.expect("page should be available")
}

async fn eval(manager: &BrowserManager, script: &str) -> serde_json::Value {
    manager.evaluate(script).await.unwrap()
}

// ============================================================================
// Locator
// ============================================================================

#[tokio::test]
async fn test_locator_picks_prompt_textarea_first() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "chat_page.html").await;

    let target = injector::find_target(&page).await.unwrap().unwrap();

    // The decoy search input must lose to the id-based selector.
    assert_eq!(target.selector, "#prompt-textarea");
    assert_eq!(target.tag, "textarea");
    assert!(!target.editable);
    assert_eq!(target.placeholder.as_deref(), Some("Send a message"));

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_locator_skips_hidden_disabled_and_readonly() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "hidden_inputs_page.html").await;

    let target = injector::find_target(&page).await.unwrap().unwrap();

    // Zero-size, display:none, visibility:hidden, disabled and readonly
    // textareas all match earlier selectors but none is a valid target.
    assert_eq!(target.tag, "input");
    assert_eq!(target.selector, r#"input[type="text"]:not([readonly]):not([disabled])"#);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_locator_returns_none_without_valid_target() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "no_target_page.html").await;

    assert!(injector::find_target(&page).await.unwrap().is_none());

    manager.close().await.unwrap();
}

// ============================================================================
// Injection paths
// ============================================================================

#[tokio::test]
async fn test_textarea_injection_sets_value_caret_and_events() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "chat_page.html").await;

    let outcome = injector::insert_text(&page, "Hello").await.unwrap();
    assert_eq!(outcome, InjectionOutcome::Direct);

    let value = eval(&manager, "document.getElementById('prompt-textarea').value").await;
    assert_eq!(value, "Hello");

    // Caret lands after the inserted text, not at position 0.
    let caret = eval(&manager, "document.getElementById('prompt-textarea').selectionStart").await;
    assert_eq!(caret, 5);

    // Listeners attached at load observed the synthetic events, generic
    // input first and the typed insertText event after it.
    let seen: Vec<String> =
        serde_json::from_value(eval(&manager, "window.__seenEvents").await).unwrap();
    let generic_at = seen.iter().position(|e| e == "input").unwrap();
    let typed_at = seen.iter().position(|e| e == "input:insertText").unwrap();
    assert!(generic_at < typed_at, "events observed: {:?}", seen);
    assert!(seen.iter().any(|e| e == "paste"));

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_contenteditable_injection() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "editable_page.html").await;

    let outcome = injector::insert_text(&page, "Rendered text").await.unwrap();
    assert_eq!(outcome, InjectionOutcome::Direct);

    let text = eval(&manager, "document.getElementById('editor').innerText.trim()").await;
    assert_eq!(text, "Rendered text");

    let seen: Vec<String> =
        serde_json::from_value(eval(&manager, "window.__seenEvents").await).unwrap();
    assert!(seen.iter().any(|e| e.starts_with("input")), "events observed: {:?}", seen);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_repeat_injection_replaces_content() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "chat_page.html").await;

    injector::insert_text(&page, "Hello").await.unwrap();
    injector::insert_text(&page, "Goodbye").await.unwrap();

    // Replace semantics: the second injection overwrites, never appends.
    let value = eval(&manager, "document.getElementById('prompt-textarea').value").await;
    assert_eq!(value, "Goodbye");

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_exec_command_fallback_when_direct_path_throws() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "stubborn_editor_page.html").await;

    let outcome = injector::insert_text(&page, "forced through").await.unwrap();
    assert_eq!(outcome, InjectionOutcome::ExecCommand);

    let text = eval(&manager, "document.getElementById('editor').textContent").await;
    assert_eq!(text, "forced through");

    manager.close().await.unwrap();
}

// ============================================================================
// Failure classification and clipboard fallback
// ============================================================================

#[tokio::test]
async fn test_no_target_fails_then_clipboard_leaves_no_residue() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "no_target_page.html").await;

    let err = injector::insert_text(&page, "orphan text").await.unwrap_err();
    assert!(matches!(err, InjectError::NoTargetFound), "got: {:?}", err);

    // Force the legacy copy path so the scratch textarea is exercised.
    eval(
        &manager,
        "Object.defineProperty(navigator, 'clipboard', { value: undefined }); true",
    )
    .await;

    let before = eval(&manager, "document.querySelectorAll('textarea').length").await;
    injector::copy_to_clipboard(&page, "orphan text").await;
    let after = eval(&manager, "document.querySelectorAll('textarea').length").await;

    // The temporary node is removed on success and failure alike.
    assert_eq!(before, after);

    manager.close().await.unwrap();
}

// ============================================================================
// Page bridge
// ============================================================================

#[tokio::test]
async fn test_bridge_install_is_idempotent_and_notifies() {
    let manager = BrowserManager::new();
    let page = open_fixture(&manager, "chat_page.html").await;

    assert!(!bridge::installed(&page).await.unwrap());
    bridge::ensure_installed(&page).await.unwrap();
    bridge::ensure_installed(&page).await.unwrap();
    assert!(bridge::installed(&page).await.unwrap());

    bridge::notify(&page, "Prompt inserted successfully!", Severity::Success)
        .await
        .unwrap();

    let shown = eval(
        &manager,
        "[...document.querySelectorAll('div')].some(d => d.textContent === 'Prompt inserted successfully!')",
    )
    .await;
    assert_eq!(shown, true);

    manager.close().await.unwrap();
}
