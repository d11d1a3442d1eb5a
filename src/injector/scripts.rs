//! Page-side JavaScript for the locator and the insertion paths.
//!
//! Scripts are built from `const` templates with the selector order and the
//! payload text embedded as JSON literals, so arbitrary prompt text can never
//! break out of the script. Each write-path script relocates its target with
//! the same ordered scan the locator uses, keeping the element choice
//! deterministic across the CDP round trips of one injection.

use serde::Deserialize;
use serde_json::Value;

use super::events::dispatch_snippet;

/// Facts about the element the locator picked, derived at evaluation time.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetInfo {
    pub selector: String,
    pub tag: String,
    #[serde(default)]
    pub input_type: Option<String>,
    pub editable: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// Result returned by every write-path script. A page-side exception is
/// caught in the script and surfaced here instead of failing the evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResult {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

pub const HOSTNAME_SCRIPT: &str = "window.location.hostname";

/// Shared finder: walks the ordered selector list, queries matches in
/// document order, and returns the first valid element. A selector that
/// fails to parse counts as zero matches; the scan never aborts.
const FINDER_HELPER: &str = r#"
    const isValidTarget = (el) => {
        if (!el) return false;
        if (el.offsetWidth === 0 || el.offsetHeight === 0) return false;
        if (el.disabled || el.readOnly) return false;
        const style = window.getComputedStyle(el);
        if (style.display === 'none' || style.visibility === 'hidden') return false;
        return true;
    };

    const findTarget = (selectors) => {
        for (const selector of selectors) {
            let matches = [];
            try {
                matches = document.querySelectorAll(selector);
            } catch (e) {
                continue;
            }
            for (const el of matches) {
                if (isValidTarget(el)) return { el, selector };
            }
        }
        return null;
    };
"#;

const FIND_TARGET_TEMPLATE: &str = r#"
(() => {
__FINDER__
    const hit = findTarget(__SELECTORS__);
    if (!hit) return null;
    const el = hit.el;
    return {
        selector: hit.selector,
        tag: el.tagName.toLowerCase(),
        input_type: el.type || null,
        editable: el.isContentEditable || el.contentEditable === 'true',
        placeholder: el.placeholder || null
    };
})()
"#;

const INSERT_EDITABLE_TEMPLATE: &str = r#"
(() => {
__FINDER__
    const text = __TEXT__;
    const hit = findTarget(__SELECTORS__);
    if (!hit) return { ok: false, error: 'target no longer present' };
    const el = hit.el;
    try {
        el.focus();
        if (el.innerText || el.textContent) {
            el.innerText = text;
        } else {
            el.textContent = text;
        }
__DISPATCH__
        return { ok: true };
    } catch (e) {
        return { ok: false, error: String(e) };
    }
})()
"#;

const INSERT_VALUE_TEMPLATE: &str = r#"
(() => {
__FINDER__
    const text = __TEXT__;
    const hit = findTarget(__SELECTORS__);
    if (!hit) return { ok: false, error: 'target no longer present' };
    const el = hit.el;
    try {
        el.focus();
        el.value = text;
__DISPATCH__
        if (el.setSelectionRange) {
            el.setSelectionRange(text.length, text.length);
        }
        return { ok: true };
    } catch (e) {
        return { ok: false, error: String(e) };
    }
})()
"#;

/// Last-resort tier: re-select the target's existing content and replace it
/// through the browser's native insert-text command. Kept in its own builder
/// so the deprecated command can be swapped out without touching the
/// surrounding state machine.
const EXEC_COMMAND_TEMPLATE: &str = r#"
(() => {
__FINDER__
    const text = __TEXT__;
    const hit = findTarget(__SELECTORS__);
    if (!hit) return { ok: false, error: 'target no longer present' };
    const el = hit.el;
    try {
        el.focus();
        if (el.isContentEditable || el.contentEditable === 'true') {
            window.getSelection().selectAllChildren(el);
        } else if (el.select) {
            el.select();
        }
        const accepted = document.execCommand('insertText', false, text);
        if (!accepted) return { ok: false, error: 'insertText command rejected' };
        return { ok: true };
    } catch (e) {
        return { ok: false, error: String(e) };
    }
})()
"#;

/// Clipboard copy: async clipboard API in secure contexts, otherwise a
/// temporary off-screen textarea and the legacy copy command. The scratch
/// node is removed on success and failure alike, and the script resolves to
/// a plain boolean rather than ever throwing.
const CLIPBOARD_TEMPLATE: &str = r#"
(async () => {
    const text = __TEXT__;
    try {
        if (navigator.clipboard && window.isSecureContext) {
            await navigator.clipboard.writeText(text);
            return true;
        }
        const scratch = document.createElement('textarea');
        scratch.value = text;
        scratch.style.position = 'fixed';
        scratch.style.left = '-999999px';
        scratch.style.top = '-999999px';
        document.body.appendChild(scratch);
        try {
            scratch.focus();
            scratch.select();
            return document.execCommand('copy');
        } finally {
            scratch.remove();
        }
    } catch (e) {
        return false;
    }
})()
"#;

pub fn find_target_script(selectors: &[&str]) -> String {
    FIND_TARGET_TEMPLATE
        .replace("__FINDER__", FINDER_HELPER)
        .replace("__SELECTORS__", &js_array(selectors))
}

pub fn insert_editable_script(selectors: &[&str], text: &str) -> String {
    fill_write_template(INSERT_EDITABLE_TEMPLATE, selectors, text)
}

pub fn insert_value_script(selectors: &[&str], text: &str) -> String {
    fill_write_template(INSERT_VALUE_TEMPLATE, selectors, text)
}

pub fn exec_command_script(selectors: &[&str], text: &str) -> String {
    fill_write_template(EXEC_COMMAND_TEMPLATE, selectors, text)
}

pub fn clipboard_script(text: &str) -> String {
    CLIPBOARD_TEMPLATE.replace("__TEXT__", &js_string(text))
}

fn fill_write_template(template: &str, selectors: &[&str], text: &str) -> String {
    template
        .replace("__FINDER__", FINDER_HELPER)
        .replace("__DISPATCH__", &dispatch_snippet("el", "text"))
        .replace("__SELECTORS__", &js_array(selectors))
        .replace("__TEXT__", &js_string(text))
}

/// JSON string literal, valid as a JavaScript expression for any input.
pub(crate) fn js_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

fn js_array(items: &[&str]) -> String {
    Value::Array(items.iter().map(|s| Value::String((*s).to_owned())).collect()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_hostile_payloads() {
        let script = js_string("line1\nline2 \"quoted\" \\ ' `tick` </script>");
        // Raw newlines and unescaped quotes would terminate the literal.
        assert!(!script.contains('\n'));
        assert!(script.starts_with('"') && script.ends_with('"'));
        assert!(script.contains(r#"\n"#));
        assert!(script.contains(r#"\"quoted\""#));
    }

    #[test]
    fn test_selectors_embedded_in_order() {
        let script = find_target_script(&["#a", ".b"]);
        assert!(script.contains(r##"["#a",".b"]"##));
    }

    #[test]
    fn test_value_script_writes_then_dispatches_then_moves_caret() {
        let script = insert_value_script(&["textarea"], "hi");
        let write_at = script.find("el.value = text").unwrap();
        let dispatch_at = script.find("dispatchEvent").unwrap();
        let caret_at = script.find("setSelectionRange").unwrap();
        assert!(write_at < dispatch_at && dispatch_at < caret_at);
    }

    #[test]
    fn test_editable_script_prefers_inner_text() {
        let script = insert_editable_script(&["[contenteditable=\"true\"]"], "hi");
        assert!(script.contains("el.innerText = text"));
        assert!(script.contains("el.textContent = text"));
        assert!(script.contains("dispatchEvent"));
    }

    #[test]
    fn test_exec_command_script_selects_before_inserting() {
        let script = exec_command_script(&["textarea"], "hi");
        let select_at = script.find("selectAllChildren").unwrap();
        let exec_at = script.find("execCommand('insertText'").unwrap();
        assert!(select_at < exec_at);
    }

    #[test]
    fn test_clipboard_script_cleans_up_in_finally() {
        let script = clipboard_script("hi");
        let finally_at = script.find("finally").unwrap();
        let remove_at = script.find("scratch.remove()").unwrap();
        assert!(finally_at < remove_at);
        assert!(script.contains("navigator.clipboard"));
    }

    #[test]
    fn test_write_scripts_never_leave_placeholders() {
        for script in [
            insert_editable_script(&["#x"], "t"),
            insert_value_script(&["#x"], "t"),
            exec_command_script(&["#x"], "t"),
            clipboard_script("t"),
            find_target_script(&["#x"]),
        ] {
            assert!(!script.contains("__"), "unfilled placeholder in: {script}");
        }
    }
}
