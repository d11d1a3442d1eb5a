//! Selector catalog for locating the page's main text-entry element.
//!
//! Two ordered lists: per-domain overrides keyed by exact hostname, and a
//! generic fallback list applied everywhere. Overrides come first because
//! the major chat sites carry distinctive, stable markup that beats any
//! generic heuristic; the generic list runs from most specific (id-based)
//! to loosest (any enabled text input) so an unknown site still resolves
//! to its main input rather than a decoy search box.

/// Generic fallback selectors, in priority order. First match wins.
pub const GENERIC_SELECTORS: &[&str] = &[
    "#prompt-textarea",
    r#"textarea[placeholder*="message"]"#,
    r#"textarea[placeholder*="question"]"#,
    r#"textarea[placeholder*="prompt"]"#,
    r#"textarea[placeholder*="chat"]"#,
    r#"[contenteditable="true"]"#,
    r#"[role="textbox"]"#,
    "textarea:not([readonly]):not([disabled])",
    r#"input[type="text"]:not([readonly]):not([disabled])"#,
];

/// Per-domain overrides, keyed by exact hostname.
pub const DOMAIN_SELECTORS: &[(&str, &[&str])] = &[
    ("chatgpt.com", &["#prompt-textarea", r#"[contenteditable="true"]"#]),
    ("claude.ai", &[r#"[contenteditable="true"]"#, r#"[role="textbox"]"#]),
    ("chat.mistral.ai", &["textarea", r#"[contenteditable="true"]"#]),
    ("gemini.google.com", &[r#"[contenteditable="true"]"#, r#"[role="textbox"]"#]),
    ("dust.tt", &[r#".tiptap.ProseMirror[contenteditable="true"]"#, r#"[contenteditable="true"]"#]),
    ("chat.deepseek.com", &["textarea", r#"[contenteditable="true"]"#]),
    ("chat.qwen.ai", &["textarea", r#"[contenteditable="true"]"#]),
    ("grok.com", &["textarea", r#"[contenteditable="true"]"#]),
    ("notebooklm.google.com", &["textarea", r#"[contenteditable="true"]"#, r#"[role="textbox"]"#]),
    ("aistudio.google.com", &["textarea", r#"[contenteditable="true"]"#, r#"[role="textbox"]"#]),
];

/// Selector order for a hostname: domain overrides (if any) strictly before
/// the generic list, preserving order within each part.
pub fn search_order(hostname: &str) -> Vec<&'static str> {
    let specific = DOMAIN_SELECTORS
        .iter()
        .find(|(domain, _)| *domain == hostname)
        .map(|(_, selectors)| *selectors)
        .unwrap_or(&[]);

    specific
        .iter()
        .chain(GENERIC_SELECTORS.iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_hostname_uses_generic_list_only() {
        let order = search_order("example.com");
        assert_eq!(order, GENERIC_SELECTORS);
    }

    #[test]
    fn test_known_hostname_prepends_domain_overrides() {
        let order = search_order("claude.ai");
        assert_eq!(order[0], r#"[contenteditable="true"]"#);
        assert_eq!(order[1], r#"[role="textbox"]"#);
        assert_eq!(&order[2..], GENERIC_SELECTORS);
    }

    #[test]
    fn test_override_lookup_is_exact_hostname_match() {
        // A subdomain of a known site is not the known site.
        assert_eq!(search_order("www.chatgpt.com"), GENERIC_SELECTORS);
        assert_eq!(search_order("chatgpt.com").len(), GENERIC_SELECTORS.len() + 2);
    }

    #[test]
    fn test_generic_list_priority_ordering() {
        // Id-based selector first, bare enabled text input last.
        assert_eq!(GENERIC_SELECTORS[0], "#prompt-textarea");
        assert_eq!(
            *GENERIC_SELECTORS.last().unwrap(),
            r#"input[type="text"]:not([readonly]):not([disabled])"#
        );
    }

    #[test]
    fn test_every_domain_override_has_selectors() {
        for (domain, selectors) in DOMAIN_SELECTORS {
            assert!(!selectors.is_empty(), "{} has no selectors", domain);
        }
    }
}
