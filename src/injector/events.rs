//! Synthetic event sequence dispatched after writing text into a target.
//!
//! Host frameworks attach handlers to different event names and expect them
//! in a realistic order, so the sequence is modeled as data and rendered into
//! page-side JavaScript by a single function. Both write paths consume the
//! same list; the ordering invariant lives here and nowhere else.

/// What a descriptor dispatches: a plain `Event` with the given name, or the
/// typed `InputEvent` carrying `insertText` semantics and the inserted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Generic(&'static str),
    TypedInsert,
}

#[derive(Debug, Clone, Copy)]
pub struct EventSpec {
    pub kind: EventKind,
    pub bubbles: bool,
    pub cancelable: bool,
}

const fn generic(name: &'static str) -> EventSpec {
    EventSpec {
        kind: EventKind::Generic(name),
        bubbles: true,
        cancelable: true,
    }
}

/// The full post-write sequence. Generic events fire before the typed input
/// event so that frameworks listening on either style are covered.
pub const INSERT_EVENT_SEQUENCE: &[EventSpec] = &[
    generic("input"),
    generic("change"),
    generic("keyup"),
    generic("paste"),
    EventSpec {
        kind: EventKind::TypedInsert,
        bubbles: true,
        cancelable: true,
    },
];

/// Render the dispatch statements for `INSERT_EVENT_SEQUENCE`.
///
/// `target_var` names the element variable in the surrounding script and
/// `payload_var` the variable holding the inserted string.
pub fn dispatch_snippet(target_var: &str, payload_var: &str) -> String {
    let mut out = String::new();
    for spec in INSERT_EVENT_SEQUENCE {
        let statement = match spec.kind {
            EventKind::Generic(name) => format!(
                "{target}.dispatchEvent(new Event('{name}', {{ bubbles: {bubbles}, cancelable: {cancelable} }}));\n",
                target = target_var,
                name = name,
                bubbles = spec.bubbles,
                cancelable = spec.cancelable,
            ),
            EventKind::TypedInsert => format!(
                "{target}.dispatchEvent(new InputEvent('input', {{ bubbles: {bubbles}, cancelable: {cancelable}, inputType: 'insertText', data: {payload} }}));\n",
                target = target_var,
                bubbles = spec.bubbles,
                cancelable = spec.cancelable,
                payload = payload_var,
            ),
        };
        out.push_str(&statement);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_events_precede_typed_event() {
        let typed_at = INSERT_EVENT_SEQUENCE
            .iter()
            .position(|s| s.kind == EventKind::TypedInsert)
            .unwrap();
        assert_eq!(typed_at, INSERT_EVENT_SEQUENCE.len() - 1);
    }

    #[test]
    fn test_generic_event_order() {
        let names: Vec<&str> = INSERT_EVENT_SEQUENCE
            .iter()
            .filter_map(|s| match s.kind {
                EventKind::Generic(name) => Some(name),
                EventKind::TypedInsert => None,
            })
            .collect();
        assert_eq!(names, ["input", "change", "keyup", "paste"]);
    }

    #[test]
    fn test_all_events_bubble_and_are_cancelable() {
        for spec in INSERT_EVENT_SEQUENCE {
            assert!(spec.bubbles);
            assert!(spec.cancelable);
        }
    }

    #[test]
    fn test_snippet_preserves_sequence_order() {
        let snippet = dispatch_snippet("el", "text");
        let positions: Vec<usize> = ["'input'", "'change'", "'keyup'", "'paste'", "InputEvent"]
            .iter()
            .map(|needle| snippet.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_snippet_targets_given_variables() {
        let snippet = dispatch_snippet("node", "payload");
        assert!(snippet.contains("node.dispatchEvent"));
        assert!(snippet.contains("data: payload"));
        assert!(!snippet.contains("el.dispatchEvent"));
    }
}
