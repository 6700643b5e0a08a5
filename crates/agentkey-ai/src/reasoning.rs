//! Reasoning-trace extraction from a raw model payload.

/// Separators tried in order; the first one found wins.
const RULE_SEPARATOR: &str = "\n---\n";
const HEADING_MARKERS: [&str; 2] = ["### Reasoning", "## Thoughts"];

/// Split a payload into `(content, reasoning_trace)`.
///
/// With a `---` rule the text before it is content and the text after it
/// the trace, except for the rich two-section document (reasoning first
/// under a `# Reasoning` heading), which is recognized and unwrapped so
/// that rich output round-trips exactly. With a heading marker, content
/// precedes the heading and the trace follows it. No separator means the
/// whole payload is content.
pub fn split_reasoning(payload: &str) -> (String, Option<String>) {
    if let Some(idx) = payload.find(RULE_SEPARATOR) {
        let left = payload[..idx].trim();
        let right = payload[idx + RULE_SEPARATOR.len()..].trim();

        if let (Some(trace), Some(content)) = (
            left.strip_prefix("# Reasoning"),
            right.strip_prefix("# Output"),
        ) {
            return (content.trim().to_string(), non_empty(trace.trim()));
        }
        return (left.to_string(), non_empty(right));
    }

    for marker in HEADING_MARKERS {
        if let Some(idx) = payload.find(marker) {
            let content = payload[..idx].trim();
            let trace = payload[idx + marker.len()..].trim();
            return (content.to_string(), non_empty(trace));
        }
    }

    (payload.trim().to_string(), None)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
