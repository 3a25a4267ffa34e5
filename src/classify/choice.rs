use crate::oracle::NONE_OF_THESE;
use crate::taxonomy::Node;

/// How the classifier reads one oracle answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Decline,
    Select(&'a Node),
    Unmatched,
}

/// Trim the answer and drop a trailing ` (id: ...)` echo of the id hint.
pub fn normalize(raw: &str) -> &str {
    let trimmed = raw.trim();
    // ASCII lowering keeps byte offsets aligned with `trimmed`.
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.ends_with(')') {
        if let Some(start) = lowered.rfind(" (id:") {
            return trimmed[..start].trim();
        }
    }
    trimmed
}

pub fn is_none_of_these(normalized: &str) -> bool {
    eq_fold(normalized, NONE_OF_THESE)
}

/// First offered node whose name, full name, or id equals the answer.
pub fn match_candidate<'a>(normalized: &str, offered: &[&'a Node]) -> Option<&'a Node> {
    // Synthetic roots have an empty id; an empty answer must not select one.
    if normalized.is_empty() {
        return None;
    }
    offered.iter().copied().find(|node| {
        eq_fold(&node.name, normalized)
            || eq_fold(&node.full_name, normalized)
            || eq_fold(&node.id, normalized)
    })
}

pub fn interpret<'a>(raw: &str, offered: &[&'a Node]) -> Decision<'a> {
    let normalized = normalize(raw);
    if is_none_of_these(normalized) {
        return Decision::Decline;
    }
    match match_candidate(normalized, offered) {
        Some(node) => Decision::Select(node),
        None => Decision::Unmatched,
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
