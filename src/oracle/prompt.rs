use std::fmt::Write;

use super::NONE_OF_THESE;
use crate::types::OracleRequest;

pub const SYSTEM_PROMPT: &str = "You classify Shopify products.";

/// User message for one level: description, path so far, numbered candidates.
pub fn render(request: &OracleRequest) -> String {
    let mut out = String::new();
    out.push_str("You are an expert Shopify taxonomy classifier.\n");
    out.push_str("Select the single best matching category from the provided list.\n");
    out.push_str("Respond with exactly one of the candidate category names, their full names, the category ID, or the phrase 'none of these'.\n");
    out.push_str("Do not add explanations.\n\n");
    out.push_str("Product description:\n");
    out.push_str(&request.description);
    out.push_str("\n\n");
    if !request.path.is_empty() {
        out.push_str("Current category path: ");
        out.push_str(&request.path.join(" > "));
        out.push('\n');
    }
    out.push_str("Candidate categories:\n");
    for (i, candidate) in request.candidates.iter().enumerate() {
        let label = [&candidate.full_name, &candidate.name, &candidate.id]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map(String::as_str)
            .unwrap_or_default();
        // Writing to a String cannot fail.
        if candidate.id.trim().is_empty() {
            let _ = writeln!(out, "{}. {}", i + 1, label);
        } else {
            let _ = writeln!(out, "{}. {} (id: {})", i + 1, label, candidate.id);
        }
    }
    let _ = writeln!(out, "{}. {}", request.candidates.len() + 1, NONE_OF_THESE);
    out.push_str("\nRespond with the category name/full name/id or 'none of these'.");
    out
}
