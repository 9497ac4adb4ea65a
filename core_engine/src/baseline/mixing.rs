use std::collections::HashSet;

/// Upper bound on any suggestion list handed to a client.
pub const MAX_SUGGESTIONS: usize = 5;

const TRAILING_PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

/// Normalizes a raw completion into a single candidate word.
///
/// Trims and lowercases, then drops at most one trailing `.`, `,`, `!`, `?`
/// or `;`. The result may be empty; [`merge_suggestions`] filters that out.
pub fn clean_completion(raw: &str) -> String {
    let mut word = raw.trim().to_lowercase();
    if word.ends_with(TRAILING_PUNCTUATION) {
        word.pop();
    }
    word
}

/// Puts the remote candidate (if any) ahead of the rule-based list, then drops
/// empties and case-insensitive repeats, keeping at most `limit` words.
pub fn merge_suggestions(remote: Option<&str>, rules: &[&str], limit: usize) -> Vec<String> {
    let limit = limit.min(MAX_SUGGESTIONS);
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(limit);

    for word in remote.into_iter().chain(rules.iter().copied()) {
        if merged.len() == limit {
            break;
        }
        if word.is_empty() {
            continue;
        }
        if seen.insert(word.to_lowercase()) {
            merged.push(word.to_string());
        }
    }
    merged
}
