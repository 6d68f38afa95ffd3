//! Category Text Normalization
//!
//! Pure text transforms over category tokens:
//! - reserved-character escaping for FTS5 search expressions
//! - singular/plural spelling variants
//! - case-insensitive identity helpers

use super::expression::SearchExpr;

/// Characters the FTS5 expression parser would read as syntax.
///
/// `!`, `+` and `"` are left alone: they either parse harmlessly or are
/// already handled by the tokenizer.
pub const RESERVED_CHARS: &[char] = &[
    '.', '-', '\'', '#', '$', '%', '&', '\\', '/', '(', ')', '[', ']', '{', '}', '|', ':', ';',
    '=', '?', '@',
];

/// Wrap each reserved character in double quotes so the search parser treats
/// it as a literal.
pub fn escape_reserved_chars(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('"');
            escaped.push(c);
            escaped.push('"');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Spelling variants of a category, the token itself first.
///
/// - `...ss`   → token, token + "es"
/// - `...sses` → token, token without "es"
/// - `...s`    → token, token + "es", token without "s"
/// - otherwise → token, token + "s"
pub fn spelling_variants(token: &str) -> Vec<String> {
    if token.ends_with("ss") {
        vec![token.to_string(), format!("{token}es")]
    } else if token.ends_with("sses") {
        vec![token.to_string(), token[..token.len() - 2].to_string()]
    } else if let Some(singular) = token.strip_suffix('s') {
        vec![
            token.to_string(),
            format!("{token}es"),
            singular.to_string(),
        ]
    } else {
        vec![token.to_string(), format!("{token}s")]
    }
}

/// Parenthesized disjunction of a category's spelling variants, with
/// reserved characters escaped, e.g. `(flower OR flowers)`.
pub fn plural_singular_alternation(token: &str) -> String {
    SearchExpr::spelling_alternation(token).to_fts5()
}

/// Case-insensitive fold used for every category identity check.
pub fn fold(token: &str) -> String {
    token.to_lowercase()
}

/// True when two tokens name the same category.
pub fn same_category(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// Split a comma-joined category field, skipping blank tokens.
pub fn split_cats(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|cat| !cat.trim().is_empty())
}
