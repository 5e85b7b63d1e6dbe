//! Keyword extraction from source code.
//!
//! Tokenization here is a deterministic character scan, not a grammar:
//! identifiers survive intact and are additionally expanded at case and
//! underscore boundaries so `parseHttpRequest` is findable as `parse`,
//! `http` and `request`.

/// Terms a character-class tokenizer would destroy.
///
/// These are matched verbatim (case-insensitive) against the raw text and
/// re-injected into the searchable body.
const INTERESTING_TERMS: &[&str] = &[
    "c++",
    "c#",
    "f#",
    "j#",
    ".net",
    "asp.net",
    "vb.net",
    "node.js",
    "objective-c",
    "t-sql",
    "pl/sql",
];

fn is_token_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split source text into searchable keywords.
///
/// Emits each identifier-like token once, followed by its camelCase /
/// snake_case sub-words when splitting produced more than one part.
/// Output is a single space-joined string ready for concatenation into
/// the index body.
pub fn split_keywords(content: &str) -> String {
    let mut keywords = Vec::new();

    for token in tokenize(content) {
        let parts = split_identifier(token);
        keywords.push(token.to_string());
        if parts.len() > 1 {
            keywords.extend(parts);
        }
    }

    keywords.join(" ")
}

/// Strip punctuation noise from source text.
///
/// Every non-alphanumeric character becomes a separator, and tokens
/// shorter than two characters are dropped, so `foo();` contributes
/// `foo` and operators contribute nothing.
pub fn code_clean_pipeline(content: &str) -> String {
    content
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find terms that plain tokenization would mangle.
///
/// Scans the raw text for the known special terms (`c++`, `c#`, ...) and
/// returns each matched term once, space-joined.
pub fn find_interesting_keywords(content: &str) -> String {
    let haystack = content.to_lowercase();

    INTERESTING_TERMS
        .iter()
        .filter(|term| haystack.contains(*term))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokenize(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(|ch: char| !is_token_char(ch))
        .filter(|token| !token.is_empty())
}

/// Expand one identifier at underscore and lower-to-upper boundaries.
fn split_identifier(token: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in token.chars() {
        if ch == '_' {
            if !current.is_empty() {
                parts.push(current.to_lowercase());
                current = String::new();
            }
            prev_lower = false;
            continue;
        }

        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            parts.push(current.to_lowercase());
            current = String::new();
        }

        prev_lower = ch.is_lowercase() || ch.is_numeric();
        current.push(ch);
    }

    if !current.is_empty() {
        parts.push(current.to_lowercase());
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keywords_plain() {
        let keywords = split_keywords("fn main");
        assert_eq!(keywords, "fn main");
    }

    #[test]
    fn test_split_keywords_camel_case() {
        let keywords = split_keywords("parseHttpRequest");
        assert!(keywords.contains("parseHttpRequest"));
        assert!(keywords.contains("parse"));
        assert!(keywords.contains("http"));
        assert!(keywords.contains("request"));
    }

    #[test]
    fn test_split_keywords_snake_case() {
        let keywords = split_keywords("index_writer_config");
        assert!(keywords.contains("index"));
        assert!(keywords.contains("writer"));
        assert!(keywords.contains("config"));
    }

    #[test]
    fn test_split_keywords_no_duplicate_expansion_for_single_word() {
        assert_eq!(split_keywords("main"), "main");
    }

    #[test]
    fn test_code_clean_strips_punctuation() {
        let cleaned = code_clean_pipeline("writer.commit();");
        assert_eq!(cleaned, "writer commit");
    }

    #[test]
    fn test_code_clean_drops_short_tokens() {
        let cleaned = code_clean_pipeline("a = b + cd");
        assert_eq!(cleaned, "cd");
    }

    #[test]
    fn test_interesting_keywords_found() {
        let found = find_interesting_keywords("Bindings for C++ and C# callers");
        assert!(found.contains("c++"));
        assert!(found.contains("c#"));
    }

    #[test]
    fn test_interesting_keywords_absent() {
        assert_eq!(find_interesting_keywords("plain rust code"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_keywords(""), "");
        assert_eq!(code_clean_pipeline(""), "");
        assert_eq!(find_interesting_keywords(""), "");
    }
}
