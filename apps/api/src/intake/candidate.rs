//! Contact heuristics over extracted resume text.

use std::sync::OnceLock;

use regex::Regex;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";
const NAME_PATTERN: &str = r"\b[A-Z][a-z]+ [A-Z][a-z]+\b";
const HAS_DIGIT_OR_AT: &str = r"\d|@";

/// Lines scanned for a name, from the top of the document.
const NAME_SCAN_LINES: usize = 5;

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

fn email_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, EMAIL_PATTERN)
}

fn name_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, NAME_PATTERN)
}

fn digit_or_at_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, HAS_DIGIT_OR_AT)
}

/// First email-looking token anywhere in the text.
pub fn extract_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}

/// Best guess at the candidate's name from the first few lines.
///
/// A `Firstname Lastname` pair wins; otherwise a short line (2 to 4 words) with
/// no digits or `@` is taken as-is.
pub fn extract_name(text: &str) -> Option<String> {
    for line in text.trim().split('\n').take(NAME_SCAN_LINES) {
        if let Some(m) = name_regex().find(line) {
            return Some(m.as_str().to_string());
        }
        if !digit_or_at_regex().is_match(line) {
            let words = line.split_whitespace().count();
            if (2..=4).contains(&words) {
                return Some(line.trim().to_string());
            }
        }
    }
    None
}
