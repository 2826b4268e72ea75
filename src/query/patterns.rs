// file: src/query/patterns.rs
// description: compiled regex patterns for stack-trace noise in pasted error text
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Python: File "/app/main.py", line 12, in handler
    pub static ref PY_FILE_LINE: Regex = Regex::new(
        r#"File "[^"]*", line \d+(?:, in \S+)?"#
    ).expect("PY_FILE_LINE regex is valid");

    // JVM frames: (ArrayList.java:437) or (Native Method)
    pub static ref PAREN_LOCATION: Regex = Regex::new(
        r"\((?:[\w$.\-]+\.\w+:\d+(?::\d+)?|Native Method|Unknown Source)\)"
    ).expect("PAREN_LOCATION regex is valid");

    // Absolute, home or dot-relative paths with optional :line[:col].
    // Anchored on whitespace so "input/output" survives.
    pub static ref PATH_LOCATION: Regex = Regex::new(
        r"(?:^|\s)(?:[A-Za-z]:[\\/]|~[\\/]|\.{1,2}[\\/]|[\\/])(?:[\w.\-]+[\\/])*[\w.\-]+(?::\d+){0,2}"
    ).expect("PATH_LOCATION regex is valid");

    // Relative source locations: main.rs:12:5, src/lib.rs:40
    pub static ref FILE_LINE: Regex = Regex::new(
        r"\b(?:[\w.\-]+[\\/])*[\w\-]+\.[A-Za-z]{1,5}:\d+(?::\d+)?\b"
    ).expect("FILE_LINE regex is valid");

    pub static ref LINE_NUMBER: Regex = Regex::new(
        r"(?i)\bline \d+\b"
    ).expect("LINE_NUMBER regex is valid");

    pub static ref HEX_ADDRESS: Regex = Regex::new(
        r"\b0x[0-9a-fA-F]{6,}\b"
    ).expect("HEX_ADDRESS regex is valid");
}

/// Applied in order; earlier patterns consume fragments later ones would split.
pub fn noise_patterns() -> [&'static Regex; 6] {
    [
        &PY_FILE_LINE,
        &PAREN_LOCATION,
        &PATH_LOCATION,
        &FILE_LINE,
        &LINE_NUMBER,
        &HEX_ADDRESS,
    ]
}
