use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Splits a delimited environment value into trimmed, non-empty pieces.
pub fn split_list(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses the raw value of `var`, falling back to `default` when it is unset,
/// blank, or does not parse.
pub fn parse_or_default<T>(var: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => default,
        Some(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Invalid value {:?} for {} ({}), using default {}", value, var, e, default);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a ; b;;c ", ';'), vec!["a", "b", "c"]);
        assert!(split_list("", ';').is_empty());
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default("ENTRIES_PER_FEED", Some(" 8 "), 5usize), 8);
        assert_eq!(parse_or_default("ENTRIES_PER_FEED", Some("eight"), 5usize), 5);
        assert_eq!(parse_or_default("ENTRIES_PER_FEED", Some(""), 5usize), 5);
        assert_eq!(parse_or_default("OLLAMA_PORT", None, 11434u16), 11434);
        assert_eq!(parse_or_default("OLLAMA_PORT", Some("70000"), 11434u16), 11434);
    }
}
