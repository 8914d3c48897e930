use crate::dbc::core::{lex, strings};
use crate::dbc::types::value_table::ValueTableDBC;
use std::collections::BTreeMap;

/// Parse a `VAL_TABLE_ <name> (<value> "<label>")* ;` statement defining a
/// reusable enumeration.
pub(crate) fn parse(stmt: &str) -> Option<ValueTableDBC> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("VAL_TABLE_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest: &str = rest.trim_start();

    let cut: usize = rest
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let (name, rest) = rest.split_at(cut);
    if !lex::is_identifier(name) {
        return None;
    }

    let entries: BTreeMap<i64, String> = parse_value_pairs(rest)?;
    Some(ValueTableDBC {
        name: name.to_string(),
        entries,
    })
}

/// Parse the `(<value> "<label>")*` tail shared by `VAL_TABLE_` and `VAL_`.
/// Duplicate keys within one statement are a failure (value descriptions
/// must be unique within their scope).
pub(crate) fn parse_value_pairs(s: &str) -> Option<BTreeMap<i64, String>> {
    let mut rest: &str = s.trim_start();
    let mut map: BTreeMap<i64, String> = BTreeMap::new();
    while !rest.is_empty() {
        let cut: usize = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '"')
            .unwrap_or(rest.len());
        let (tok, r) = rest.split_at(cut);
        let key: i64 = tok.parse().ok()?;
        let (label, r) = lex::take_quoted(r.trim_start())?;
        if map.insert(key, label).is_some() {
            return None;
        }
        rest = r.trim_start();
    }
    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let t = parse(r#"VAL_TABLE_ Gears 0 "Neutral" 1 "First" 2 "Second";"#).unwrap();
        assert_eq!(t.name, "Gears");
        assert_eq!(t.entries.len(), 3);
        assert_eq!(t.describe(1), Some("First"));
    }

    #[test]
    fn test_empty_table() {
        let t = parse("VAL_TABLE_ Empty ;").unwrap();
        assert!(t.entries.is_empty());
    }

    #[test]
    fn test_negative_keys_and_spaced_labels() {
        let t = parse(r#"VAL_TABLE_ T -1 "below zero" 0 "zero";"#).unwrap();
        assert_eq!(t.describe(-1), Some("below zero"));
    }

    #[test]
    fn test_reject_duplicate_key() {
        assert!(parse(r#"VAL_TABLE_ T 1 "a" 1 "b";"#).is_none());
    }

    #[test]
    fn test_reject_malformed() {
        assert!(parse(r#"VAL_TABLE_ T 1 noquotes;"#).is_none());
        assert!(parse(r#"VAL_TABLE_ T 1 "a""#).is_none()); // missing ;
    }
}
