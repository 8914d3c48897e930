use crate::dbc::core::{lex, strings};
use crate::dbc::types::attributes::AttrLiteral;

/// Parse a `BA_DEF_DEF_ "<name>" <value> ;` statement. The literal is kept
/// raw here; it is checked against the declared kind when folded into the
/// database.
pub(crate) fn parse(stmt: &str) -> Option<(String, AttrLiteral)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("BA_DEF_DEF_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (name, rest) = lex::take_quoted(rest.trim_start())?;
    if name.is_empty() {
        return None;
    }
    let literal: AttrLiteral = parse_literal(rest.trim_start())?;
    Some((name, literal))
}

/// Parse the trailing `<number>|"<string>"` literal of `BA_DEF_DEF_`/`BA_`.
/// Nothing may follow it.
pub(crate) fn parse_literal(s: &str) -> Option<AttrLiteral> {
    if s.starts_with('"') {
        let (text, tail) = lex::take_quoted(s)?;
        if !tail.trim().is_empty() {
            return None;
        }
        return Some(AttrLiteral::Str(text));
    }
    let mut it = s.split_ascii_whitespace();
    let tok: &str = it.next()?;
    if it.next().is_some() {
        return None;
    }
    match lex::parse_number(tok)? {
        lex::Number::Int(v) => Some(AttrLiteral::Int(v)),
        lex::Number::Float(v) => Some(AttrLiteral::Float(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse(r#"BA_DEF_DEF_ "GenMsgCycleTime" 100;"#).unwrap(),
            ("GenMsgCycleTime".to_string(), AttrLiteral::Int(100))
        );
        assert_eq!(
            parse(r#"BA_DEF_DEF_ "BusType" "CAN";"#).unwrap(),
            ("BusType".to_string(), AttrLiteral::Str("CAN".to_string()))
        );
        assert_eq!(
            parse(r#"BA_DEF_DEF_ "Gain" 0.25;"#).unwrap(),
            ("Gain".to_string(), AttrLiteral::Float(0.25))
        );
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"BA_DEF_DEF_ "X";"#).is_none()); // no value
        assert!(parse(r#"BA_DEF_DEF_ "X" 1 2;"#).is_none()); // trailing junk
        assert!(parse(r#"BA_DEF_DEF_ "X" 1"#).is_none()); // missing ;
    }
}
