// Lexical primitives shared by the per-section statement parsers.
//
// Failures never panic; every helper returns Option and the enclosing
// section parser turns a None into its own "no value" outcome.

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A numeric literal, with the integer alternative tried first so an
/// int-expecting grammar position never consumes through the float rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

pub(crate) fn parse_number(tok: &str) -> Option<Number> {
    if let Ok(v) = tok.parse::<i64>() {
        return Some(Number::Int(v));
    }
    // reject the "inf"/"nan" spellings f64::from_str would accept
    if !tok
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == '.')
    {
        return None;
    }
    tok.parse::<f64>().ok().map(Number::Float)
}

/// Take a quoted string starting at the first character of `s` (which must
/// be `"`). Returns the unescaped content and the remainder after the
/// closing quote. Only the `\"` and `\\` escapes are recognized; an unknown
/// escape or a missing terminator fails the match.
pub(crate) fn take_quoted(s: &str) -> Option<(String, &str)> {
    let mut it = s.char_indices();
    match it.next() {
        Some((_, '"')) => {}
        _ => return None,
    }
    let mut out = String::new();
    while let Some((idx, c)) = it.next() {
        match c {
            '"' => return Some((out, &s[idx + 1..])),
            '\\' => match it.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                _ => return None,
            },
            other => out.push(other),
        }
    }
    None
}

/// Skip the quoted string at the start of trimmed `s` and return what
/// follows it, trimmed at the front.
pub(crate) fn after_quoted(s: &str) -> Option<(String, &str)> {
    let (text, rest) = take_quoted(s.trim_start())?;
    Some((text, rest.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("EngineSpeed"));
        assert!(is_identifier("_x7"));
        assert!(!is_identifier("7x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_number_ordered_alternatives() {
        assert_eq!(parse_number("42"), Some(Number::Int(42)));
        assert_eq!(parse_number("-7"), Some(Number::Int(-7)));
        assert_eq!(parse_number("2.5"), Some(Number::Float(2.5)));
        assert_eq!(parse_number("1e-3"), Some(Number::Float(0.001)));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_take_quoted_escapes() {
        let (text, rest) = take_quoted(r#""a \"b\" \\c" tail"#).unwrap();
        assert_eq!(text, r#"a "b" \c"#);
        assert_eq!(rest, " tail");
    }

    #[test]
    fn test_take_quoted_failures() {
        assert!(take_quoted("no quote").is_none());
        assert!(take_quoted("\"unterminated").is_none());
        assert!(take_quoted(r#""bad \n escape""#).is_none());
    }
}
