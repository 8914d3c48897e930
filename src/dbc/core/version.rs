use crate::dbc::core::lex;

/// Parse a `VERSION "<text>"` statement. The text is unescaped.
pub(crate) fn parse(stmt: &str) -> Option<String> {
    let rest: &str = stmt.trim().strip_prefix("VERSION")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (text, tail) = lex::take_quoted(rest.trim_start())?;
    if !tail.trim().is_empty() {
        return None;
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse(r#"VERSION "1.0.2""#).as_deref(), Some("1.0.2"));
        assert_eq!(parse(r#"VERSION """#).as_deref(), Some(""));
        assert_eq!(parse(r#"VERSION "a \"b\"""#).as_deref(), Some(r#"a "b""#));
    }

    #[test]
    fn test_reject() {
        assert!(parse("VERSION 1.0").is_none());
        assert!(parse(r#"VERSION "1.0" junk"#).is_none());
        assert!(parse(r#"VERSIONX "1.0""#).is_none());
        assert!(parse(r#"VERSION "unterminated"#).is_none());
    }
}
