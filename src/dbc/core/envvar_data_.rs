use crate::dbc::core::{lex, strings};

/// Parse an `ENVVAR_DATA_ <name> : <data_size> ;` statement.
pub(crate) fn parse(stmt: &str) -> Option<(String, u32)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("ENVVAR_DATA_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (name_part, size_part) = rest.split_once(':')?;
    let name: &str = name_part.trim();
    if !lex::is_identifier(name) {
        return None;
    }
    let size: u32 = size_part.trim().parse().ok()?;
    Some((name.to_string(), size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("ENVVAR_DATA_ RestartData : 10;").unwrap(),
            ("RestartData".to_string(), 10)
        );
    }

    #[test]
    fn test_reject() {
        assert!(parse("ENVVAR_DATA_ RestartData 10;").is_none());
        assert!(parse("ENVVAR_DATA_ 5bad : 10;").is_none());
        assert!(parse("ENVVAR_DATA_ X : ten;").is_none());
    }
}
