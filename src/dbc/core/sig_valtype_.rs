use crate::dbc::core::{lex, strings};
use crate::dbc::types::signal::SignalExtendedValueType;

/// Parse a `SIG_VALTYPE_ <id> <signal> : <0|1|2> ;` statement overriding
/// how a signal's raw bits are interpreted.
pub(crate) fn parse(stmt: &str) -> Option<(u32, String, SignalExtendedValueType)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("SIG_VALTYPE_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (left, right) = rest.split_once(':')?;

    let mut left_it = left.split_ascii_whitespace();
    let message_id: u32 = left_it.next()?.parse().ok()?;
    let signal: &str = left_it.next()?;
    if !lex::is_identifier(signal) || left_it.next().is_some() {
        return None;
    }

    let mut right_it = right.split_ascii_whitespace();
    let tok: &str = right_it.next()?;
    if right_it.next().is_some() {
        return None;
    }
    let value_type: SignalExtendedValueType =
        SignalExtendedValueType::from_token(tok.parse().ok()?)?;

    Some((message_id, signal.to_string(), value_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("SIG_VALTYPE_ 100 CoolantFlow : 1;").unwrap(),
            (
                100,
                "CoolantFlow".to_string(),
                SignalExtendedValueType::Float32
            )
        );
    }

    #[test]
    fn test_reject() {
        assert!(parse("SIG_VALTYPE_ 100 CoolantFlow : 3;").is_none());
        assert!(parse("SIG_VALTYPE_ 100 : 1;").is_none());
    }
}
