use crate::dbc::core::{lex, strings, val_table_};
use std::collections::BTreeMap;

/// What a `VAL_` statement attaches its labels to. The one-identifier form
/// names an environment variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ValTarget {
    Signal(u32, String),
    EnvVar(String),
}

/// Parse a `VAL_ (<id> <signal>|<envvar>) (<value> "<label>")* ;` statement
/// attaching inline value labels.
pub(crate) fn parse(stmt: &str) -> Option<(ValTarget, BTreeMap<i64, String>)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("VAL_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest: &str = rest.trim_start();

    let cut: usize = rest
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let (first, rest) = rest.split_at(cut);

    let (target, rest) = if let Ok(id) = first.parse::<u32>() {
        let rest: &str = rest.trim_start();
        let cut: usize = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '"')
            .unwrap_or(rest.len());
        let (signal, rest) = rest.split_at(cut);
        if !lex::is_identifier(signal) {
            return None;
        }
        (ValTarget::Signal(id, signal.to_string()), rest)
    } else {
        if !lex::is_identifier(first) {
            return None;
        }
        (ValTarget::EnvVar(first.to_string()), rest)
    };

    let entries: BTreeMap<i64, String> = val_table_::parse_value_pairs(rest)?;
    Some((target, entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_target() {
        let (target, entries) =
            parse(r#"VAL_ 200 Mode 0 "Normal" 1 "Sport" 2 "Eco" 3 "Winter";"#).unwrap();
        assert_eq!(target, ValTarget::Signal(200, "Mode".to_string()));
        assert_eq!(entries.get(&1).map(String::as_str), Some("Sport"));
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_env_var_target() {
        let (target, entries) = parse(r#"VAL_ EngTempSim 0 "off" 1 "on";"#).unwrap();
        assert_eq!(target, ValTarget::EnvVar("EngTempSim".to_string()));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"VAL_ 200 0 "missing signal";"#).is_none());
        assert!(parse(r#"VAL_ 200 Mode 0 "dup" 0 "dup";"#).is_none());
        assert!(parse(r#"VAL_ 200 Mode 0 "no end""#).is_none());
    }
}
