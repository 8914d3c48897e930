use crate::dbc::core::{lex, strings};
use crate::dbc::types::env_var::{EnvVarDBC, EnvVarType};

/// Parse an `EV_ <name> <0|1|2> [<min> <max>] "<unit>" <initial> <ev_id>
/// <access_type> <node>(,<node>)* ;` statement.
///
/// Some exporters write a `:` after the name and separate the range bounds
/// with `|`; both spellings are accepted.
pub(crate) fn parse(stmt: &str) -> Option<EnvVarDBC> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("EV_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest: &str = rest.trim_start();

    let (name_tok, rest) = rest.split_once(char::is_whitespace)?;
    let name: &str = name_tok.trim_end_matches(':');
    if !lex::is_identifier(name) {
        return None;
    }

    let rest: &str = rest.trim_start();
    let (type_tok, rest) = rest.split_once(char::is_whitespace)?;
    let var_type: EnvVarType = EnvVarType::from_token(type_tok.parse().ok()?)?;

    let rest: &str = rest.trim_start().strip_prefix('[')?;
    let (range, rest) = rest.split_once(']')?;
    let mut bounds = range
        .split(|c: char| c == '|' || c.is_ascii_whitespace())
        .filter(|t| !t.is_empty());
    let min: f64 = bounds.next()?.parse().ok()?;
    let max: f64 = bounds.next()?.parse().ok()?;
    if bounds.next().is_some() {
        return None;
    }

    let (unit, rest) = lex::take_quoted(rest.trim_start())?;

    let mut it = rest.split_ascii_whitespace();
    let initial_value: f64 = it.next()?.parse().ok()?;
    let ev_id: u32 = it.next()?.parse().ok()?;
    let access_type: &str = it.next()?;
    if !lex::is_identifier(access_type) {
        return None;
    }

    let mut access_nodes: Vec<String> = Vec::new();
    for part in it {
        for tok in part.split(',').filter(|t| !t.is_empty()) {
            if !lex::is_identifier(tok) {
                return None;
            }
            access_nodes.push(tok.to_string());
        }
    }

    Some(EnvVarDBC {
        name: name.to_string(),
        var_type,
        min,
        max,
        unit,
        initial_value,
        ev_id,
        access_type: access_type.to_string(),
        access_nodes,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let ev = parse(r#"EV_ EngTempSim 0 [0 150] "degC" 20 1 DUMMY_NODE_VECTOR0 ECU1,ECU2;"#)
            .unwrap();
        assert_eq!(ev.name, "EngTempSim");
        assert_eq!(ev.var_type, EnvVarType::Integer);
        assert_eq!(ev.min, 0.0);
        assert_eq!(ev.max, 150.0);
        assert_eq!(ev.unit, "degC");
        assert_eq!(ev.initial_value, 20.0);
        assert_eq!(ev.ev_id, 1);
        assert_eq!(ev.access_type, "DUMMY_NODE_VECTOR0");
        assert_eq!(ev.access_nodes, vec!["ECU1", "ECU2"]);
    }

    #[test]
    fn test_colon_and_pipe_spelling() {
        let ev = parse(r#"EV_ FanSim: 1 [0|100] "%" 0 4 DUMMY_NODE_VECTOR0 Vector__XXX;"#)
            .unwrap();
        assert_eq!(ev.name, "FanSim");
        assert_eq!(ev.var_type, EnvVarType::Float);
        assert_eq!(ev.max, 100.0);
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"EV_ X 7 [0 1] "" 0 1 A B;"#).is_none()); // bad type token
        assert!(parse(r#"EV_ X 0 0 1 "" 0 1 A B;"#).is_none()); // missing range brackets
        assert!(parse(r#"EV_ X 0 [0 1 2] "" 0 1 A;"#).is_none()); // three bounds
        assert!(parse(r#"EV_ X 0 [0 1] "" 0 1 A"#).is_none()); // missing ;
    }
}
