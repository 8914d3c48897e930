use crate::dbc::core::{ba_def_def_, lex, strings};
use crate::dbc::types::attributes::AttrLiteral;

/// Target entity of a `BA_` assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AttrTarget {
    Network,
    Node(String),
    Message(u32),
    Signal(u32, String),
    EnvVar(String),
}

/// Parse a `BA_ "<name>" [BU_ <node>|BO_ <id>|SG_ <id> <signal>|EV_ <env>]
/// <value> ;` statement. With no object prefix the value applies to the
/// network.
pub(crate) fn parse(stmt: &str) -> Option<(String, AttrTarget, AttrLiteral)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("BA_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (name, rest) = lex::take_quoted(rest.trim_start())?;
    if name.is_empty() {
        return None;
    }
    let rest: &str = rest.trim_start();

    let first: &str = rest.split_whitespace().next().unwrap_or("");
    let (target, rest) = match first {
        "BU_" => {
            let tail: &str = rest["BU_".len()..].trim_start();
            let (node, t) = tail.split_once(char::is_whitespace)?;
            if !lex::is_identifier(node) {
                return None;
            }
            (AttrTarget::Node(node.to_string()), t)
        }
        "BO_" => {
            let tail: &str = rest["BO_".len()..].trim_start();
            let (id, t) = tail.split_once(char::is_whitespace)?;
            (AttrTarget::Message(id.parse().ok()?), t)
        }
        "SG_" => {
            let tail: &str = rest["SG_".len()..].trim_start();
            let (id, t) = tail.split_once(char::is_whitespace)?;
            let t: &str = t.trim_start();
            let (signal, t) = t.split_once(char::is_whitespace)?;
            if !lex::is_identifier(signal) {
                return None;
            }
            (AttrTarget::Signal(id.parse().ok()?, signal.to_string()), t)
        }
        "EV_" => {
            let tail: &str = rest["EV_".len()..].trim_start();
            let (env, t) = tail.split_once(char::is_whitespace)?;
            if !lex::is_identifier(env) {
                return None;
            }
            (AttrTarget::EnvVar(env.to_string()), t)
        }
        _ => (AttrTarget::Network, rest),
    };

    let literal: AttrLiteral = ba_def_def_::parse_literal(rest.trim_start())?;
    Some((name, target, literal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_target() {
        let (name, target, literal) = parse(r#"BA_ "GenMsgCycleTime" BO_ 100 250;"#).unwrap();
        assert_eq!(name, "GenMsgCycleTime");
        assert_eq!(target, AttrTarget::Message(100));
        assert_eq!(literal, AttrLiteral::Int(250));
    }

    #[test]
    fn test_network_target() {
        let (name, target, literal) = parse(r#"BA_ "DBName" "Powertrain";"#).unwrap();
        assert_eq!(name, "DBName");
        assert_eq!(target, AttrTarget::Network);
        assert_eq!(literal, AttrLiteral::Str("Powertrain".to_string()));
    }

    #[test]
    fn test_signal_target() {
        let (_, target, literal) = parse(r#"BA_ "GenSigStartValue" SG_ 100 EngineSpeed 0.5;"#)
            .unwrap();
        assert_eq!(target, AttrTarget::Signal(100, "EngineSpeed".to_string()));
        assert_eq!(literal, AttrLiteral::Float(0.5));
    }

    #[test]
    fn test_node_and_env_targets() {
        let (_, target, _) = parse(r#"BA_ "NmNode" BU_ Gateway 1;"#).unwrap();
        assert_eq!(target, AttrTarget::Node("Gateway".to_string()));

        let (_, target, _) = parse(r#"BA_ "EvInit" EV_ EngTempSim 7;"#).unwrap();
        assert_eq!(target, AttrTarget::EnvVar("EngTempSim".to_string()));
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"BA_ "X" BO_ 100;"#).is_none()); // id but no value
        assert!(parse(r#"BA_ "X" BO_ abc 1;"#).is_none());
        assert!(parse(r#"BA_ "X" 1 2;"#).is_none()); // two values
        assert!(parse(r#"BA_ "X" 1"#).is_none()); // missing ;
    }
}
