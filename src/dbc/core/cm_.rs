use crate::dbc::core::{lex, strings};

/// What a `CM_` statement attaches to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CommentTarget {
    Network,
    Node(String),
    Message(u32),
    Signal(u32, String),
    EnvVar(String),
}

/// Parse a `CM_ [BU_ <node>|BO_ <id>|SG_ <id> <signal>|EV_ <env>] "<text>" ;`
/// statement. With no target prefix the comment belongs to the network.
pub(crate) fn parse(stmt: &str) -> Option<(CommentTarget, String)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("CM_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest: &str = rest.trim_start();

    let (target, rest) = if rest.starts_with('"') {
        (CommentTarget::Network, rest)
    } else {
        let (kw, tail) = rest.split_once(char::is_whitespace)?;
        let tail: &str = tail.trim_start();
        match kw {
            "BU_" => {
                let (node, t) = tail.split_once(char::is_whitespace)?;
                if !lex::is_identifier(node) {
                    return None;
                }
                (CommentTarget::Node(node.to_string()), t.trim_start())
            }
            "BO_" => {
                let (id, t) = tail.split_once(char::is_whitespace)?;
                (CommentTarget::Message(id.parse().ok()?), t.trim_start())
            }
            "SG_" => {
                let (id, t) = tail.split_once(char::is_whitespace)?;
                let t: &str = t.trim_start();
                let (signal, t) = t.split_once(char::is_whitespace)?;
                if !lex::is_identifier(signal) {
                    return None;
                }
                (
                    CommentTarget::Signal(id.parse().ok()?, signal.to_string()),
                    t.trim_start(),
                )
            }
            "EV_" => {
                let (env, t) = tail.split_once(char::is_whitespace)?;
                if !lex::is_identifier(env) {
                    return None;
                }
                (CommentTarget::EnvVar(env.to_string()), t.trim_start())
            }
            _ => return None,
        }
    };

    let (text, tail) = lex::take_quoted(rest)?;
    if !tail.trim().is_empty() {
        return None;
    }
    Some((target, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_comment() {
        let (target, text) = parse(r#"CM_ "Powertrain network";"#).unwrap();
        assert_eq!(target, CommentTarget::Network);
        assert_eq!(text, "Powertrain network");
    }

    #[test]
    fn test_signal_comment() {
        let (target, text) = parse(r#"CM_ SG_ 100 EngineSpeed "Crank speed" ;"#).unwrap();
        assert_eq!(target, CommentTarget::Signal(100, "EngineSpeed".to_string()));
        assert_eq!(text, "Crank speed");
    }

    #[test]
    fn test_multiline_text() {
        let (target, text) = parse("CM_ BU_ ECU1 \"first line\nsecond line\";").unwrap();
        assert_eq!(target, CommentTarget::Node("ECU1".to_string()));
        assert_eq!(text, "first line\nsecond line");
    }

    #[test]
    fn test_env_var_comment() {
        let (target, _) = parse(r#"CM_ EV_ EngTempSim "simulated" ;"#).unwrap();
        assert_eq!(target, CommentTarget::EnvVar("EngTempSim".to_string()));
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"CM_ "no terminator""#).is_none());
        assert!(parse(r#"CM_ SG_ 100 "missing signal name";"#).is_none());
        assert!(parse(r#"CM_ XX_ 1 "bad prefix";"#).is_none());
        assert!(parse(r#"CM_ BO_ 100 "text" junk;"#).is_none());
    }
}
