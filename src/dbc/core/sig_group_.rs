use crate::dbc::core::{lex, strings};
use crate::dbc::types::message::SignalGroupDBC;

/// Parse a `SIG_GROUP_ <id> <name> <repetitions> : s1,s2,… ;` statement.
/// At least one signal name is required.
pub(crate) fn parse(stmt: &str) -> Option<SignalGroupDBC> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("SIG_GROUP_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (left, right) = rest.split_once(':')?;

    let mut left_it = left.split_ascii_whitespace();
    let message_id: u32 = left_it.next()?.parse().ok()?;
    let name: &str = left_it.next()?;
    if !lex::is_identifier(name) {
        return None;
    }
    let repetitions: u32 = left_it.next()?.parse().ok()?;
    if left_it.next().is_some() {
        return None;
    }

    let mut signal_names: Vec<String> = Vec::new();
    for tok in right.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !lex::is_identifier(tok) {
            return None;
        }
        signal_names.push(tok.to_string());
    }
    if signal_names.is_empty() {
        return None;
    }

    Some(SignalGroupDBC {
        message_id,
        name: name.to_string(),
        repetitions,
        signal_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let g = parse("SIG_GROUP_ 200 TransData 1 : Mode,InfoA,InfoB;").unwrap();
        assert_eq!(g.message_id, 200);
        assert_eq!(g.name, "TransData");
        assert_eq!(g.repetitions, 1);
        assert_eq!(g.signal_names, vec!["Mode", "InfoA", "InfoB"]);
    }

    #[test]
    fn test_reject_empty_list() {
        assert!(parse("SIG_GROUP_ 200 TransData 1 : ;").is_none());
        assert!(parse("SIG_GROUP_ 200 TransData 1 Mode;").is_none());
    }
}
