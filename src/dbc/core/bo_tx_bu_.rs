use crate::dbc::core::{lex, strings};

/// Parse a `BO_TX_BU_ <id> : n1,n2,… ;` statement assigning transmit-capable
/// nodes to a message.
pub(crate) fn parse(stmt: &str) -> Option<(u32, Vec<String>)> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("BO_TX_BU_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (id_part, nodes_part) = rest.split_once(':')?;
    let id: u32 = id_part.trim().parse().ok()?;

    let mut nodes: Vec<String> = Vec::new();
    for tok in nodes_part.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !lex::is_identifier(tok) {
            return None;
        }
        nodes.push(tok.to_string());
    }
    Some((id, nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let (id, nodes) = parse("BO_TX_BU_ 123 : NodeA,NodeB;").unwrap();
        assert_eq!(id, 123);
        assert_eq!(nodes, vec!["NodeA", "NodeB"]);
    }

    #[test]
    fn test_spaced_list() {
        let (_, nodes) = parse("BO_TX_BU_ 5 : A , B ;").unwrap();
        assert_eq!(nodes, vec!["A", "B"]);
    }

    #[test]
    fn test_reject() {
        assert!(parse("BO_TX_BU_ x : A;").is_none());
        assert!(parse("BO_TX_BU_ 5 A,B;").is_none());
        assert!(parse("BO_TX_BU_ 5 : A B;").is_none()); // not comma-separated
    }
}
