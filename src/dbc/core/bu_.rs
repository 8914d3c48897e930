use crate::dbc::core::lex;

/// Parse the `BU_:` line listing node names. An empty list is legal.
/// Example: `BU_: ECU1 ECU2 ECU3`
pub(crate) fn parse(stmt: &str) -> Option<Vec<String>> {
    let rest: &str = stmt.trim().strip_prefix("BU_")?.trim_start();
    let rest: &str = rest.strip_prefix(':')?;

    let mut nodes: Vec<String> = Vec::new();
    for tok in rest.split_ascii_whitespace() {
        if !lex::is_identifier(tok) {
            return None;
        }
        nodes.push(tok.to_string());
    }
    Some(nodes)
}
