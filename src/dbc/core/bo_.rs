use crate::dbc::core::lex;

/// Typed result of a `BO_` header line; the orchestrator pairs it with the
/// `SG_` lines that follow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MessageHeader {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) byte_length: u16,
    pub(crate) sender: String,
}

/// Parse a `BO_ <id> <name>: <length> <sender>` header.
pub(crate) fn parse(stmt: &str) -> Option<MessageHeader> {
    let rest: &str = stmt.trim().strip_prefix("BO_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (left, right) = rest.split_once(':')?;

    let mut left_it = left.split_ascii_whitespace();
    let id: u32 = left_it.next()?.parse().ok()?;
    let name: &str = left_it.next()?;
    if !lex::is_identifier(name) || left_it.next().is_some() {
        return None;
    }

    let mut right_it = right.split_ascii_whitespace();
    let byte_length: u16 = right_it.next()?.parse().ok()?;
    let sender: &str = right_it.next()?;
    if !lex::is_identifier(sender) || right_it.next().is_some() {
        return None;
    }

    Some(MessageHeader {
        id,
        name: name.to_string(),
        byte_length,
        sender: sender.to_string(),
    })
}
