/// Parse an `NS_ :` block. The orchestrator hands over the header line plus
/// all its indented continuation lines; each continuation line carries
/// whitespace-separated symbol tokens (usually one).
pub(crate) fn parse(block: &str) -> Option<Vec<String>> {
    let mut lines = block.lines();
    let header: &str = lines.next()?.trim();
    let rest: &str = header.strip_prefix("NS_")?.trim_start();
    let rest: &str = rest.strip_prefix(':')?;

    let mut symbols: Vec<String> = Vec::new();
    for tok in rest.split_ascii_whitespace() {
        symbols.push(tok.to_string());
    }
    for line in lines {
        for tok in line.split_ascii_whitespace() {
            symbols.push(tok.to_string());
        }
    }
    Some(symbols)
}
