use crate::dbc::core::lex;
use crate::dbc::types::{
    message::MuxRole,
    signal::{Endianness, SignalDBC, Signess},
};

/// Parse an `SG_` line belonging to the enclosing `BO_` message.
/// Format:
/// `SG_ <name> [M|m<k>] : <start>|<len>@<endian><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <recv>(,<recv>)*`
///
/// `@1` is Intel/little-endian, `@0` Motorola/big-endian; `+` unsigned,
/// `-` signed; `M` marks the multiplexer switch and `m<k>` a branch gated on
/// switch value `k`. The receiver list may be empty.
pub(crate) fn parse(stmt: &str) -> Option<SignalDBC> {
    let rest: &str = stmt.trim().strip_prefix("SG_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let (left, right) = rest.split_once(':')?;

    // left part: NAME [M|mX]
    let mut left_it = left.split_ascii_whitespace();
    let name: &str = left_it.next()?;
    if !lex::is_identifier(name) {
        return None;
    }
    let mux: MuxRole = match left_it.next() {
        None => MuxRole::None,
        Some("M") => MuxRole::Multiplexor,
        Some(tag) => MuxRole::Multiplexed(tag.strip_prefix('m')?.parse().ok()?),
    };
    if left_it.next().is_some() {
        return None;
    }

    // bit info: "63|1@1+"
    let right: &str = right.trim_start();
    let cut: usize = right
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(right.len());
    let (bit_info, rest) = right.split_at(cut);
    let (pos_len, es) = bit_info.split_once('@')?;
    let (start_s, len_s) = pos_len.split_once('|')?;
    let bit_start: u16 = start_s.parse().ok()?;
    let bit_length: u16 = len_s.parse().ok()?;
    let mut es_chars = es.chars();
    let endian: Endianness = match es_chars.next()? {
        '1' => Endianness::Intel,
        '0' => Endianness::Motorola,
        _ => return None,
    };
    let sign: Signess = match es_chars.next()? {
        '+' => Signess::Unsigned,
        '-' => Signess::Signed,
        _ => return None,
    };
    if es_chars.next().is_some() {
        return None;
    }

    // "(factor,offset)"
    let rest: &str = rest.trim_start().strip_prefix('(')?;
    let (inner, rest) = rest.split_once(')')?;
    let (f_s, o_s) = inner.split_once(',')?;
    let factor: f64 = f_s.trim().parse().ok()?;
    let offset: f64 = o_s.trim().parse().ok()?;
    if factor == 0.0 {
        return None;
    }

    // "[min|max]"
    let rest: &str = rest.trim_start().strip_prefix('[')?;
    let (inner, rest) = rest.split_once(']')?;
    let (mn_s, mx_s) = inner.split_once('|')?;
    let min: f64 = mn_s.trim().parse().ok()?;
    let max: f64 = mx_s.trim().parse().ok()?;

    // "unit"
    let (unit, rest) = lex::take_quoted(rest.trim_start())?;

    // receivers (comma-separated, possibly spaced, possibly absent)
    let mut receivers: Vec<String> = Vec::new();
    for part in rest.split(',') {
        for tok in part.split_ascii_whitespace() {
            if !lex::is_identifier(tok) {
                return None;
            }
            receivers.push(tok.to_string());
        }
    }

    Some(SignalDBC {
        name: name.to_string(),
        bit_start,
        bit_length,
        endian,
        sign,
        factor,
        offset,
        min,
        max,
        unit_of_measurement: unit,
        receivers,
        mux,
        ..Default::default()
    })
}
