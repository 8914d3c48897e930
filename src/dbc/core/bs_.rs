use crate::dbc::types::database::BitTiming;

/// Parse a `BS_: [<baudrate> : <btr1>,<btr2>]` statement.
/// The degenerate `BS_:` is the common modern form; missing fields yield
/// zeros.
pub(crate) fn parse(stmt: &str) -> Option<BitTiming> {
    let rest: &str = stmt.trim().strip_prefix("BS_")?.trim_start();
    let rest: &str = rest.strip_prefix(':')?.trim();
    if rest.is_empty() {
        return Some(BitTiming::default());
    }

    let (baud, timing) = match rest.split_once(':') {
        Some((b, t)) => (b, Some(t)),
        None => (rest, None),
    };
    let baudrate: u32 = baud.trim().parse().ok()?;

    let (btr1, btr2) = match timing {
        Some(t) => {
            let (b1, b2) = t.split_once(',')?;
            (b1.trim().parse().ok()?, b2.trim().parse().ok()?)
        }
        None => (0, 0),
    };

    Some(BitTiming {
        baudrate,
        btr1,
        btr2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate() {
        assert_eq!(parse("BS_:"), Some(BitTiming::default()));
    }

    #[test]
    fn test_full_form() {
        assert_eq!(
            parse("BS_: 500000 : 12,34"),
            Some(BitTiming {
                baudrate: 500000,
                btr1: 12,
                btr2: 34,
            })
        );
    }

    #[test]
    fn test_baudrate_only() {
        assert_eq!(
            parse("BS_: 250000"),
            Some(BitTiming {
                baudrate: 250000,
                btr1: 0,
                btr2: 0,
            })
        );
    }

    #[test]
    fn test_reject() {
        assert!(parse("BS_ 500000").is_none());
        assert!(parse("BS_: x : 1,2").is_none());
    }
}
