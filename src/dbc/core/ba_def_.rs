use crate::dbc::core::{lex, strings};
use crate::dbc::types::attributes::{AttrObject, AttrType, AttributeDef};

/// Parse a `BA_DEF_ [BU_|BO_|SG_|EV_] "<name>" <kind> <params> ;` statement.
///
/// Kinds:
/// - `INT`/`HEX` carry two integer bounds
/// - `FLOAT` carries two float bounds
/// - `STRING` carries nothing
/// - `ENUM` carries one or more comma-separated quoted labels
///
/// Network-level definitions omit the object token.
pub(crate) fn parse(stmt: &str) -> Option<AttributeDef> {
    let body: &str = strings::strip_terminator(stmt.trim())?;
    let rest: &str = body.strip_prefix("BA_DEF_")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let rest: &str = rest.trim_start();

    let (object, rest) = if rest.starts_with('"') {
        (AttrObject::Database, rest)
    } else {
        let (kw, tail) = rest.split_once(char::is_whitespace)?;
        let object: AttrObject = match kw {
            "BU_" => AttrObject::Node,
            "BO_" => AttrObject::Message,
            "SG_" => AttrObject::Signal,
            "EV_" => AttrObject::EnvVar,
            _ => return None,
        };
        (object, tail.trim_start())
    };

    let (name, rest) = lex::take_quoted(rest)?;
    if name.is_empty() {
        return None;
    }
    let rest: &str = rest.trim_start();

    let cut: usize = rest
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let (kind_tok, params) = rest.split_at(cut);
    let params: &str = params.trim();

    let mut def: AttributeDef = AttributeDef {
        name,
        object,
        ..Default::default()
    };

    match kind_tok {
        "STRING" => {
            def.kind = AttrType::String;
            if !params.is_empty() {
                return None;
            }
        }
        "INT" => {
            def.kind = AttrType::Int;
            let (lo, hi) = two_tokens(params)?;
            def.int_min = Some(lo.parse().ok()?);
            def.int_max = Some(hi.parse().ok()?);
        }
        "HEX" => {
            def.kind = AttrType::Hex;
            let (lo, hi) = two_tokens(params)?;
            def.hex_min = Some(lo.parse().ok()?);
            def.hex_max = Some(hi.parse().ok()?);
        }
        "FLOAT" => {
            def.kind = AttrType::Float;
            let (lo, hi) = two_tokens(params)?;
            def.float_min = Some(lo.parse().ok()?);
            def.float_max = Some(hi.parse().ok()?);
        }
        "ENUM" => {
            def.kind = AttrType::Enum;
            let mut rest: &str = params;
            loop {
                let (label, tail) = lex::take_quoted(rest)?;
                def.enum_values.push(label);
                let tail: &str = tail.trim_start();
                match tail.strip_prefix(',') {
                    Some(next) => rest = next.trim_start(),
                    None => {
                        if !tail.is_empty() {
                            return None;
                        }
                        break;
                    }
                }
            }
        }
        _ => return None,
    }

    Some(def)
}

fn two_tokens(s: &str) -> Option<(&str, &str)> {
    let mut it = s.split_ascii_whitespace();
    let a: &str = it.next()?;
    let b: &str = it.next()?;
    if it.next().is_some() {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_with_scope() {
        let def = parse(r#"BA_DEF_ BO_ "GenMsgCycleTime" INT 0 10000;"#).unwrap();
        assert_eq!(def.object, AttrObject::Message);
        assert_eq!(def.kind, AttrType::Int);
        assert_eq!(def.int_min, Some(0));
        assert_eq!(def.int_max, Some(10000));
    }

    #[test]
    fn test_network_string() {
        let def = parse(r#"BA_DEF_ "DBName" STRING ;"#).unwrap();
        assert_eq!(def.object, AttrObject::Database);
        assert_eq!(def.kind, AttrType::String);
    }

    #[test]
    fn test_hex_and_float() {
        let def = parse(r#"BA_DEF_ "NmBaseAddress" HEX 0 536870911;"#).unwrap();
        assert_eq!(def.hex_max, Some(536870911));

        let def = parse(r#"BA_DEF_ SG_ "GenSigStartValue" FLOAT -1e9 1e9;"#).unwrap();
        assert_eq!(def.kind, AttrType::Float);
        assert_eq!(def.float_min, Some(-1e9));
    }

    #[test]
    fn test_enum_labels() {
        let def = parse(r#"BA_DEF_ BO_ "GenMsgSendType" ENUM "Cyclic","Spontaneous","IfActive";"#)
            .unwrap();
        assert_eq!(def.kind, AttrType::Enum);
        assert_eq!(def.enum_values, vec!["Cyclic", "Spontaneous", "IfActive"]);
    }

    #[test]
    fn test_reject() {
        assert!(parse(r#"BA_DEF_ "X" INT 0;"#).is_none()); // one bound
        assert!(parse(r#"BA_DEF_ "X" ENUM;"#).is_none()); // no labels
        assert!(parse(r#"BA_DEF_ "X" BLOB 0 1;"#).is_none()); // unknown kind
        assert!(parse(r#"BA_DEF_ ZZ_ "X" INT 0 1;"#).is_none()); // bad scope
        assert!(parse(r#"BA_DEF_ "X" STRING"#).is_none()); // missing ;
    }
}
