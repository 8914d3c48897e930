use crate::dbc::types::errors::DatabaseError;

/// Attribute value kinds as declared by `BA_DEF_` lines in DBC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttrType {
    #[default]
    String,
    Int,
    Hex,
    Float,
    Enum,
}

impl AttrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::String => "STRING",
            AttrType::Int => "INT",
            AttrType::Hex => "HEX",
            AttrType::Float => "FLOAT",
            AttrType::Enum => "ENUM",
        }
    }
}

/// Object scope an attribute definition applies to.
///
/// Network-level definitions (`BA_DEF_` with no object prefix) use `Database`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttrObject {
    #[default]
    Database,
    Node,
    Message,
    Signal,
    EnvVar,
}

impl AttrObject {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrObject::Database => "network",
            AttrObject::Node => "BU_",
            AttrObject::Message => "BO_",
            AttrObject::Signal => "SG_",
            AttrObject::EnvVar => "EV_",
        }
    }
}

/// Attribute definition (declared by `BA_DEF_`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDef {
    /// Attribute name.
    pub name: String,
    /// Object scope this definition applies to.
    pub object: AttrObject,
    /// Attribute kind.
    pub kind: AttrType,
    // optional bounds for numeric kinds
    pub int_min: Option<i64>,
    pub int_max: Option<i64>,
    pub hex_min: Option<u64>,
    pub hex_max: Option<u64>,
    pub float_min: Option<f64>,
    pub float_max: Option<f64>,
    // ordered labels for Enum kind
    pub enum_values: Vec<String>,
}

/// A raw literal as it appears after the attribute name in `BA_` or
/// `BA_DEF_DEF_`, before it is checked against the declared kind.
///
/// Integer literals never come back as `Float`: the number recognizer tries
/// the integer alternative first.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrLiteral {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Concrete attribute value stored on DB/Node/Message/Signal/EnvVar entities.
///
/// Enum values carry the integer index into the definition's `enum_values`.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Hex(u64), // stored as a number, display formatting is up to the caller
    Float(f64),
    Enum(i64),
}

/// Attribute specification pairing a definition and an optional default.
///
/// - `def` comes from `BA_DEF_`
/// - `default` comes from `BA_DEF_DEF_`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSpec {
    pub def: Option<AttributeDef>,
    pub default: Option<AttributeValue>,
}

impl AttributeDef {
    /// Check a raw literal against this definition and produce the typed value.
    ///
    /// INT and HEX require an integral literal (a float where an integer kind
    /// is declared is a type mismatch, not a rounding opportunity). Enum
    /// values are accepted as an index or as one of the declared labels and
    /// are stored as the index either way.
    pub fn coerce(&self, literal: &AttrLiteral) -> Result<AttributeValue, DatabaseError> {
        let mismatch = || DatabaseError::AttributeTypeMismatch {
            name: self.name.clone(),
            expected: self.kind.as_str(),
        };
        match self.kind {
            AttrType::String => match literal {
                AttrLiteral::Str(s) => Ok(AttributeValue::Str(s.clone())),
                _ => Err(mismatch()),
            },
            AttrType::Int => match literal {
                AttrLiteral::Int(v) => {
                    self.check_int_bounds(*v, self.int_min, self.int_max)?;
                    Ok(AttributeValue::Int(*v))
                }
                _ => Err(mismatch()),
            },
            AttrType::Hex => match literal {
                AttrLiteral::Int(v) if *v >= 0 => {
                    let v = *v as u64;
                    if let Some(lo) = self.hex_min
                        && v < lo
                    {
                        return Err(self.out_of_bounds(v.to_string()));
                    }
                    if let Some(hi) = self.hex_max
                        && v > hi
                    {
                        return Err(self.out_of_bounds(v.to_string()));
                    }
                    Ok(AttributeValue::Hex(v))
                }
                _ => Err(mismatch()),
            },
            AttrType::Float => {
                // an integral literal is a legal float value
                let v: f64 = match literal {
                    AttrLiteral::Float(v) => *v,
                    AttrLiteral::Int(v) => *v as f64,
                    AttrLiteral::Str(_) => return Err(mismatch()),
                };
                if let Some(lo) = self.float_min
                    && v < lo
                {
                    return Err(self.out_of_bounds(v.to_string()));
                }
                if let Some(hi) = self.float_max
                    && v > hi
                {
                    return Err(self.out_of_bounds(v.to_string()));
                }
                Ok(AttributeValue::Float(v))
            }
            AttrType::Enum => {
                let index: i64 = match literal {
                    AttrLiteral::Int(v) => *v,
                    AttrLiteral::Str(label) => {
                        match self.enum_values.iter().position(|l| l == label) {
                            Some(i) => i as i64,
                            None => {
                                return Err(DatabaseError::EnumLabelUnknown {
                                    name: self.name.clone(),
                                    label: label.clone(),
                                });
                            }
                        }
                    }
                    AttrLiteral::Float(_) => return Err(mismatch()),
                };
                if index < 0 || index as usize >= self.enum_values.len() {
                    return Err(DatabaseError::EnumIndexOutOfRange {
                        name: self.name.clone(),
                        index,
                        len: self.enum_values.len(),
                    });
                }
                Ok(AttributeValue::Enum(index))
            }
        }
    }

    fn check_int_bounds(
        &self,
        v: i64,
        lo: Option<i64>,
        hi: Option<i64>,
    ) -> Result<(), DatabaseError> {
        if let Some(lo) = lo
            && v < lo
        {
            return Err(self.out_of_bounds(v.to_string()));
        }
        if let Some(hi) = hi
            && v > hi
        {
            return Err(self.out_of_bounds(v.to_string()));
        }
        Ok(())
    }

    fn out_of_bounds(&self, value: String) -> DatabaseError {
        DatabaseError::AttributeOutOfBounds {
            name: self.name.clone(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_def(lo: i64, hi: i64) -> AttributeDef {
        AttributeDef {
            name: "GenMsgCycleTime".to_string(),
            object: AttrObject::Message,
            kind: AttrType::Int,
            int_min: Some(lo),
            int_max: Some(hi),
            ..Default::default()
        }
    }

    #[test]
    fn test_int_bounds() {
        let def = int_def(0, 10000);
        assert_eq!(
            def.coerce(&AttrLiteral::Int(250)).unwrap(),
            AttributeValue::Int(250)
        );
        assert!(def.coerce(&AttrLiteral::Int(20000)).is_err());
    }

    #[test]
    fn test_int_rejects_float_literal() {
        let def = int_def(0, 100);
        assert!(def.coerce(&AttrLiteral::Float(2.5)).is_err());
    }

    #[test]
    fn test_enum_by_label_and_index() {
        let def = AttributeDef {
            name: "BusType".to_string(),
            kind: AttrType::Enum,
            enum_values: vec!["CAN".to_string(), "CAN FD".to_string()],
            ..Default::default()
        };
        assert_eq!(
            def.coerce(&AttrLiteral::Str("CAN FD".to_string())).unwrap(),
            AttributeValue::Enum(1)
        );
        assert_eq!(
            def.coerce(&AttrLiteral::Int(0)).unwrap(),
            AttributeValue::Enum(0)
        );
        assert!(def.coerce(&AttrLiteral::Int(2)).is_err());
        assert!(def.coerce(&AttrLiteral::Str("LIN".to_string())).is_err());
    }
}
