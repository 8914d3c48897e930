//! File-level orchestrator: splits a DBC document into statements, applies
//! the per-section parsers and folds the records into a [`DatabaseDBC`].
//!
//! Parsing is recoverable: a malformed statement becomes an error
//! [`Diagnostic`] and the scan continues at the next statement; annotations
//! whose target does not exist are dropped with a warning. Only an input
//! with no usable declarations (or a malformed `VERSION`) fails as a whole.

use crate::dbc::core;
use crate::dbc::core::{ba_::AttrTarget, cm_::CommentTarget, strings, val_::ValTarget};
use crate::dbc::types::{
    attributes::AttrObject,
    database::DatabaseDBC,
    diag::Diagnostic,
    errors::DbcParseError,
    message::MuxRole,
    node::VECTOR_XXX,
};

use std::fs::File;
use std::io::{BufReader, Read};

use encoding_rs::WINDOWS_1252;

/// A parsed database together with the diagnostics gathered while building
/// it. Warnings and errors share the channel and are distinguished by
/// severity; recoverable errors do not prevent a database from being
/// returned.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub db: DatabaseDBC,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a DBC file from disk and returns the populated database.
///
/// The raw bytes are decoded as Windows-1252 (DBC files exported by the
/// usual tooling are not UTF-8). See [`from_str`] for the parsing rules.
///
/// # Errors
/// - the path does not end in `.dbc`
/// - the file cannot be opened or read
/// - the content has no recognizable declarations
pub fn from_file(path: &str) -> Result<ParseOutput, DbcParseError> {
    if !path.ends_with(".dbc") {
        return Err(DbcParseError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|e| DbcParseError::OpenFile {
        path: path.to_string(),
        source: e,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DbcParseError::Read {
            path: path.to_string(),
            source: e,
        })?;

    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    from_str(&text)
}

/// Parses DBC text into a [`DatabaseDBC`].
///
/// Statements are anchored on their leading section keyword; `;`-terminated
/// sections may span lines, the `NS_` block swallows its indented
/// continuation lines, everything else is line-bound. Unknown section
/// keywords are skipped with a warning.
pub fn from_str(text: &str) -> Result<ParseOutput, DbcParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let mut db: DatabaseDBC = DatabaseDBC::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut decl_count: usize = 0;
    let mut i: usize = 0;

    while i < lines.len() {
        let raw: &str = lines[i];
        let trimmed: &str = raw.trim_start();

        // skip comments and empty lines
        if trimmed.is_empty() || trimmed.starts_with("//") {
            i += 1;
            continue;
        }

        let line_no: usize = i + 1;
        let column: usize = raw.len() - trimmed.len() + 1;
        let first: &str = trimmed.split_ascii_whitespace().next().unwrap_or("");
        let key: &str = first.trim_end_matches(':');

        match key {
            "VERSION" => match core::version::parse(trimmed) {
                Some(v) => {
                    db.version = v;
                    decl_count += 1;
                }
                None => return Err(DbcParseError::MalformedVersion { line: line_no }),
            },
            "NS_" => {
                let stmt: String = gather_ns_block(&lines, &mut i);
                match core::ns_::parse(&stmt) {
                    Some(symbols) => db.new_symbols = symbols,
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed NS_ block".to_string(),
                    )),
                }
            }
            "BS_" => match core::bs_::parse(trimmed) {
                Some(bt) => db.bit_timing = Some(bt),
                None => diagnostics.push(Diagnostic::error(
                    line_no,
                    column,
                    trimmed,
                    "malformed BS_ statement".to_string(),
                )),
            },
            "BU_" => match core::bu_::parse(trimmed) {
                Some(names) => {
                    decl_count += 1;
                    for name in names {
                        if let Err(e) = db.add_node(&name) {
                            diagnostics.push(Diagnostic::error(
                                line_no,
                                column,
                                trimmed,
                                e.to_string(),
                            ));
                        }
                    }
                }
                None => diagnostics.push(Diagnostic::error(
                    line_no,
                    column,
                    trimmed,
                    "malformed BU_ statement".to_string(),
                )),
            },
            "BO_" => match core::bo_::parse(trimmed) {
                Some(h) => match db.add_message(h.id, &h.name, h.byte_length, &h.sender) {
                    Ok(_) => decl_count += 1,
                    Err(e) => {
                        // orphan the SG_ lines that follow a rejected header
                        db.current_msg = None;
                        diagnostics.push(Diagnostic::error(
                            line_no,
                            column,
                            trimmed,
                            e.to_string(),
                        ));
                    }
                },
                None => {
                    db.current_msg = None;
                    diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        trimmed,
                        "malformed BO_ statement".to_string(),
                    ));
                }
            },
            "SG_" => match core::sg_::parse(trimmed) {
                Some(sig) => match db.current_msg {
                    Some(msg_key) => {
                        let duplicate_mux: bool = matches!(sig.mux, MuxRole::Multiplexor)
                            && db
                                .get_message_by_key(msg_key)
                                .is_some_and(|m| m.multiplexor.is_some());
                        if duplicate_mux {
                            diagnostics.push(Diagnostic::warning(
                                line_no,
                                column,
                                trimmed,
                                "message already has a multiplexor signal".to_string(),
                            ));
                        }
                        match db.add_signal(msg_key, sig) {
                            Ok(()) => decl_count += 1,
                            Err(e) => diagnostics.push(Diagnostic::error(
                                line_no,
                                column,
                                trimmed,
                                e.to_string(),
                            )),
                        }
                    }
                    None => diagnostics.push(Diagnostic::warning(
                        line_no,
                        column,
                        trimmed,
                        "SG_ outside of a BO_ block, dropped".to_string(),
                    )),
                },
                None => diagnostics.push(Diagnostic::error(
                    line_no,
                    column,
                    trimmed,
                    "malformed SG_ statement".to_string(),
                )),
            },
            "BO_TX_BU_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::bo_tx_bu_::parse(&stmt) {
                    Some((id, nodes)) => match db.get_message_by_id_mut(id) {
                        Some(msg) => {
                            for node in nodes {
                                if !msg.transmitters.contains(&node) {
                                    msg.transmitters.push(node);
                                }
                            }
                        }
                        None => diagnostics.push(Diagnostic::warning(
                            line_no,
                            column,
                            &stmt,
                            format!("BO_TX_BU_ targets unknown message {id}, dropped"),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed BO_TX_BU_ statement".to_string(),
                    )),
                }
            }
            "CM_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::cm_::parse(&stmt) {
                    Some((target, text)) => {
                        attach_comment(&mut db, &mut diagnostics, line_no, column, &stmt, target, text)
                    }
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed CM_ statement".to_string(),
                    )),
                }
            }
            "VAL_TABLE_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::val_table_::parse(&stmt) {
                    Some(table) => match db.add_value_table(table) {
                        Ok(()) => decl_count += 1,
                        Err(e) => diagnostics.push(Diagnostic::error(
                            line_no,
                            column,
                            &stmt,
                            e.to_string(),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed VAL_TABLE_ statement".to_string(),
                    )),
                }
            }
            "VAL_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::val_::parse(&stmt) {
                    Some((target, entries)) => match target {
                        ValTarget::Signal(id, name) => match db.get_signal_mut(id, &name) {
                            Some(sig) => sig.value_table = entries,
                            None => diagnostics.push(Diagnostic::warning(
                                line_no,
                                column,
                                &stmt,
                                format!("VAL_ targets unknown signal {id} {name}, dropped"),
                            )),
                        },
                        ValTarget::EnvVar(name) => match db.get_env_var_mut(&name) {
                            Some(ev) => ev.value_table = entries,
                            None => diagnostics.push(Diagnostic::warning(
                                line_no,
                                column,
                                &stmt,
                                format!("VAL_ targets unknown environment variable {name}, dropped"),
                            )),
                        },
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed VAL_ statement".to_string(),
                    )),
                }
            }
            "BA_DEF_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::ba_def_::parse(&stmt) {
                    Some(def) => match db.define_attribute(def) {
                        Ok(()) => decl_count += 1,
                        Err(e) => diagnostics.push(Diagnostic::error(
                            line_no,
                            column,
                            &stmt,
                            e.to_string(),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed BA_DEF_ statement".to_string(),
                    )),
                }
            }
            "BA_DEF_DEF_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::ba_def_def_::parse(&stmt) {
                    Some((name, literal)) => {
                        if let Err(e) = db.set_attribute_default(&name, &literal) {
                            diagnostics.push(Diagnostic::error(
                                line_no,
                                column,
                                &stmt,
                                e.to_string(),
                            ));
                        }
                    }
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed BA_DEF_DEF_ statement".to_string(),
                    )),
                }
            }
            "BA_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::ba_::parse(&stmt) {
                    Some((name, target, literal)) => attach_attribute(
                        &mut db,
                        &mut diagnostics,
                        line_no,
                        column,
                        &stmt,
                        &name,
                        target,
                        &literal,
                    ),
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed BA_ statement".to_string(),
                    )),
                }
            }
            "EV_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::ev_::parse(&stmt) {
                    Some(ev) => match db.add_env_var(ev) {
                        Ok(()) => decl_count += 1,
                        Err(e) => diagnostics.push(Diagnostic::error(
                            line_no,
                            column,
                            &stmt,
                            e.to_string(),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed EV_ statement".to_string(),
                    )),
                }
            }
            "ENVVAR_DATA_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::envvar_data_::parse(&stmt) {
                    Some((name, size)) => match db.get_env_var_mut(&name) {
                        Some(ev) => ev.data_size = Some(size),
                        None => diagnostics.push(Diagnostic::warning(
                            line_no,
                            column,
                            &stmt,
                            format!("ENVVAR_DATA_ targets unknown environment variable {name}, dropped"),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed ENVVAR_DATA_ statement".to_string(),
                    )),
                }
            }
            "SIG_GROUP_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::sig_group_::parse(&stmt) {
                    Some(group) => match db.get_message_by_id(group.message_id) {
                        Some(msg) => {
                            let unknown: Vec<String> = group
                                .signal_names
                                .iter()
                                .filter(|n| msg.get_signal(n).is_none())
                                .cloned()
                                .collect();
                            for name in unknown {
                                diagnostics.push(Diagnostic::warning(
                                    line_no,
                                    column,
                                    &stmt,
                                    format!(
                                        "signal group '{}' names unknown signal {name}",
                                        group.name
                                    ),
                                ));
                            }
                            if let Some(msg) = db.get_message_by_id_mut(group.message_id) {
                                msg.signal_groups.push(group);
                            }
                        }
                        None => diagnostics.push(Diagnostic::warning(
                            line_no,
                            column,
                            &stmt,
                            format!(
                                "SIG_GROUP_ targets unknown message {}, dropped",
                                group.message_id
                            ),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed SIG_GROUP_ statement".to_string(),
                    )),
                }
            }
            "SIG_VALTYPE_" => {
                let stmt: String = gather_semicolon(&lines, &mut i);
                match core::sig_valtype_::parse(&stmt) {
                    Some((id, name, value_type)) => match db.get_signal_mut(id, &name) {
                        Some(sig) => sig.extended_value_type = value_type,
                        None => diagnostics.push(Diagnostic::warning(
                            line_no,
                            column,
                            &stmt,
                            format!("SIG_VALTYPE_ targets unknown signal {id} {name}, dropped"),
                        )),
                    },
                    None => diagnostics.push(Diagnostic::error(
                        line_no,
                        column,
                        &stmt,
                        "malformed SIG_VALTYPE_ statement".to_string(),
                    )),
                }
            }
            _ => diagnostics.push(Diagnostic::warning(
                line_no,
                column,
                trimmed,
                format!("unknown section keyword '{key}', skipped"),
            )),
        }

        i += 1;
    }

    validate_layout(&db, &mut diagnostics);

    db.current_msg = None;
    db.sort_db_nodes_by_name();
    db.sort_db_messages_by_name();

    if decl_count == 0 {
        return Err(DbcParseError::NoDeclarations);
    }
    Ok(ParseOutput { db, diagnostics })
}

/// Accumulate lines until the statement's unquoted `;` terminator shows up.
fn gather_semicolon(lines: &[&str], i: &mut usize) -> String {
    let mut stmt: String = lines[*i].to_string();
    while strings::find_unquoted_semicolon(&stmt).is_none() && *i + 1 < lines.len() {
        *i += 1;
        stmt.push('\n');
        stmt.push_str(lines[*i]);
    }
    stmt
}

/// Accumulate the `NS_` header plus its indented continuation lines.
fn gather_ns_block(lines: &[&str], i: &mut usize) -> String {
    let mut stmt: String = lines[*i].to_string();
    while *i + 1 < lines.len() {
        let next: &str = lines[*i + 1];
        if next.trim().is_empty() || !next.starts_with([' ', '\t']) {
            break;
        }
        *i += 1;
        stmt.push('\n');
        stmt.push_str(next);
    }
    stmt
}

fn attach_comment(
    db: &mut DatabaseDBC,
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    column: usize,
    stmt: &str,
    target: CommentTarget,
    text: String,
) {
    let missing: String = match target {
        CommentTarget::Network => {
            db.comment = text;
            return;
        }
        CommentTarget::Node(name) => match db.get_node_by_name_mut(&name) {
            Some(node) => {
                node.comment = text;
                return;
            }
            None => format!("CM_ targets unknown node {name}, dropped"),
        },
        CommentTarget::Message(id) => match db.get_message_by_id_mut(id) {
            Some(msg) => {
                msg.comment = text;
                return;
            }
            None => format!("CM_ targets unknown message {id}, dropped"),
        },
        CommentTarget::Signal(id, name) => match db.get_signal_mut(id, &name) {
            Some(sig) => {
                sig.comment = text;
                return;
            }
            None => format!("CM_ targets unknown signal {id} {name}, dropped"),
        },
        CommentTarget::EnvVar(name) => match db.get_env_var_mut(&name) {
            Some(ev) => {
                ev.comment = text;
                return;
            }
            None => format!("CM_ targets unknown environment variable {name}, dropped"),
        },
    };
    diagnostics.push(Diagnostic::warning(line_no, column, stmt, missing));
}

#[allow(clippy::too_many_arguments)]
fn attach_attribute(
    db: &mut DatabaseDBC,
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    column: usize,
    stmt: &str,
    name: &str,
    target: AttrTarget,
    literal: &crate::dbc::types::attributes::AttrLiteral,
) {
    if let AttrTarget::Network = target {
        if let Err(e) = db.set_network_attribute(name, literal) {
            diagnostics.push(Diagnostic::error(line_no, column, stmt, e.to_string()));
        }
        return;
    }

    let object: AttrObject = match target {
        AttrTarget::Network => AttrObject::Database,
        AttrTarget::Node(_) => AttrObject::Node,
        AttrTarget::Message(_) => AttrObject::Message,
        AttrTarget::Signal(..) => AttrObject::Signal,
        AttrTarget::EnvVar(_) => AttrObject::EnvVar,
    };
    let value = match db.coerce_scoped_attribute(object, name, literal) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(Diagnostic::error(line_no, column, stmt, e.to_string()));
            return;
        }
    };

    let attached: bool = match target {
        AttrTarget::Network => true,
        AttrTarget::Node(ref node) => match db.get_node_by_name_mut(node) {
            Some(n) => {
                n.attributes.insert(name.to_string(), value);
                true
            }
            None => false,
        },
        AttrTarget::Message(id) => match db.get_message_by_id_mut(id) {
            Some(m) => {
                m.attributes.insert(name.to_string(), value);
                true
            }
            None => false,
        },
        AttrTarget::Signal(id, ref signal) => match db.get_signal_mut(id, signal) {
            Some(s) => {
                s.attributes.insert(name.to_string(), value);
                true
            }
            None => false,
        },
        AttrTarget::EnvVar(ref env) => match db.get_env_var_mut(env) {
            Some(e) => {
                e.attributes.insert(name.to_string(), value);
                true
            }
            None => false,
        },
    };

    if !attached {
        diagnostics.push(Diagnostic::warning(
            line_no,
            column,
            stmt,
            format!("BA_ \"{name}\" targets a missing entity, dropped"),
        ));
    }
}

/// Post-parse structural pass: layout overflows, multiplex counting and
/// dangling receiver names are reported as warnings, never as parse
/// failures. They matter again at decode time.
fn validate_layout(db: &DatabaseDBC, diagnostics: &mut Vec<Diagnostic>) {
    for msg in db.iter_messages() {
        let mut mux_count: usize = 0;
        let mut has_multiplexed: bool = false;

        for sig in &msg.signals {
            if let Err(e) = core::message_layout::check_signal_fits(
                msg.byte_length,
                sig.bit_start,
                sig.bit_length,
                sig.endian,
            ) {
                diagnostics.push(Diagnostic::warning(
                    0,
                    0,
                    &format!("SG_ {} in BO_ {}", sig.name, msg.id),
                    e.to_string(),
                ));
            }
            match sig.mux {
                MuxRole::Multiplexor => mux_count += 1,
                MuxRole::Multiplexed(_) => has_multiplexed = true,
                MuxRole::None => {}
            }
            for receiver in &sig.receivers {
                if receiver != VECTOR_XXX && db.get_node_by_name(receiver).is_none() {
                    diagnostics.push(Diagnostic::warning(
                        0,
                        0,
                        &format!("SG_ {} in BO_ {}", sig.name, msg.id),
                        format!("receiver '{receiver}' is not a declared node"),
                    ));
                }
            }
        }

        if has_multiplexed && mux_count != 1 {
            diagnostics.push(Diagnostic::warning(
                0,
                0,
                &format!("BO_ {} {}", msg.id, msg.name),
                format!(
                    "message with multiplexed signals declares {mux_count} multiplexor signals"
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::attributes::AttributeValue;
    use crate::dbc::types::diag::Severity;
    use crate::dbc::types::signal::SignalExtendedValueType;

    const SAMPLE: &str = r#"VERSION "1.2"

NS_ :
    NS_DESC_
    CM_
    BA_DEF_

BS_:

BU_: Gateway Motor Dash

VAL_TABLE_ Gears 0 "Neutral" 1 "First" 2 "Second";

BO_ 100 EngineData: 8 Motor
 SG_ EngineSpeed : 0|16@1+ (0.1,0) [0|6500] "rpm" Dash
 SG_ Gear : 16|4@1+ (1,0) [0|8] "" Dash

BO_ 2364540158 EEC1: 8 Motor
 SG_ EngTorque : 0|8@1+ (1,-125) [-125|130] "%" Vector__XXX

BO_TX_BU_ 100 : Gateway,Motor;

EV_ EngTempSim 0 [0 150] "degC" 20 1 DUMMY_NODE_VECTOR0 Gateway;

ENVVAR_DATA_ EngTempSim : 4;

CM_ "Powertrain demo";
CM_ BU_ Motor "Engine controller";
CM_ BO_ 100 "Engine data
spanning two lines";
CM_ SG_ 100 EngineSpeed "Crank speed";
CM_ EV_ EngTempSim "Simulated temperature";

BA_DEF_ "DBName" STRING ;
BA_DEF_ BO_ "GenMsgCycleTime" INT 0 10000;
BA_DEF_ SG_ "GenSigStartValue" FLOAT 0 100000;
BA_DEF_ BU_ "NodeLayer" ENUM "Body","Chassis","Powertrain";
BA_DEF_DEF_ "GenMsgCycleTime" 100;
BA_DEF_DEF_ "DBName" "Demo";
BA_ "DBName" "Powertrain";
BA_ "GenMsgCycleTime" BO_ 100 250;
BA_ "GenSigStartValue" SG_ 100 EngineSpeed 600;
BA_ "NodeLayer" BU_ Motor "Powertrain";

VAL_ 100 Gear 0 "Neutral" 1 "First" 2 "Second";
VAL_ EngTempSim 0 "cold" 1 "hot";

SIG_GROUP_ 100 EngineGroup 1 : EngineSpeed,Gear;

SIG_VALTYPE_ 100 EngineSpeed : 0;
"#;

    #[test]
    fn test_full_sample_parses_clean() {
        let out = from_str(SAMPLE).unwrap();
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);

        let db = &out.db;
        assert_eq!(db.version, "1.2");
        assert_eq!(db.name, "Powertrain");
        assert_eq!(db.comment, "Powertrain demo");
        assert_eq!(db.new_symbols, vec!["NS_DESC_", "CM_", "BA_DEF_"]);
        assert!(db.bit_timing.is_some());
        assert_eq!(db.nodes.len(), 3);
        assert_eq!(db.messages.len(), 2);
        assert_eq!(db.value_tables.len(), 1);
        assert_eq!(db.env_vars.len(), 1);
    }

    #[test]
    fn test_annotations_reach_their_targets() {
        let db = from_str(SAMPLE).unwrap().db;

        assert_eq!(db.get_node_by_name("Motor").unwrap().comment, "Engine controller");
        let msg = db.get_message_by_id(100).unwrap();
        assert_eq!(msg.comment, "Engine data\nspanning two lines");
        assert_eq!(msg.transmitters, vec!["Gateway", "Motor"]);
        assert_eq!(msg.signal_groups.len(), 1);
        assert_eq!(msg.signal_groups[0].signal_names, vec!["EngineSpeed", "Gear"]);

        let speed = db.get_signal(100, "EngineSpeed").unwrap();
        assert_eq!(speed.comment, "Crank speed");
        assert_eq!(speed.extended_value_type, SignalExtendedValueType::Int);
        assert_eq!(
            speed.attributes.get("GenSigStartValue"),
            Some(&AttributeValue::Float(600.0))
        );

        let ev = db.get_env_var("EngTempSim").unwrap();
        assert_eq!(ev.comment, "Simulated temperature");
        assert_eq!(ev.data_size, Some(4));
        assert_eq!(ev.value_table.get(&1).map(String::as_str), Some("hot"));

        assert_eq!(db.signal_value_description(100, "Gear", 1), Some("First"));
        assert_eq!(
            db.node_attribute("Motor", "NodeLayer"),
            Some(&AttributeValue::Enum(2))
        );
    }

    #[test]
    fn test_attribute_default_fallback() {
        let db = from_str(SAMPLE).unwrap().db;
        // explicit on message 100, default for the untouched message
        assert_eq!(
            db.message_attribute(100, "GenMsgCycleTime"),
            Some(&AttributeValue::Int(250))
        );
        assert_eq!(
            db.message_attribute(2364540158, "GenMsgCycleTime"),
            Some(&AttributeValue::Int(100))
        );
    }

    #[test]
    fn test_extended_frame_id() {
        let db = from_str(SAMPLE).unwrap().db;
        let eec1 = db.get_message_by_id(2364540158).unwrap();
        assert_eq!(eec1.id_hex, "0xCF004FE");
        assert!(db.get_message_by_id_hex("0xCF004FE").is_some());
    }

    #[test]
    fn test_duplicate_message_id_is_recorded_and_skipped() {
        let text = "BU_: A\nBO_ 5 First: 8 A\nBO_ 5 Second: 8 A\n SG_ S : 0|8@1+ (1,0) [0|255] \"\" A\n";
        let out = from_str(text).unwrap();
        assert_eq!(out.db.messages.len(), 1);
        assert!(out.diagnostics.iter().any(|d| d.is_error()));
        // the SG_ after the rejected header must not leak into message 5
        assert!(out.db.get_signal(5, "S").is_none());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("SG_ outside")));
    }

    #[test]
    fn test_dangling_annotation_warns_without_mutation() {
        let text = "BU_: A\nBO_ 5 M: 8 A\nCM_ SG_ 5 Nope \"x\";\n";
        let out = from_str(text).unwrap();
        let warning = out
            .diagnostics
            .iter()
            .find(|d| d.severity == Severity::Warning)
            .unwrap();
        assert!(warning.message.contains("unknown signal"));
        assert_eq!(warning.line, 3);
    }

    #[test]
    fn test_enum_attribute_out_of_range_rejected() {
        let text = concat!(
            "BU_: A\n",
            "BA_DEF_ BU_ \"Layer\" ENUM \"L0\",\"L1\";\n",
            "BA_ \"Layer\" BU_ A 5;\n",
        );
        let out = from_str(text).unwrap();
        assert!(out.diagnostics.iter().any(|d| d.is_error()));
        assert!(out.db.get_node_by_name("A").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_int_attribute_rejects_float_literal() {
        let text = concat!(
            "BU_: A\n",
            "BA_DEF_ BU_ \"Prio\" INT 0 10;\n",
            "BA_ \"Prio\" BU_ A 2.5;\n",
        );
        let out = from_str(text).unwrap();
        assert!(out.diagnostics.iter().any(|d| d.is_error()));
    }

    #[test]
    fn test_unknown_section_skipped_with_warning() {
        let text = "BU_: A\nSGTYPE_ something odd\n";
        let out = from_str(text).unwrap();
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("SGTYPE_")));
    }

    #[test]
    fn test_layout_violation_is_a_warning_only() {
        let text = "BU_: A\nBO_ 9 M: 2 A\n SG_ Wide : 8|16@1+ (1,0) [0|0] \"\" A\n";
        let out = from_str(text).unwrap();
        assert!(out.db.get_signal(9, "Wide").is_some());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("Out of bounds")));
    }

    #[test]
    fn test_undeclared_receiver_warns() {
        let text = "BU_: A\nBO_ 9 M: 8 A\n SG_ S : 0|8@1+ (1,0) [0|255] \"\" Ghost\n";
        let out = from_str(text).unwrap();
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.message.contains("'Ghost' is not a declared node")));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(from_str(""), Err(DbcParseError::NoDeclarations)));
        assert!(matches!(
            from_str("// nothing here\n"),
            Err(DbcParseError::NoDeclarations)
        ));
    }

    #[test]
    fn test_malformed_version_is_fatal() {
        assert!(matches!(
            from_str("VERSION 1.0\nBU_: A\n"),
            Err(DbcParseError::MalformedVersion { line: 1 })
        ));
    }

    #[test]
    fn test_invalid_extension() {
        assert!(matches!(
            from_file("network.kcd"),
            Err(DbcParseError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = from_str(SAMPLE).unwrap().db;
        let b = from_str(SAMPLE).unwrap().db;

        let names_a: Vec<&str> = a.iter_messages().map(|m| m.name.as_str()).collect();
        let names_b: Vec<&str> = b.iter_messages().map(|m| m.name.as_str()).collect();
        assert_eq!(names_a, names_b);
        assert_eq!(names_a, vec!["EEC1", "EngineData"]); // sorted view

        let nodes_a: Vec<&str> = a.iter_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(nodes_a, vec!["Dash", "Gateway", "Motor"]);

        for (ma, mb) in a.iter_messages().zip(b.iter_messages()) {
            assert_eq!(ma.signals, mb.signals);
        }
    }
}
