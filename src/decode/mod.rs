//! # decode
//!
//! Frame decoding against a parsed [`DatabaseDBC`]: message lookup,
//! multiplex branch selection, bit extraction and scaling, unit and
//! value-label attachment.
//!
//! A [`Decoder`] borrows the database read-only; any number of decoders may
//! share one database across threads once parsing is done.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dbc::core::message_layout;
use crate::dbc::types::{
    database::DatabaseDBC,
    message::{MessageDBC, MuxRole},
    signal::SignalDBC,
};

/// Decoder behavior switches.
///
/// `verbose` only controls whether per-frame notes are collected; it never
/// changes a decoding outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecoderOptions {
    /// Synthesize an `UNKNOWN_<id>` placeholder for unknown message ids
    /// instead of refusing the frame.
    pub ignore_unknown_ids: bool,
    /// Collect skip/shortage notes on the decoded record.
    pub verbose: bool,
}

/// One decoded signal reading.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedSignal {
    pub name: String,
    /// Physical value (`raw * factor + offset`, or the reinterpreted float).
    pub value: f64,
    /// Raw value before scaling, sign-extended for signed signals.
    pub raw: i64,
    pub unit: String,
    /// Value-table label for the integer part of `value`, when one matches.
    pub description: Option<String>,
}

/// One decoded frame: the signal readings keyed by signal name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DecodedMessage {
    pub id: u32,
    pub name: String,
    pub signals: BTreeMap<String, DecodedSignal>,
    /// Diagnostic notes, populated only when the decoder is verbose.
    pub notes: Vec<String>,
}

/// Decodes raw CAN frames using a borrowed [`DatabaseDBC`].
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    db: &'a DatabaseDBC,
    options: DecoderOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(db: &'a DatabaseDBC, options: DecoderOptions) -> Self {
        Decoder { db, options }
    }

    /// Decode a whole frame.
    ///
    /// Returns `None` when the id is unknown (strict mode) or when any
    /// declared signal does not fit the message's byte length — a database
    /// structurally inconsistent with this frame. A buffer merely too short
    /// for some signal degrades instead: that signal is omitted and a note
    /// is recorded.
    pub fn decode_frame(&self, id: u32, data: &[u8]) -> Option<DecodedMessage> {
        let Some(msg) = self.db.get_message_by_id(id) else {
            if self.options.ignore_unknown_ids {
                return Some(DecodedMessage {
                    id,
                    name: format!("UNKNOWN_{id}"),
                    ..Default::default()
                });
            }
            return None;
        };

        // structural check: every declared signal must fit the declared DLC
        for sig in &msg.signals {
            if message_layout::check_signal_fits(
                msg.byte_length,
                sig.bit_start,
                sig.bit_length,
                sig.endian,
            )
            .is_err()
            {
                return None;
            }
        }

        let mut out: DecodedMessage = DecodedMessage {
            id,
            name: msg.name.clone(),
            ..Default::default()
        };

        // first pass: resolve the multiplexor branch, if any
        let mut mux_value: Option<u64> = None;
        for sig in &msg.signals {
            if matches!(sig.mux, MuxRole::Multiplexor) {
                match sig.extract_raw_u64(data) {
                    Some(raw) => {
                        mux_value = Some(raw);
                        out.signals
                            .insert(sig.name.clone(), self.reading(msg, sig, raw));
                    }
                    None => self.note(
                        &mut out,
                        format!("multiplexor {} does not fit {} data bytes", sig.name, data.len()),
                    ),
                }
                break;
            }
        }

        // second pass: everything else
        for sig in &msg.signals {
            match sig.mux {
                MuxRole::Multiplexor => continue, // already in the output
                MuxRole::Multiplexed(k) => {
                    if mux_value != Some(k as u64) {
                        continue;
                    }
                }
                MuxRole::None => {}
            }
            match sig.extract_raw_u64(data) {
                Some(raw) => {
                    out.signals
                        .insert(sig.name.clone(), self.reading(msg, sig, raw));
                }
                None => self.note(
                    &mut out,
                    format!("signal {} does not fit {} data bytes, omitted", sig.name, data.len()),
                ),
            }
        }

        Some(out)
    }

    /// Decode a single named signal of a message.
    ///
    /// For a multiplexed signal the frame must carry the matching
    /// multiplexor value, otherwise there is no reading to report.
    pub fn decode_signal(&self, id: u32, signal_name: &str, data: &[u8]) -> Option<DecodedSignal> {
        let msg: &MessageDBC = self.db.get_message_by_id(id)?;
        let sig: &SignalDBC = msg.get_signal(signal_name)?;

        if let MuxRole::Multiplexed(k) = sig.mux {
            let mux: &SignalDBC = msg.multiplexor_signal()?;
            let mux_raw: u64 = mux.extract_raw_u64(data)?;
            if mux_raw != k as u64 {
                return None;
            }
        }

        let raw: u64 = sig.extract_raw_u64(data)?;
        Some(self.reading(msg, sig, raw))
    }

    /// Value-table label for a raw signal value.
    pub fn value_description(&self, id: u32, signal_name: &str, raw: i64) -> Option<&str> {
        self.db.signal_value_description(id, signal_name, raw)
    }

    fn reading(&self, msg: &MessageDBC, sig: &SignalDBC, raw_u: u64) -> DecodedSignal {
        let value: f64 = sig.physical_from_raw(raw_u);
        let raw: i64 = sig.sign_extend(raw_u);
        let description: Option<String> = self
            .db
            .signal_value_description(msg.id, &sig.name, value as i64)
            .map(str::to_string);
        DecodedSignal {
            name: sig.name.clone(),
            value,
            raw,
            unit: sig.unit_of_measurement.clone(),
            description,
        }
    }

    fn note(&self, out: &mut DecodedMessage, text: String) {
        if self.options.verbose {
            out.notes.push(text);
        }
    }
}
