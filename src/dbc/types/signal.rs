use crate::dbc::types::{attributes::AttributeValue, message::MuxRole};
use std::collections::BTreeMap;

/// Elementary step for moving a bit field between a payload and a raw value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Step {
    /// Source byte index.
    pub(crate) byte_index: u16,
    /// LSB within the source byte (0..7).
    pub(crate) src_lsb: u8,
    /// Number of bits to take (1..8).
    pub(crate) width: u8,
    /// Destination LSB in the final value (LSB-first).
    pub(crate) dst_lsb: u16,
}

/// Definition of a signal within a CAN message (DBC `SG_` line).
///
/// Describes position/bit-length, endianness, sign, scaling (factor/offset),
/// valid range, unit of measure, value labels, and receiver node names.
#[derive(Clone, PartialEq, Debug)]
pub struct SignalDBC {
    /// Signal name.
    pub name: String,
    /// Bit start in the payload. For Intel, bit 0 = LSB of the first byte;
    /// for Motorola the start bit is the MSB of the field.
    pub bit_start: u16,
    /// Bit length.
    pub bit_length: u16,
    /// Endianness (`@1` Intel, `@0` Motorola).
    pub endian: Endianness,
    /// Sign (`+` unsigned, `-` signed).
    pub sign: Signess,
    /// Scaling factor.
    pub factor: f64,
    /// Scaling offset.
    pub offset: f64,
    /// Minimum physical value.
    pub min: f64,
    /// Maximum physical value.
    pub max: f64,
    /// Unit of measure.
    pub unit_of_measurement: String,
    /// Receiver node names (may contain the `Vector__XXX` placeholder).
    pub receivers: Vec<String>,
    /// Multiplexing role (`MuxRole::None` when unused).
    pub mux: MuxRole,
    /// Named `VAL_TABLE_` this signal refers to, if any.
    pub value_table_ref: Option<String>,
    /// Inline value-to-text mapping (from `VAL_`).
    pub value_table: BTreeMap<i64, String>,
    /// Associated comment (DBC `CM_ SG_` section).
    pub comment: String,
    /// Raw-bit interpretation override from `SIG_VALTYPE_`.
    pub extended_value_type: SignalExtendedValueType,

    // --- Signal Attribute Entry ---
    pub attributes: BTreeMap<String, AttributeValue>,

    // Precomputed extraction steps for fast decoding.
    pub(crate) steps: Vec<Step>,
}

impl Default for SignalDBC {
    fn default() -> Self {
        SignalDBC {
            name: String::new(),
            bit_start: 0,
            bit_length: 0,
            endian: Endianness::default(),
            sign: Signess::default(),
            factor: 1.0,
            offset: 0.0,
            min: 0.0,
            max: 0.0,
            unit_of_measurement: String::new(),
            receivers: Vec::new(),
            mux: MuxRole::None,
            value_table_ref: None,
            value_table: BTreeMap::new(),
            comment: String::new(),
            extended_value_type: SignalExtendedValueType::default(),
            attributes: BTreeMap::new(),
            steps: Vec::new(),
        }
    }
}

impl SignalDBC {
    /// Precomputes bit → value extraction steps to speed up decoding.
    pub fn compile_inline(&mut self) {
        if !self.steps.is_empty() || self.bit_length == 0 || self.bit_length > 64 {
            return;
        }
        let n_steps: usize = (self.bit_length as usize + (self.bit_start as usize & 7))
            .div_ceil(8)
            .max(1);
        self.steps.reserve_exact(n_steps);

        if matches!(self.endian, Endianness::Intel) {
            self.compile_intel();
        } else {
            self.compile_motorola();
        }
    }

    #[inline]
    fn push_step(&mut self, st: Step) {
        self.steps.push(st);
    }

    /// Step compilation for little-endian (Intel) signals.
    fn compile_intel(&mut self) {
        let mut remaining: u16 = self.bit_length;
        let mut bit: u16 = self.bit_start;
        let mut dst: u16 = 0u16;

        while remaining > 0 {
            let byte_idx: u16 = bit / 8;
            let bit_off: u8 = (bit % 8) as u8;
            let avail: u8 = 8 - bit_off;
            let take: u8 = remaining.min(avail as u16) as u8;

            self.push_step(Step {
                byte_index: byte_idx,
                src_lsb: bit_off,
                width: take,
                dst_lsb: dst,
            });

            bit += take as u16;
            dst += take as u16;
            remaining -= take as u16;
        }
    }

    /// Step compilation for big-endian (Motorola) signals.
    fn compile_motorola(&mut self) {
        // @0: the start bit is the MSB of the signal; advance MSB-first,
        // continuing at bit 7 of the next byte.
        let mut remaining: u16 = self.bit_length;
        let mut byte: u16 = self.bit_start / 8;
        let mut bit_msb: u8 = 7 - (self.bit_start % 8) as u8;

        while remaining > 0 {
            let can_take: u16 = (bit_msb as u16 + 1).min(remaining);
            let src_lsb: u8 = bit_msb + 1 - can_take as u8;
            let dst_lsb: u16 = remaining - can_take;

            self.push_step(Step {
                byte_index: byte,
                src_lsb,
                width: can_take as u8,
                dst_lsb,
            });

            remaining -= can_take;
            if src_lsb == 0 {
                byte += 1;
                bit_msb = 7;
            } else {
                bit_msb = src_lsb - 1;
            }
        }
    }

    /// Extracts the **unsigned** raw value (LSB-first accumulation) from the
    /// payload. Returns `None` when the field would run past the end of the
    /// buffer; the codec never reads out of bounds.
    #[inline]
    pub fn extract_raw_u64(&self, bytes: &[u8]) -> Option<u64> {
        if self.steps.is_empty() {
            return None;
        }
        let mut out: u64 = 0;
        for st in &self.steps {
            let b: u8 = *bytes.get(st.byte_index as usize)?;
            let mask: u8 = if st.width == 8 {
                0xFF
            } else {
                ((1u16 << st.width) - 1) as u8
            };
            let chunk = ((b >> st.src_lsb) & mask) as u64;
            out |= chunk << st.dst_lsb;
        }
        Some(out)
    }

    /// Extracts the **signed** raw value from the payload, performing sign
    /// extension if needed.
    #[inline]
    pub fn extract_raw_i64(&self, bytes: &[u8]) -> Option<i64> {
        let raw_u: u64 = self.extract_raw_u64(bytes)?;
        Some(self.sign_extend(raw_u))
    }

    /// Sign-extend an already extracted raw pattern to i64 width.
    #[inline]
    pub(crate) fn sign_extend(&self, raw_u: u64) -> i64 {
        let n: u16 = self.bit_length.min(64);
        if matches!(self.sign, Signess::Signed) && n > 0 {
            let sign_bit = 1u64 << (n - 1);
            if (raw_u & sign_bit) != 0 {
                let mask = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
                (raw_u | !mask) as i64
            } else {
                raw_u as i64
            }
        } else {
            raw_u as i64
        }
    }

    /// Writes the low `bit_length` bits of `raw` into the payload at this
    /// signal's position. Returns `false` (leaving the buffer untouched) when
    /// the field would run past the end of the buffer.
    pub fn insert_raw_u64(&self, bytes: &mut [u8], raw: u64) -> bool {
        if self.steps.is_empty() {
            return false;
        }
        let last: usize = self
            .steps
            .iter()
            .map(|st| st.byte_index as usize)
            .max()
            .unwrap_or(0);
        if last >= bytes.len() {
            return false;
        }
        for st in &self.steps {
            let mask: u8 = if st.width == 8 {
                0xFF
            } else {
                ((1u16 << st.width) - 1) as u8
            };
            let chunk: u8 = ((raw >> st.dst_lsb) as u8) & mask;
            let b: &mut u8 = &mut bytes[st.byte_index as usize];
            *b = (*b & !(mask << st.src_lsb)) | (chunk << st.src_lsb);
        }
        true
    }

    /// Raw-value bounds implied by `bit_length` and `sign`, as doubles.
    pub fn raw_range(&self) -> (f64, f64) {
        let n: i32 = self.bit_length.min(64) as i32;
        match self.sign {
            Signess::Unsigned => (0.0, 2f64.powi(n) - 1.0),
            Signess::Signed => (-(2f64.powi(n - 1)), 2f64.powi(n - 1) - 1.0),
        }
    }

    /// Converts an extracted raw bit pattern into the physical value,
    /// honoring the extended value type.
    pub fn physical_from_raw(&self, raw_u: u64) -> f64 {
        match self.extended_value_type {
            SignalExtendedValueType::Float32 if self.bit_length == 32 => {
                f32::from_bits(raw_u as u32) as f64
            }
            SignalExtendedValueType::Float64 if self.bit_length == 64 => f64::from_bits(raw_u),
            _ => {
                let base: f64 = match self.sign {
                    Signess::Signed => self.sign_extend(raw_u) as f64,
                    Signess::Unsigned => raw_u as f64,
                };
                base * self.factor + self.offset
            }
        }
    }

    /// Extracts and scales in one go. `None` on an out-of-bounds field.
    pub fn decode_physical(&self, bytes: &[u8]) -> Option<f64> {
        let raw_u: u64 = self.extract_raw_u64(bytes)?;
        Some(self.physical_from_raw(raw_u))
    }

    /// Inverse of [`decode_physical`](Self::decode_physical): scales, rounds,
    /// clamps to the representable raw range, and writes the bit pattern.
    /// Negative raws are stored as `2^bit_length + raw`.
    pub fn encode_physical(&self, bytes: &mut [u8], physical: f64) -> bool {
        let pattern: u64 = match self.extended_value_type {
            SignalExtendedValueType::Float32 if self.bit_length == 32 => {
                (physical as f32).to_bits() as u64
            }
            SignalExtendedValueType::Float64 if self.bit_length == 64 => physical.to_bits(),
            _ => {
                let (lo, hi) = self.raw_range();
                let raw: f64 = ((physical - self.offset) / self.factor).round().clamp(lo, hi);
                let n: u16 = self.bit_length.min(64);
                let mask: u64 = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
                let bits: u64 = if raw < 0.0 {
                    (raw as i64) as u64
                } else {
                    raw as u64
                };
                bits & mask
            }
        };
        self.insert_raw_u64(bytes, pattern)
    }

    /// Resets all fields to their default values.
    pub fn clear(&mut self) {
        *self = SignalDBC::default();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Motorola, // @0
    Intel, // @1
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Signess {
    #[default]
    Unsigned, // +
    Signed, // -
}

/// Raw-bit interpretation selected by `SIG_VALTYPE_`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignalExtendedValueType {
    #[default]
    Int, // 0
    Float32, // 1
    Float64, // 2
}

impl SignalExtendedValueType {
    pub fn from_token(tok: u8) -> Option<SignalExtendedValueType> {
        match tok {
            0 => Some(SignalExtendedValueType::Int),
            1 => Some(SignalExtendedValueType::Float32),
            2 => Some(SignalExtendedValueType::Float64),
            _ => None,
        }
    }
}
