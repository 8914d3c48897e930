use crate::dbc::types::{errors::MessageLayoutError, signal::Endianness};

/// Verify that (bit_start, bit_length) fits within the frame payload.
///
/// DBC assumptions:
/// - Intel: the field occupies bits [start, start + len - 1] on a linear
///   0..(8*bytes-1) plane.
/// - Motorola: the start bit is the MSB at physical bit `7 - (start % 8)` of
///   byte `start / 8`; walking MSB-first toward the following bytes visits
///   linear indices [start, start + len - 1] on the MSB-first plane, so the
///   bound is the same arithmetic with the Motorola walk behind it.
pub(crate) fn check_signal_fits(
    byte_length: u16,
    bit_start: u16,
    bit_length: u16,
    endianness: Endianness,
) -> Result<(), MessageLayoutError> {
    if bit_length == 0 {
        return Err(MessageLayoutError::ZeroBitLength);
    }
    let total_bits: usize = byte_length as usize * 8;

    match endianness {
        Endianness::Intel => {
            let end: usize = bit_start as usize + bit_length as usize - 1;
            if end < total_bits {
                Ok(())
            } else {
                Err(MessageLayoutError::IntelOutOfBounds {
                    end,
                    total_bits,
                    byte_length,
                })
            }
        }
        Endianness::Motorola => {
            let end: usize = bit_start as usize + bit_length as usize - 1;
            if end < total_bits {
                Ok(())
            } else {
                Err(MessageLayoutError::MotorolaOutOfBounds {
                    end,
                    total_bits,
                    byte_length,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intel_bounds() {
        assert!(check_signal_fits(8, 0, 64, Endianness::Intel).is_ok());
        assert!(check_signal_fits(8, 56, 8, Endianness::Intel).is_ok());
        assert!(check_signal_fits(8, 60, 8, Endianness::Intel).is_err());
        assert!(check_signal_fits(2, 0, 17, Endianness::Intel).is_err());
    }

    #[test]
    fn test_motorola_bounds() {
        // start 0 is the MSB of byte 0: a full 64-bit frame fits
        assert!(check_signal_fits(8, 0, 64, Endianness::Motorola).is_ok());
        // 16 bits from the MSB of byte 7 run past the frame
        assert!(check_signal_fits(8, 56, 16, Endianness::Motorola).is_err());
        // unaligned start: 12 bits from physical bit 5 of byte 0 need 2 bytes
        assert!(check_signal_fits(2, 2, 12, Endianness::Motorola).is_ok());
        assert!(check_signal_fits(1, 2, 12, Endianness::Motorola).is_err());
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(
            check_signal_fits(8, 0, 0, Endianness::Intel),
            Err(MessageLayoutError::ZeroBitLength)
        );
    }
}
