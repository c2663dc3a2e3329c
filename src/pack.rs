//! Bit packing of encoded symbols.
//!
//! The encoded bitstream is cut into 8-bit groups, each written MSB-first.
//! A short final group is padded with zero bits at its *front*, so its
//! meaningful bits sit in the low-order end of the last byte:
//!
//! ```text
//! bitstream  1 0 1 1 0 0 1 0 | 1 1 0
//! bytes      1011_0010         0000_0110
//!                                   ^^^ meaningful
//! ```

use log::trace;

use crate::code::CodeTable;
use crate::error::{Error, Result};

/// Packed bitstream plus the exact number of meaningful bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedPayload {
    /// Packed bytes; `bytes.len() == byte_count()`.
    pub bytes: Vec<u8>,
    /// Bits before byte-boundary padding.
    pub unpadded_bit_count: u64,
}

impl PackedPayload {
    /// `ceil(unpadded_bit_count / 8)`.
    pub fn byte_count(&self) -> u64 {
        self.unpadded_bit_count.div_ceil(8)
    }

    /// Number of padding bits at the front of the last byte.
    pub fn padding_bits(&self) -> u32 {
        padding_bits(self.unpadded_bit_count)
    }
}

pub(crate) fn padding_bits(unpadded_bit_count: u64) -> u32 {
    match unpadded_bit_count % 8 {
        0 => 0,
        r => 8 - r as u32,
    }
}

/// Accumulates bits MSB-first into whole bytes.
#[derive(Debug, Default)]
struct BitSink {
    bytes: Vec<u8>,
    acc: u8,
    pending: u32,
    total: u64,
}

impl BitSink {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    fn push(&mut self, bit: bool) {
        self.acc = (self.acc << 1) | bit as u8;
        self.pending += 1;
        self.total += 1;
        if self.pending == 8 {
            self.bytes.push(self.acc);
            self.acc = 0;
            self.pending = 0;
        }
    }

    fn finish(mut self) -> PackedPayload {
        // The partial group already sits right-justified in `acc`; its high
        // bits are the zero padding.
        if self.pending > 0 {
            self.bytes.push(self.acc);
        }
        PackedPayload {
            bytes: self.bytes,
            unpadded_bit_count: self.total,
        }
    }
}

/// Concatenate the code of every byte of `data` and pack the result.
///
/// # Errors
/// Returns `Error::InternalConsistency` if a byte of `data` has no code in `codes`.
pub fn pack(data: &[u8], codes: &CodeTable) -> Result<PackedPayload> {
    let mut sink = BitSink::with_capacity(data.len());
    for &symbol in data {
        let code = codes
            .get(symbol)
            .ok_or(Error::InternalConsistency { symbol })?;
        for &bit in code.bits() {
            sink.push(bit);
        }
    }
    let payload = sink.finish();
    trace!(
        "packed {} symbols into {} bits ({} bytes, {} padding bits)",
        data.len(),
        payload.unpadded_bit_count,
        payload.bytes.len(),
        payload.padding_bits()
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        let mut codes = CodeTable::empty();
        for &(symbol, bits) in entries {
            codes.set(symbol, Code::from_bits(bits.chars().map(|c| c == '1')));
        }
        codes
    }

    #[test]
    fn test_three_one_bit_codes_pad_front() {
        let codes = table(&[(b'a', "1"), (b'b', "0")]);
        let payload = pack(b"aba", &codes).unwrap();
        assert_eq!(payload.unpadded_bit_count, 3);
        assert_eq!(payload.byte_count(), 1);
        assert_eq!(payload.padding_bits(), 5);
        // bitstream 101 with five leading zero pad bits
        assert_eq!(payload.bytes, vec![0b0000_0101]);
    }

    #[test]
    fn test_full_bytes_have_no_padding() {
        let codes = table(&[(b'a', "10"), (b'b', "01")]);
        let payload = pack(b"abab", &codes).unwrap();
        assert_eq!(payload.unpadded_bit_count, 8);
        assert_eq!(payload.padding_bits(), 0);
        assert_eq!(payload.bytes, vec![0b1001_1001]);
    }

    #[test]
    fn test_only_last_byte_is_padded() {
        let codes = table(&[(b'a', "110"), (b'b', "0")]);
        // 110 110 110 0 -> 11011011 | 00 (padded to 00000000)
        let payload = pack(b"aaab", &codes).unwrap();
        assert_eq!(payload.unpadded_bit_count, 10);
        assert_eq!(payload.bytes, vec![0b1101_1011, 0b0000_0000]);

        // 110 110 110 110 -> 11011011 | 0110 (padded to 00000110)
        let payload = pack(b"aaaa", &codes).unwrap();
        assert_eq!(payload.unpadded_bit_count, 12);
        assert_eq!(payload.bytes, vec![0b1101_1011, 0b0000_0110]);
    }

    #[test]
    fn test_missing_code_is_internal_error() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        assert!(matches!(
            pack(b"abc", &codes),
            Err(Error::InternalConsistency { symbol: b'c' })
        ));
    }

    #[test]
    fn test_empty_data_packs_to_nothing() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        let payload = pack(b"", &codes).unwrap();
        assert!(payload.bytes.is_empty());
        assert_eq!(payload.unpadded_bit_count, 0);
        assert_eq!(payload.byte_count(), 0);
    }
}
