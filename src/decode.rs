//! Bit unpacking and greedy prefix-code matching.
//!
//! Decoding never rebuilds a tree: bits accumulate into a candidate code
//! that is looked up in the code table, and a hit emits its symbol. Because
//! the table is prefix-free the first hit is the only possible one.

use std::collections::HashMap;

use log::{trace, warn};

use crate::code::{Code, CodeTable};
use crate::error::{Error, Result};
use crate::pack::padding_bits;

/// Iterate the meaningful bits of a packed buffer, skipping the front padding of the last byte.
///
/// The caller guarantees `bytes.len() == ceil(unpadded_bit_count / 8)`.
fn meaningful_bits(bytes: &[u8], unpadded_bit_count: u64) -> impl Iterator<Item = bool> + '_ {
    let last = bytes.len().saturating_sub(1);
    let pad = padding_bits(unpadded_bit_count);
    bytes.iter().enumerate().flat_map(move |(i, &byte)| {
        let start = if i == last { pad } else { 0 };
        (start..8).map(move |b| byte & (0x80 >> b) != 0)
    })
}

/// Reverses [`pack`](crate::pack::pack) given the code table that produced the payload.
#[derive(Clone, Debug)]
pub struct HuffmanDecoder {
    lookup: HashMap<Code, u8>,
    max_code_len: usize,
}

impl HuffmanDecoder {
    /// Index `codes` for matching.
    pub fn new(codes: &CodeTable) -> Self {
        let lookup = codes
            .iter()
            .map(|(symbol, code)| (code.clone(), symbol))
            .collect();
        Self {
            lookup,
            max_code_len: codes.max_code_len(),
        }
    }

    /// Decode `unpadded_bit_count` bits out of `bytes`.
    ///
    /// Padding bit values are ignored.
    ///
    /// # Errors
    /// Returns `Error::MalformedContainer` if the lengths disagree, a run of
    /// bits longer than the longest code matches nothing, or bits are left
    /// over once the stream is exhausted.
    pub fn decode(
        &self,
        bytes: &[u8],
        byte_count: u64,
        unpadded_bit_count: u64,
    ) -> Result<Vec<u8>> {
        if bytes.len() as u64 != byte_count {
            return Err(Error::malformed(format!(
                "payload holds {} bytes but byte count is {}",
                bytes.len(),
                byte_count
            )));
        }
        if byte_count != unpadded_bit_count.div_ceil(8) {
            return Err(Error::malformed(format!(
                "byte count {byte_count} does not fit bit count {unpadded_bit_count}"
            )));
        }
        if unpadded_bit_count > 0 && self.lookup.is_empty() {
            return Err(Error::malformed("payload present but code table is empty"));
        }

        let min_symbols = unpadded_bit_count / self.max_code_len.max(1) as u64;
        let mut out = Vec::with_capacity(min_symbols as usize);
        let mut candidate: Vec<bool> = Vec::with_capacity(self.max_code_len);
        for (pos, bit) in meaningful_bits(bytes, unpadded_bit_count).enumerate() {
            candidate.push(bit);
            if let Some(&symbol) = self.lookup.get(candidate.as_slice()) {
                out.push(symbol);
                candidate.clear();
            } else if candidate.len() >= self.max_code_len {
                warn!(
                    "no code matches {} bits ending at bit {}",
                    candidate.len(),
                    pos
                );
                return Err(Error::malformed(format!(
                    "bits ending at position {pos} match no code"
                )));
            }
        }
        if !candidate.is_empty() {
            return Err(Error::malformed(format!(
                "{} trailing bits match no code",
                candidate.len()
            )));
        }

        trace!("decoded {} symbols from {} bits", out.len(), unpadded_bit_count);
        Ok(out)
    }
}

/// Decode a packed payload with `codes`.
///
/// See [`HuffmanDecoder::decode`] for errors.
pub fn unpack(
    codes: &CodeTable,
    bytes: &[u8],
    byte_count: u64,
    unpadded_bit_count: u64,
) -> Result<Vec<u8>> {
    HuffmanDecoder::new(codes).decode(bytes, byte_count, unpadded_bit_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::pack::pack;
    use crate::tree;
    use proptest::prelude::*;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        let mut codes = CodeTable::empty();
        for &(symbol, bits) in entries {
            codes.set(symbol, Code::from_bits(bits.chars().map(|c| c == '1')));
        }
        codes
    }

    #[test]
    fn test_strips_front_padding() {
        let codes = table(&[(b'a', "1"), (b'b', "0")]);
        // 101 behind five padding bits
        let out = unpack(&codes, &[0b0000_0101], 1, 3).unwrap();
        assert_eq!(out, b"aba");
    }

    #[test]
    fn test_padding_values_are_ignored() {
        let codes = table(&[(b'a', "1"), (b'b', "0")]);
        let out = unpack(&codes, &[0b1111_1101], 1, 3).unwrap();
        assert_eq!(out, b"aba");
    }

    #[test]
    fn test_earlier_bytes_keep_all_bits() {
        let codes = table(&[(b'a', "110"), (b'b', "0"), (b'c', "111"), (b'd', "10")]);
        let out = unpack(&codes, &[0b1101_1011, 0b0000_0110], 2, 12).unwrap();
        assert_eq!(out, b"aaaa");
    }

    #[test]
    fn test_unmatched_bits_fail() {
        // "11" is unassigned
        let codes = table(&[(b'a', "0"), (b'b', "10")]);
        let err = unpack(&codes, &[0b1100_0000], 1, 8).unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_leftover_bits_fail() {
        let codes = table(&[(b'a', "00"), (b'b', "01"), (b'c', "1")]);
        // 1 0 : "1" -> c, then "0" dangles
        let err = unpack(&codes, &[0b0000_0010], 1, 2).unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_length_mismatches_fail() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        assert!(matches!(
            unpack(&codes, &[0, 0], 1, 8),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpack(&codes, &[0, 0], 2, 17),
            Err(Error::MalformedContainer(_))
        ));
        assert!(matches!(
            unpack(&CodeTable::empty(), &[0], 1, 3),
            Err(Error::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_zero_bits_decode_to_nothing() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        assert!(unpack(&codes, &[], 0, 0).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_unpack_inverts_pack(
            data in prop::collection::vec(any::<u8>(), 2..800),
        ) {
            let freqs = FrequencyTable::from_bytes(&data);
            prop_assume!(freqs.distinct() >= 2);
            let codes = CodeTable::from_tree(&tree::build(&freqs).unwrap());
            let payload = pack(&data, &codes).unwrap();

            let out = unpack(
                &codes,
                &payload.bytes,
                payload.byte_count(),
                payload.unpadded_bit_count,
            )
            .unwrap();
            prop_assert_eq!(out, data);
        }
    }
}
