//! Per-symbol bit codes derived from a Huffman tree.

use std::borrow::Borrow;
use std::fmt;

use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::Node;

/// Longest code a byte alphabet can produce (a fully skewed tree over 256 leaves).
pub const MAX_CODE_LEN: usize = ALPHABET_SIZE - 1;

/// A variable-length bit string, first bit first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    /// Build a code from explicit bits.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        Self(bits.into_iter().collect())
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-length code, which never names a symbol.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bits, first bit first.
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Pack the bits MSB-first into `ceil(len / 8)` bytes.
    ///
    /// Unused low bits of the last byte are zero.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len().div_ceil(8)];
        for (i, &bit) in self.0.iter().enumerate() {
            if bit {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out
    }

    /// Inverse of [`Code::to_packed`]. `bytes` must hold at least `len` bits.
    pub(crate) fn from_packed(bytes: &[u8], len: usize) -> Self {
        Self(
            (0..len)
                .map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0)
                .collect(),
        )
    }
}

impl Borrow<[bool]> for Code {
    fn borrow(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, index = byte value.
///
/// Tables built from a tree are prefix-free: every code is the path to a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// A table with no codes.
    pub fn empty() -> Self {
        Self {
            codes: std::array::from_fn(|_| None),
        }
    }

    /// Walk `root`, appending `0` for left and `1` for right, and record the path at each leaf.
    ///
    /// A lone leaf has no path and yields an empty table.
    pub fn from_tree(root: &Node) -> Self {
        let mut table = Self::empty();
        table.collect(root, Vec::new());
        table
    }

    fn collect(&mut self, node: &Node, prefix: Vec<bool>) {
        match node {
            Node::Leaf { symbol, .. } => {
                if !prefix.is_empty() {
                    self.codes[*symbol as usize] = Some(Code(prefix));
                }
            }
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(false);
                self.collect(left, left_prefix);

                let mut right_prefix = prefix;
                right_prefix.push(true);
                self.collect(right, right_prefix);
            }
        }
    }

    pub(crate) fn set(&mut self, symbol: u8, code: Code) {
        self.codes[symbol as usize] = Some(code);
    }

    /// Code assigned to `symbol`, if any.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// True if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Length of the longest code, `0` for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.iter().flatten().map(Code::len).max().unwrap_or(0)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as u8, c)))
    }

    /// True if no code is a prefix of another and none is empty.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.iter().flatten().collect();
        if codes.iter().any(|c| c.is_empty()) {
            return false;
        }
        // After sorting, a code that prefixes any other also prefixes its successor.
        codes.sort();
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// Bits needed to encode input with these frequencies.
    ///
    /// `None` if some counted symbol has no code or the total does not fit in a `u64`.
    pub fn encoded_bit_len(&self, freqs: &FrequencyTable) -> Option<u64> {
        freqs.iter().try_fold(0u64, |acc, (symbol, count)| {
            let code = self.get(symbol)?;
            acc.checked_add(count.checked_mul(code.len() as u64)?)
        })
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;
    use proptest::prelude::*;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&tree::build(&FrequencyTable::from_bytes(data)).unwrap())
    }

    #[test]
    fn test_aabc_codes() {
        let codes = table_for(b"AABC");
        assert_eq!(codes.get(b'A').unwrap().to_string(), "0");
        assert_eq!(codes.get(b'B').unwrap().to_string(), "10");
        assert_eq!(codes.get(b'C').unwrap().to_string(), "11");
        assert_eq!(codes.get(b'D'), None);
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.max_code_len(), 2);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_bit_len_matches_frequencies() {
        let freqs = FrequencyTable::from_bytes(b"AABC");
        let codes = table_for(b"AABC");
        assert_eq!(codes.encoded_bit_len(&freqs), Some(6));
        assert_eq!(
            codes.encoded_bit_len(&FrequencyTable::from_bytes(b"Z")),
            None
        );
    }

    #[test]
    fn test_bit_len_overflow_is_none() {
        let mut counts = [0u64; 256];
        counts[b'A' as usize] = u64::MAX / 2;
        counts[b'B' as usize] = 1;
        counts[b'C' as usize] = 1;
        let freqs = FrequencyTable::from_counts(counts);
        // A keeps a 1-bit code; B and C add 4 bits past u64::MAX / 2.
        assert_eq!(table_for(b"AABC").encoded_bit_len(&freqs), Some(u64::MAX / 2 + 4));

        counts[b'B' as usize] = u64::MAX / 2;
        let freqs = FrequencyTable::from_counts(counts);
        assert_eq!(table_for(b"AABC").encoded_bit_len(&freqs), None);
    }

    #[test]
    fn test_lone_leaf_has_no_code() {
        let leaf = Node::Leaf {
            symbol: 7,
            weight: 3,
        };
        assert!(CodeTable::from_tree(&leaf).is_empty());
    }

    #[test]
    fn test_prefix_check_detects_overlap() {
        let mut codes = CodeTable::empty();
        codes.set(1, Code::from_bits([true, false]));
        codes.set(2, Code::from_bits([true, true]));
        assert!(codes.is_prefix_free());

        codes.set(3, Code::from_bits([true]));
        assert!(!codes.is_prefix_free());
    }

    #[test]
    fn test_packed_layout() {
        let code = Code::from_bits([true, false, true, true, false, false, false, false, true]);
        assert_eq!(code.to_packed(), vec![0b1011_0000, 0b1000_0000]);
        assert_eq!(Code::from_packed(&code.to_packed(), code.len()), code);
    }

    proptest! {
        #[test]
        fn prop_generated_tables_are_prefix_free(
            data in prop::collection::vec(any::<u8>(), 2..600),
        ) {
            let freqs = FrequencyTable::from_bytes(&data);
            prop_assume!(freqs.distinct() >= 2);
            let codes = table_for(&data);

            prop_assert!(codes.is_prefix_free());
            prop_assert_eq!(codes.len(), freqs.distinct());
            for (symbol, _) in freqs.iter() {
                prop_assert!(codes.get(symbol).is_some());
            }
            prop_assert!(codes.max_code_len() <= MAX_CODE_LEN);
        }
    }
}
