//! Two-pass static Huffman coding.
//!
//! The first pass counts symbols, the second emits each symbol's code. The
//! code table travels with the payload, so decoding needs no other input.

use log::{debug, trace};

use crate::code::CodeTable;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::pack::pack;
use crate::tree;

/// Huffman encoder.
///
/// Holds the code table derived from one frequency table; the tree itself is
/// dropped once the codes are known.
#[derive(Clone, Debug)]
pub struct HuffmanEncoder {
    freqs: FrequencyTable,
    codes: CodeTable,
}

impl HuffmanEncoder {
    /// Create a new Huffman encoder from symbol frequencies.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` for an all-zero table and
    /// `Error::InsufficientAlphabet` if only one symbol occurs.
    pub fn new(freqs: &FrequencyTable) -> Result<Self> {
        if freqs.is_empty() {
            return Err(Error::EmptyInput);
        }
        let root = tree::build(freqs)?;
        trace!(
            "built tree over {} symbols, depth {}",
            root.leaf_count(),
            root.depth()
        );
        Ok(Self {
            freqs: freqs.clone(),
            codes: CodeTable::from_tree(&root),
        })
    }

    /// Count `data` and create an encoder for it.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::new(&FrequencyTable::from_bytes(data))
    }

    /// The frequencies the codes were built from.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.freqs
    }

    /// The derived code table.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Encode `data` into a container.
    ///
    /// # Errors
    /// Returns `Error::InternalConsistency` if `data` contains a symbol that
    /// was absent from the frequency table.
    pub fn encode(&self, data: &[u8]) -> Result<Container> {
        let payload = pack(data, &self.codes)?;
        Ok(Container::new(self.codes.clone(), payload))
    }

    /// Size summary for input with the encoder's frequencies.
    ///
    /// `None` if the encoded bit count does not fit in a `u64`.
    pub fn stats(&self) -> Option<CodecStats> {
        CodecStats::new(&self.freqs, &self.codes)
    }
}

/// Size and efficiency figures for one encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodecStats {
    /// Input length in bytes.
    pub input_len: u64,
    /// Symbols with a non-zero count.
    pub distinct_symbols: usize,
    /// Meaningful bits in the packed payload.
    pub encoded_bits: u64,
    /// Packed payload bytes, padding included.
    pub packed_bytes: u64,
    /// Longest code in the table.
    pub max_code_len: usize,
    /// Shannon entropy of the input, in bits per symbol.
    pub entropy: f64,
}

impl CodecStats {
    /// Compute figures for `freqs` coded with `codes`.
    ///
    /// `None` if a counted symbol has no code in `codes`, or if the input
    /// length or encoded bit count does not fit in a `u64`.
    pub fn new(freqs: &FrequencyTable, codes: &CodeTable) -> Option<Self> {
        let encoded_bits = codes.encoded_bit_len(freqs)?;
        Some(Self {
            input_len: freqs.total()?,
            distinct_symbols: freqs.distinct(),
            encoded_bits,
            packed_bytes: encoded_bits.div_ceil(8),
            max_code_len: codes.max_code_len(),
            entropy: freqs.entropy(),
        })
    }

    /// Mean code length in bits per input symbol.
    pub fn mean_code_len(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        self.encoded_bits as f64 / self.input_len as f64
    }

    /// Packed size over input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        self.packed_bytes as f64 / self.input_len as f64
    }
}

/// Encode `data` with a code table built from its own frequencies.
///
/// # Errors
/// `Error::EmptyInput` for empty `data`, `Error::InsufficientAlphabet` when
/// every byte has the same value.
pub fn encode(data: &[u8]) -> Result<Container> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let encoder = HuffmanEncoder::from_data(data)?;
    let container = encoder.encode(data)?;
    debug!(
        "encoded {} bytes ({} symbols) into {} bits / {} bytes",
        data.len(),
        encoder.codes().len(),
        container.unpadded_bit_count(),
        container.byte_count()
    );
    Ok(container)
}

/// Decode a container with its embedded code table.
///
/// # Errors
/// `Error::MalformedContainer` if the payload does not decode cleanly.
pub fn decode(container: &Container) -> Result<Vec<u8>> {
    let out = container.decode()?;
    debug!(
        "decoded {} bits into {} bytes",
        container.unpadded_bit_count(),
        out.len()
    );
    Ok(out)
}
