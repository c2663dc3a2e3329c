//! Self-describing container: code table, packed payload and length metadata.
//!
//! # Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! magic              4 bytes   "HUFP"
//! version            u8        1
//! code table         256 slots in symbol order:
//!                      u8 bit length (0 = no code)
//!                      ceil(len / 8) bytes, code bits MSB-first
//! payload length     u64
//! payload            raw packed bytes
//! byte count         u64       equal to payload length
//! unpadded bit count u64
//! ```

use std::io::{Read, Write};

use log::warn;

use crate::code::{Code, CodeTable};
use crate::decode::HuffmanDecoder;
use crate::error::{Error, Result};
use crate::frequency::ALPHABET_SIZE;
use crate::pack::PackedPayload;

/// Leading bytes of every serialized container.
pub const MAGIC: [u8; 4] = *b"HUFP";

/// Serialization format version.
pub const FORMAT_VERSION: u8 = 1;

/// Everything needed to decode, with no external state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    codes: CodeTable,
    payload: PackedPayload,
}

impl Container {
    /// Bundle a code table with the payload it produced.
    pub fn new(codes: CodeTable, payload: PackedPayload) -> Self {
        Self { codes, payload }
    }

    /// The embedded code table.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// The packed payload.
    pub fn payload(&self) -> &PackedPayload {
        &self.payload
    }

    /// Packed bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.payload.bytes
    }

    /// Number of packed bytes.
    pub fn byte_count(&self) -> u64 {
        self.payload.bytes.len() as u64
    }

    /// Meaningful bits in the packed bytes.
    pub fn unpadded_bit_count(&self) -> u64 {
        self.payload.unpadded_bit_count
    }

    /// Decode the payload with the embedded code table.
    pub fn decode(&self) -> Result<Vec<u8>> {
        HuffmanDecoder::new(&self.codes).decode(
            &self.payload.bytes,
            self.byte_count(),
            self.payload.unpadded_bit_count,
        )
    }

    /// Serialized size in bytes.
    pub fn serialized_len(&self) -> usize {
        let table: usize = (0..=u8::MAX)
            .map(|s| 1 + self.codes.get(s).map_or(0, |c| c.len().div_ceil(8)))
            .sum();
        MAGIC.len() + 1 + table + 8 + self.payload.bytes.len() + 8 + 8
    }

    /// Serialize into a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        out.extend_from_slice(&MAGIC);
        out.push(FORMAT_VERSION);
        for symbol in 0..=u8::MAX {
            match self.codes.get(symbol) {
                Some(code) => {
                    out.push(code.len() as u8);
                    out.extend_from_slice(&code.to_packed());
                }
                None => out.push(0),
            }
        }
        out.extend_from_slice(&self.byte_count().to_le_bytes());
        out.extend_from_slice(&self.payload.bytes);
        out.extend_from_slice(&self.byte_count().to_le_bytes());
        out.extend_from_slice(&self.payload.unpadded_bit_count.to_le_bytes());
        out
    }

    /// Serialize into `w`.
    ///
    /// # Errors
    /// Returns `Error::Io` if `w` fails.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Parse a buffer holding exactly one container.
    ///
    /// # Errors
    /// Returns `Error::MalformedContainer` if the buffer is truncated, has
    /// trailing bytes, or fails validation.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        let container = Self::read_from(&mut cursor).map_err(|e| match e {
            Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Error::malformed("truncated container")
            }
            other => other,
        })?;
        if !cursor.is_empty() {
            return Err(Error::malformed(format!(
                "{} trailing bytes after container",
                cursor.len()
            )));
        }
        Ok(container)
    }

    /// Read one container from `r`.
    ///
    /// # Errors
    /// Returns `Error::Io` if `r` fails or ends early, and
    /// `Error::MalformedContainer` if validation fails.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let result = Self::read_unchecked(r);
        if let Err(Error::MalformedContainer(reason)) = &result {
            warn!("rejected container: {reason}");
        }
        result
    }

    fn read_unchecked<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::malformed("bad magic"));
        }
        let version = read_u8(r)?;
        if version != FORMAT_VERSION {
            return Err(Error::malformed(format!("unsupported version {version}")));
        }

        let mut codes = CodeTable::empty();
        for symbol in 0..ALPHABET_SIZE {
            let len = read_u8(r)? as usize;
            if len == 0 {
                continue;
            }
            let mut packed = vec![0u8; len.div_ceil(8)];
            r.read_exact(&mut packed)?;
            let code = Code::from_packed(&packed, len);
            if code.to_packed() != packed {
                return Err(Error::malformed(format!(
                    "non-zero padding in code for symbol {symbol}"
                )));
            }
            codes.set(symbol as u8, code);
        }
        if !codes.is_prefix_free() {
            return Err(Error::malformed("code table is not prefix-free"));
        }

        let payload_len = read_u64(r)?;
        let mut bytes = Vec::new();
        let read = r.by_ref().take(payload_len).read_to_end(&mut bytes)?;
        if read as u64 != payload_len {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }

        let byte_count = read_u64(r)?;
        let unpadded_bit_count = read_u64(r)?;
        if byte_count != payload_len {
            return Err(Error::malformed(format!(
                "byte count {byte_count} disagrees with payload length {payload_len}"
            )));
        }
        if byte_count != unpadded_bit_count.div_ceil(8) {
            return Err(Error::malformed(format!(
                "byte count {byte_count} does not fit bit count {unpadded_bit_count}"
            )));
        }

        Ok(Self {
            codes,
            payload: PackedPayload {
                bytes,
                unpadded_bit_count,
            },
        })
    }
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
