//! # Static Huffman Coding
//!
//! *Two-pass prefix coding of byte streams, packed into a self-describing container.*
//!
//! ## Intuition First
//!
//! Morse code gives `E` a single dot and `Q` four symbols: frequent letters get
//! short codes. Huffman coding does the same for bytes, but picks the code
//! lengths optimally for the data at hand, and chooses the codes so that no
//! code is the beginning of another. A reader can therefore split the bit
//! stream into codes without any separators.
//!
//! ## The Problem
//!
//! Given symbol counts `w_s`, find a prefix-free code minimizing the total
//! encoded length
//!
//! ```text
//! L = Σ_s w_s · len(code_s)
//! ```
//!
//! Huffman's greedy answer: repeatedly merge the two lightest subtrees. The
//! depth of each leaf in the final tree is its code length.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─► FrequencyTable ─► tree::build ─► CodeTable ─► pack ─► Container
//! Container ─► HuffmanDecoder (embedded CodeTable) ─► bytes
//! ```
//!
//! The tree exists only while the code table is derived. Decoding works from
//! the code table alone and never rebuilds a tree.
//!
//! ## Complexity Analysis
//!
//! - **Counting and packing**: $O(n)$ in the input length.
//! - **Tree building**: $O(k \log k)$ for $k \le 256$ distinct symbols.
//! - **Decoding**: $O(n \cdot \ell)$ hash lookups in the worst case, with $\ell$ the longest code.
//!
//! ## Failure Modes
//!
//! 1. **Degenerate alphabets**: empty input and single-symbol input have no
//!    Huffman code and are rejected.
//! 2. **Padding direction**: the final byte carries its padding in the *high* bits. Packer and
//!    decoder must agree; see [`pack`].
//! 3. **Corrupt containers**: a code table that does not match the payload is detected and
//!    reported, never silently truncated.
//!
//! ## Example
//!
//! ```
//! let container = huffpack::encode(b"abracadabra")?;
//! let bytes = container.to_bytes();
//!
//! let parsed = huffpack::Container::from_bytes(&bytes)?;
//! assert_eq!(huffpack::decode(&parsed)?, b"abracadabra");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod container;
pub mod decode;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod pack;
pub mod tree;

pub use code::{Code, CodeTable};
pub use container::Container;
pub use decode::HuffmanDecoder;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use huffman::{decode, encode, CodecStats, HuffmanEncoder};
pub use pack::PackedPayload;
