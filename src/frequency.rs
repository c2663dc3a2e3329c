//! Symbol frequency counting.
//!
//! The first pass of static Huffman coding: one counter per byte value.

/// Number of distinct symbols in the byte alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence counts for every byte value, indexed by the byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add(data);
        table
    }

    /// Wrap precomputed counts.
    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }

    /// Add the bytes of `data` to the running counts.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, data: &[u8]) {
        self.extend(data.iter().copied());
    }

    /// Occurrences of `symbol`.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, i.e. the length of the counted input.
    ///
    /// `None` if the sum does not fit in a `u64`, which only tables built
    /// with [`FrequencyTable::from_counts`] can reach.
    pub fn total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0u64, |acc, &c| acc.checked_add(c))
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Non-zero `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Raw counts, index = byte value.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Shannon entropy of the counted distribution, in bits per symbol.
    ///
    /// Lower bound on the mean code length of any prefix code for this table.
    pub fn entropy(&self) -> f64 {
        let total: f64 = self.counts.iter().map(|&c| c as f64).sum();
        if total == 0.0 {
            return 0.0;
        }
        self.iter()
            .map(|(_, c)| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u8> for FrequencyTable {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for b in iter {
            let count = &mut self.counts[b as usize];
            *count = count.saturating_add(1);
        }
    }
}

impl FromIterator<u8> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
