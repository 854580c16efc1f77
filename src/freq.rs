//! Byte frequency analysis.
use crate::alloc::vec::Vec;
use crate::{FanoError, Symbol, SYMBOLS};

/// The number of occurrences of one symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyEntry {
    /// The byte value.
    pub symbol: Symbol,
    /// How often it occurs, at least one.
    pub count: usize,
}

/// All symbols of a buffer with their counts, most frequent first.
///
/// Symbols with equal counts keep the order in which they first appeared in the buffer.
/// Every symbol is listed exactly once and the list is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyList {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyList {
    /// Count the bytes of `data`.
    ///
    /// Fails with [`FanoError::EmptyInput`] if there is nothing to count.
    pub fn analyze(data: &[u8]) -> Result<Self, FanoError> {
        if data.is_empty() {
            return Err(FanoError::EmptyInput);
        }

        let mut counts = [0usize; SYMBOLS];
        let mut first_seen: Vec<Symbol> = Vec::new();
        for &byte in data {
            let count = &mut counts[usize::from(byte)];
            if *count == 0 {
                first_seen.push(byte);
            }
            *count += 1;
        }

        let mut entries: Vec<_> = first_seen
            .into_iter()
            .map(|symbol| FrequencyEntry {
                symbol,
                count: counts[usize::from(symbol)],
            })
            .collect();
        // Stable, so ties stay in order of first appearance.
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        log::debug!(
            "analyzed {} bytes, {} distinct symbols",
            data.len(),
            entries.len()
        );

        Ok(FrequencyList { entries })
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FrequencyEntry> {
        self.entries.iter()
    }

    /// The number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a list produced by `analyze`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of all counts, the length of the analyzed buffer.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// The count of `symbol`, if it occurs.
    pub fn get(&self, symbol: Symbol) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.count)
    }
}

impl<'a> IntoIterator for &'a FrequencyList {
    type Item = &'a FrequencyEntry;
    type IntoIter = core::slice::Iter<'a, FrequencyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
