//! Construction of the Shannon-Fano code table.
//!
//! The frequency list is split recursively. Each split picks the position at which the
//! summed counts of both halves are closest to each other, the left half continues with a
//! `0` bit and the right half with a `1` bit. Halves are plain subslices of the sorted list,
//! no tree is ever allocated, and a symbol gets its code once its slice has a single entry.
use core::fmt;

use crate::alloc::collections::btree_map::{self, BTreeMap};
use crate::alloc::vec::Vec;
use crate::freq::{FrequencyEntry, FrequencyList};
use crate::{FanoError, Symbol};

/// The bits assigned to one symbol, first bit first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

/// A mapping of every symbol of a buffer to its code.
///
/// No code is a prefix of another one. The table is immutable once built and may be shared
/// freely between encoders and decoders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// The number of bits, at least one for codes from a table.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> core::iter::Copied<core::slice::Iter<'_, bool>> {
        self.bits.iter().copied()
    }

    /// Whether `other` starts with all bits of this code.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<&'_ [bool]> for Code {
    fn from(bits: &[bool]) -> Self {
        Code { bits: bits.to_vec() }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl CodeTable {
    /// Assign a code to every symbol of the list.
    ///
    /// A list with a single symbol results in the one bit code `0`.
    pub fn build(list: &FrequencyList) -> Self {
        let mut table = CodeTable {
            codes: BTreeMap::new(),
        };

        match list.entries() {
            [] => {}
            [only] => {
                table.codes.insert(only.symbol, Code::from(&[false][..]));
            }
            entries => {
                let mut path = Vec::new();
                table.assign(entries, &mut path);
            }
        }

        log::debug!(
            "built code table for {} symbols, longest code {} bits",
            table.len(),
            table.max_code_len()
        );

        table
    }

    /// Analyse `data` and build the table for it.
    pub fn from_data(data: &[u8]) -> Result<Self, FanoError> {
        let list = FrequencyList::analyze(data)?;
        Ok(CodeTable::build(&list))
    }

    fn assign(&mut self, entries: &[FrequencyEntry], path: &mut Vec<bool>) {
        if let [leaf] = entries {
            self.codes.insert(leaf.symbol, Code::from(&path[..]));
            return;
        }

        let mid = balanced_split(entries);
        let (left, right) = entries.split_at(mid + 1);
        log::trace!(
            "split {} entries after index {} at depth {}",
            entries.len(),
            mid,
            path.len()
        );

        path.push(false);
        self.assign(left, path);
        path.pop();

        path.push(true);
        self.assign(right, path);
        path.pop();
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.codes.contains_key(&symbol)
    }

    /// Iterate over all codes in ascending order of their symbol.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.codes.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The length of the longest code, zero for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// The number of code bits needed to encode the buffer `list` was made from.
    ///
    /// Symbols missing from the table are not counted.
    pub fn encoded_bits(&self, list: &FrequencyList) -> usize {
        list.iter()
            .filter_map(|entry| self.get(entry.symbol).map(|code| code.len() * entry.count))
            .sum()
    }
}

/// Iterator over the `(symbol, code)` pairs of a table.
pub struct Iter<'t> {
    inner: btree_map::Iter<'t, Symbol, Code>,
}

impl<'t> Iterator for Iter<'t> {
    type Item = (Symbol, &'t Code);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&symbol, code)| (symbol, code))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'t> IntoIterator for &'t CodeTable {
    type Item = (Symbol, &'t Code);
    type IntoIter = Iter<'t>;

    fn into_iter(self) -> Iter<'t> {
        self.iter()
    }
}

/// Find the last index of the left half for the most balanced split of `entries`.
///
/// The left half is `entries[..=mid]` and the right half the rest. The returned `mid`
/// minimizes the difference of the summed counts of both halves, the lowest such index
/// wins. Lists with fewer than two entries can not be split and return `0`.
pub fn balanced_split(entries: &[FrequencyEntry]) -> usize {
    let total: usize = entries.iter().map(|entry| entry.count).sum();
    let candidates = entries.len().saturating_sub(1);

    let mut best = 0;
    let mut best_imbalance = usize::MAX;
    let mut left = 0;
    for (idx, entry) in entries[..candidates].iter().enumerate() {
        left += entry.count;
        let right = total - left;
        let imbalance = if left > right { left - right } else { right - left };
        if imbalance < best_imbalance {
            best = idx;
            best_imbalance = imbalance;
        }
    }

    best
}
