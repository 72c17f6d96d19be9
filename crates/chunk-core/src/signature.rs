/*
 * Copyright [2022] [Kevin Velasco]
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fmt::{Display, Formatter};

const WORD_BITS: usize = u64::BITS as usize;

/// A positional record of which entries a module depends on, over the
/// canonical (insertion) order of `allEntries`.
///
/// Conceptually this is a string of `'X'`/`'_'` of length `|allEntries|`;
/// represented here as a packed bitset, since comparing and merging
/// word-sized chunks is both cheaper and just as canonical as string
/// comparison. `Display` renders the `'X'`/`'_'` form so diagnostics and
/// tests see the canonical wire format.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EntrySignature {
    len: usize,
    words: Vec<u64>,
}

impl EntrySignature {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0u64; (len + WORD_BITS - 1) / WORD_BITS.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "entry index out of range for signature");
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "entry index out of range for signature");
        self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Position-wise OR. Commutative, associative and idempotent.
    pub fn merge(a: &Self, b: &Self) -> Self {
        assert_eq!(a.len, b.len, "cannot merge signatures of different length");
        let words = a
            .words
            .iter()
            .zip(b.words.iter())
            .map(|(x, y)| x | y)
            .collect();
        Self { len: a.len, words }
    }

    /// `getSignatureDistance(src, tgt, enforceSubset)`: counts positions
    /// where `src` and `tgt` disagree. When `enforce_subset` is set, any
    /// disagreement where `src` needs an entry `tgt` lacks makes the
    /// target unsafe to merge into, signalled by returning `None`
    /// (an infinite distance).
    pub fn distance(src: &Self, tgt: &Self, enforce_subset: bool) -> Option<usize> {
        assert_eq!(src.len, tgt.len, "cannot compare signatures of different length");
        let mut distance = 0usize;
        for i in 0..src.len {
            let s = src.get(i);
            let t = tgt.get(i);
            if s != t {
                if enforce_subset && s {
                    return None;
                }
                distance += 1;
            }
        }
        Some(distance)
    }
}

impl Display for EntrySignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) { "X" } else { "_" })?;
        }
        Ok(())
    }
}
