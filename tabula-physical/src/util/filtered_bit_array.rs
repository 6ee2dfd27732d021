//! This module implements [FilteredBitArray].

use bitvec::vec::BitVec;

/// Number of bits in a storage word
const WORD_BITS: usize = u64::BITS as usize;
/// Number of bits summarized by one filter bit
pub const CHUNK_BITS: usize = 1024;
/// Number of storage words summarized by one filter bit
const WORDS_PER_CHUNK: usize = CHUNK_BITS / WORD_BITS;

/// Fixed-size bit array with a coarse summary that allows
/// skipping over long runs of unset bits.
///
/// For every chunk of [CHUNK_BITS] bits there is one filter bit,
/// which is set if and only if at least one bit of the chunk is set.
/// Bits can only ever be set, never cleared, so the summary never goes stale.
#[derive(Debug, Clone)]
pub struct FilteredBitArray {
    words: Vec<u64>,
    filter: BitVec,
    len: usize,
}

impl FilteredBitArray {
    /// Create a [FilteredBitArray] of the given length with no bit set.
    pub fn new(len: usize) -> Self {
        let num_words = len.div_ceil(WORD_BITS);
        let num_chunks = num_words.div_ceil(WORDS_PER_CHUNK);

        Self {
            words: vec![0; num_words],
            filter: BitVec::repeat(false, num_chunks),
            len,
        }
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bits are addressable.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the bit at position `index`.
    ///
    /// # Panics
    /// Panics if `index` is not smaller than [FilteredBitArray::len].
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bit index {index} out of bounds");

        let word = index / WORD_BITS;
        self.words[word] |= 1u64 << (index % WORD_BITS);
        self.filter.set(word / WORDS_PER_CHUNK, true);
    }

    /// Iterate over the positions of all set bits that are greater or equal to `start`,
    /// in increasing order.
    pub fn iter_set_from(&self, start: usize) -> SetBitsFrom<'_> {
        if start >= self.len {
            return SetBitsFrom {
                array: self,
                word: self.words.len(),
                current: 0,
            };
        }

        let word = start / WORD_BITS;
        SetBitsFrom {
            array: self,
            word,
            current: self.words[word] & (u64::MAX << (start % WORD_BITS)),
        }
    }
}

/// Iterator over set bits of a [FilteredBitArray], see [FilteredBitArray::iter_set_from].
#[derive(Debug, Clone, Copy)]
pub struct SetBitsFrom<'a> {
    array: &'a FilteredBitArray,
    /// Index of the word that `current` was read from
    word: usize,
    /// Bits of the current word that have not been reported yet
    current: u64,
}

impl Iterator for SetBitsFrom<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word * WORD_BITS + bit);
            }

            self.word += 1;
            while self.word < self.array.words.len()
                && !self.array.filter[self.word / WORDS_PER_CHUNK]
            {
                self.word = (self.word / WORDS_PER_CHUNK + 1) * WORDS_PER_CHUNK;
            }

            if self.word >= self.array.words.len() {
                return None;
            }
            self.current = self.array.words[self.word];
        }
    }
}
