//! Symbol alphabets.
//!
//! An [`Alphabet`] is an ordered set of distinct symbols. The K-th symbol has
//! index K, and every other component of the machine works on these dense
//! indices rather than on characters.
//!
//! # Example
//!
//! ```rust
//! use libenigma::alphabet::Alphabet;
//!
//! let alpha = Alphabet::new("ABCD").unwrap();
//! assert_eq!(alpha.size(), 4);
//! assert_eq!(alpha.to_int('C').unwrap(), 2);
//! assert_eq!(alpha.to_char(3).unwrap(), 'D');
//! assert!(alpha.to_int('Z').is_err());
//! ```

use rustc_hash::FxHashMap;

use crate::error::{EnigmaError, Result};

/// Characters with meaning in cycle notation or settings lines.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// The 26 upper-case Latin letters.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A bijection between symbols and the indices `0..size()`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: FxHashMap<char, usize>,
}

impl Alphabet {
    /// Create an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::EmptyAlphabet`] if `chars` is empty
    /// - [`EnigmaError::DuplicateSymbol`] if a character repeats
    /// - [`EnigmaError::ReservedSymbol`] for whitespace, `(`, `)` or `*`
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut indices = FxHashMap::default();

        for ch in chars.chars() {
            if ch.is_whitespace() || RESERVED.contains(&ch) {
                return Err(EnigmaError::ReservedSymbol(ch));
            }
            if indices.insert(ch, symbols.len()).is_some() {
                return Err(EnigmaError::DuplicateSymbol(ch));
            }
            symbols.push(ch);
        }

        if symbols.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }

        Ok(Self { symbols, indices })
    }

    /// Number of symbols.
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// True if `ch` belongs to this alphabet.
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.indices.contains_key(&ch)
    }

    /// Symbol with index `index`.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::IndexOutOfRange`] unless `index < size()`.
    #[inline]
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    ///
    /// [`EnigmaError::UnknownSymbol`] if `ch` is not in the alphabet.
    #[inline]
    pub fn to_int(&self, ch: char) -> Result<usize> {
        self.indices
            .get(&ch)
            .copied()
            .ok_or(EnigmaError::UnknownSymbol(ch))
    }

    /// All symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    /// The upper-case alphabet `A..=Z`.
    fn default() -> Self {
        let symbols: Vec<char> = UPPER.chars().collect();
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, indices }
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
