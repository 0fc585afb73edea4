//! Permutations in cycle notation.
//!
//! A [`Permutation`] maps the indices of an [`Alphabet`] onto themselves. It
//! is written as a sequence of disjoint cycles such as `(AELTP) (BKNW)`:
//! each symbol maps to the one after it in its cycle, the last symbol wraps
//! to the first, and symbols that appear in no cycle are fixed points.
//!
//! # Format
//!
//! ```text
//! (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)
//! ```
//!
//! Whitespace is ignored. Every group needs at least two symbols, and a
//! symbol may appear only once across all groups.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use libenigma::alphabet::Alphabet;
//! use libenigma::permutation::Permutation;
//!
//! let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
//! let perm = Permutation::parse("(BACD)", alpha).unwrap();
//! assert_eq!(perm.permute_symbol('B').unwrap(), 'A');
//! assert_eq!(perm.invert_symbol('A').unwrap(), 'B');
//! assert_eq!(perm.invert_symbol('B').unwrap(), 'D');
//! ```
//!
//! The cycles are kept as written; lookups go through forward and inverse
//! tables built once at parse time.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// One cycle as alphabet indices, in order.
pub type Cycle = SmallVec<[usize; 8]>;

/// A permutation of the indices of an alphabet.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Cycle>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` in cycle notation over `alphabet`.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::UnbalancedParenthesis`] for nested, unmatched or
    ///   unterminated groups
    /// - [`EnigmaError::EmptyCycle`] for `()`
    /// - [`EnigmaError::SingletonCycle`] for a one-symbol group
    /// - [`EnigmaError::StraySymbol`] for a symbol outside parentheses
    /// - [`EnigmaError::UnknownSymbol`] for a symbol outside the alphabet
    /// - [`EnigmaError::DuplicateMapping`] if a symbol appears twice
    pub fn parse(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut seen = vec![false; size];
        let mut parsed: Vec<Cycle> = Vec::new();
        let mut current: Option<(Cycle, char)> = None;

        for ch in cycles.chars().filter(|c| !c.is_whitespace()) {
            match (ch, current.as_mut()) {
                ('(', None) => current = Some((Cycle::new(), ch)),
                ('(', Some(_)) | (')', None) => {
                    return Err(EnigmaError::UnbalancedParenthesis(cycles.to_string()));
                }
                (')', Some(_)) => {
                    let Some((cycle, first)) = current.take() else {
                        unreachable!("group is open");
                    };
                    match cycle.len() {
                        0 => return Err(EnigmaError::EmptyCycle(cycles.to_string())),
                        1 => return Err(EnigmaError::SingletonCycle(first)),
                        _ => parsed.push(cycle),
                    }
                }
                (_, None) => return Err(EnigmaError::StraySymbol(ch)),
                (_, Some((cycle, first))) => {
                    let index = alphabet.to_int(ch)?;
                    if seen[index] {
                        return Err(EnigmaError::DuplicateMapping(ch));
                    }
                    seen[index] = true;
                    if cycle.is_empty() {
                        *first = ch;
                    }
                    cycle.push(index);
                }
            }
        }

        if current.is_some() {
            return Err(EnigmaError::UnbalancedParenthesis(cycles.to_string()));
        }

        Ok(Self::from_cycles(parsed, alphabet))
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        Self::from_cycles(Vec::new(), alphabet)
    }

    /// Build lookup tables for already validated, disjoint cycles.
    fn from_cycles(cycles: Vec<Cycle>, alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();

        for cycle in &cycles {
            for (pos, &from) in cycle.iter().enumerate() {
                let to = cycle[(pos + 1) % cycle.len()];
                forward[from] = to;
                inverse[to] = from;
            }
        }

        Self {
            alphabet,
            cycles,
            forward,
            inverse,
        }
    }

    /// Size of the permuted alphabet.
    #[inline]
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// The alphabet this permutation was built over.
    #[inline]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// `p` modulo the alphabet size, always in `0..size()`.
    #[inline]
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Apply the permutation to `p` modulo the alphabet size.
    #[inline]
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Apply the inverse permutation to `c` modulo the alphabet size.
    #[inline]
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Apply the permutation to a symbol.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::UnknownSymbol`] if `p` is not in the alphabet.
    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.permute(index))
    }

    /// Apply the inverse permutation to a symbol.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::UnknownSymbol`] if `c` is not in the alphabet.
    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.invert(index))
    }

    /// True iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        (0..self.size()).all(|i| self.permute(i) != i)
    }

    /// True iff every index maps to itself.
    pub fn is_identity(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Cycles as written, in alphabet indices.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Length of the longest cycle, 0 for the identity.
    pub fn max_cycle_len(&self) -> usize {
        self.cycles.iter().map(|c| c.len()).max().unwrap_or(0)
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.forward == other.forward
    }
}

impl Eq for Permutation {}

impl std::fmt::Display for Permutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols = self.alphabet.symbols();
        for (i, cycle) in self.cycles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &index in cycle {
                write!(f, "{}", symbols[index])?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
