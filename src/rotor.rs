//! Rotors and reflectors.
//!
//! A rotor is split into two parts:
//!
//! - [`RotorWiring`]: the immutable template from the catalogue (name,
//!   permutation at position 0 and [`RotorKind`]). Templates are shared via
//!   `Arc` and never change after construction.
//! - [`Rotor`]: a template placed in a machine slot together with its current
//!   rotational setting. Each slot owns its own setting, so the same template
//!   can sit in several machines without them interfering.
//!
//! # Variants
//!
//! | Kind | rotates | reflects | advance | set |
//! |------|---------|----------|---------|-----|
//! | `Moving` | yes | no | setting + 1 | any position |
//! | `Fixed` | no | no | error | any position |
//! | `Reflector` | no | yes | error | position 0 only |

use std::sync::Arc;

use smallvec::SmallVec;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Notch positions as alphabet indices.
pub type Notches = SmallVec<[usize; 4]>;

/// Behavior tag of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Steps when driven by the pawls; lets its left neighbour step when
    /// its setting is one of `notches`.
    Moving {
        /// Settings at which the rotor engages its left neighbour.
        notches: Notches,
    },
    /// Never moves, but can be set to any position.
    Fixed,
    /// Never moves, always at position 0, returns the signal.
    Reflector,
}

impl RotorKind {
    /// Short tag used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Moving { .. } => "moving",
            Self::Fixed => "fixed",
            Self::Reflector => "reflector",
        }
    }
}

/// Immutable rotor template: name, wiring and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorWiring {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
}

impl RotorWiring {
    /// A moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::UnknownSymbol`] if a notch is not in the permutation's
    /// alphabet.
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet();
        let mut indices = Notches::new();
        for ch in notches.chars() {
            let index = alphabet.to_int(ch)?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(Self {
            name: name.into(),
            permutation,
            kind: RotorKind::Moving { notches: indices },
        })
    }

    /// A rotor that never advances.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self {
            name: name.into(),
            permutation,
            kind: RotorKind::Fixed,
        }
    }

    /// A reflector. Its wiring must swap symbols in pairs.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::NonInvolutiveReflector`] if a cycle is longer than 2.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self> {
        let name = name.into();
        let longest = permutation.max_cycle_len();
        if longest > 2 {
            return Err(EnigmaError::NonInvolutiveReflector {
                name,
                cycle_len: longest,
            });
        }
        Ok(Self {
            name,
            permutation,
            kind: RotorKind::Reflector,
        })
    }

    /// Catalogue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wiring at position 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Variant tag.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// True for moving rotors.
    #[inline]
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True for reflectors.
    #[inline]
    pub fn reflects(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }
}

impl std::fmt::Display for RotorWiring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}

/// A rotor template placed in a slot, with its current setting.
#[derive(Debug, Clone)]
pub struct Rotor {
    wiring: Arc<RotorWiring>,
    setting: usize,
}

impl Rotor {
    /// Place `wiring` at setting 0.
    pub fn new(wiring: Arc<RotorWiring>) -> Self {
        Self { wiring, setting: 0 }
    }

    /// Template this rotor was built from.
    pub fn wiring(&self) -> &Arc<RotorWiring> {
        &self.wiring
    }

    /// Catalogue name.
    pub fn name(&self) -> &str {
        self.wiring.name()
    }

    /// Variant tag.
    pub fn kind(&self) -> &RotorKind {
        self.wiring.kind()
    }

    /// Wiring at position 0.
    pub fn permutation(&self) -> &Permutation {
        self.wiring.permutation()
    }

    /// Alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.wiring.alphabet()
    }

    /// Alphabet size.
    #[inline]
    pub fn size(&self) -> usize {
        self.permutation().size()
    }

    /// True iff the rotor has a ratchet and can move.
    #[inline]
    pub fn rotates(&self) -> bool {
        self.wiring.rotates()
    }

    /// True iff the rotor is a reflector.
    #[inline]
    pub fn reflects(&self) -> bool {
        self.wiring.reflects()
    }

    /// Current setting in `0..size()`.
    #[inline]
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Set the rotor to position `posn` (taken modulo the alphabet size).
    ///
    /// # Errors
    ///
    /// [`EnigmaError::ImmutablePosition`] when a reflector is set to anything
    /// other than 0.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        let posn = posn % self.size();
        if self.reflects() && posn != 0 {
            return Err(EnigmaError::ImmutablePosition {
                name: self.name().to_string(),
                position: posn,
            });
        }
        self.setting = posn;
        Ok(())
    }

    /// Set the rotor to the position labelled `cposn`.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::UnknownSymbol`] if `cposn` is outside the alphabet
    /// - [`EnigmaError::ImmutablePosition`] for a reflector, unless `cposn`
    ///   is the first symbol
    pub fn set_symbol(&mut self, cposn: char) -> Result<()> {
        let posn = self.alphabet().to_int(cposn)?;
        self.set(posn)
    }

    /// Map `p` through the wiring, offset by the current setting.
    #[inline]
    pub fn convert_forward(&self, p: usize) -> usize {
        let perm = self.permutation();
        let s = self.setting as i64;
        let contact = perm.wrap(s + p as i64);
        perm.wrap(perm.permute(contact) as i64 - s)
    }

    /// Map `e` through the inverse wiring, offset by the current setting.
    #[inline]
    pub fn convert_backward(&self, e: usize) -> usize {
        let perm = self.permutation();
        let s = self.setting as i64;
        let contact = perm.wrap(s + e as i64);
        perm.wrap(perm.invert(contact) as i64 - s)
    }

    /// Notch positions as symbols.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::NotchQuery`] for fixed rotors, which have no ratchet
    /// ring at all. Reflectors answer with an empty string.
    pub fn notches(&self) -> Result<String> {
        match self.kind() {
            RotorKind::Moving { notches } => {
                let symbols = self.alphabet().symbols();
                Ok(notches.iter().map(|&i| symbols[i]).collect())
            }
            RotorKind::Fixed => Err(EnigmaError::NotchQuery(self.name().to_string())),
            RotorKind::Reflector => Ok(String::new()),
        }
    }

    /// True iff the rotor's current setting is one of its notches.
    #[inline]
    pub fn at_notch(&self) -> bool {
        match self.kind() {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Advance one position.
    ///
    /// # Errors
    ///
    /// [`EnigmaError::IllegalAdvance`] for fixed rotors and reflectors.
    pub fn advance(&mut self) -> Result<()> {
        if !self.rotates() {
            return Err(EnigmaError::IllegalAdvance(self.name().to_string()));
        }
        self.setting = (self.setting + 1) % self.size();
        Ok(())
    }
}

impl std::fmt::Display for Rotor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wiring)
    }
}
