//! The complete rotor machine.
//!
//! A [`Machine`] holds an ordered sequence of rotor slots and a plugboard.
//! Slot 0 holds the reflector, slot `num_rotors - 1` the fast rotor.
//!
//! # Conversion pipeline
//!
//! For each symbol the machine first steps its rotors, then sends the signal
//!
//! 1. through the plugboard,
//! 2. forward through every slot from the rightmost down to the reflector,
//! 3. backward through slots 1 up to the rightmost,
//! 4. through the plugboard again.
//!
//! Because the reflector is an involution the whole pipeline is its own
//! inverse: a second machine started from the same settings decrypts what
//! the first one encrypted.
//!
//! # Stepping
//!
//! The rightmost rotor always advances. A rotor standing at one of its
//! notches advances together with its left neighbour, provided that
//! neighbour rotates. All decisions are taken from the positions before the
//! step, which reproduces the double stepping of the middle rotor.
//!
//! # Example
//!
//! ```rust
//! use libenigma::prelude::*;
//! use std::sync::Arc;
//!
//! let alpha = Arc::new(Alphabet::default());
//! let wiring = |cycles: &str| Permutation::parse(cycles, alpha.clone()).unwrap();
//! let catalogue = vec![
//!     RotorWiring::reflector(
//!         "B",
//!         wiring("(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)"),
//!     )
//!     .unwrap(),
//!     RotorWiring::moving("I", wiring("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)"), "Q").unwrap(),
//!     RotorWiring::moving("II", wiring("(BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)"), "E").unwrap(),
//!     RotorWiring::moving("III", wiring("(ABDHPEJT) (CFLVMZOYQIRWUKXSG)"), "V").unwrap(),
//! ];
//!
//! let mut machine = Machine::new(alpha.clone(), 4, 3, catalogue).unwrap();
//! machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorWiring};
use crate::trace::{NoopObserver, StepObserver, StepTrace};

/// A rotor machine: catalogue, slots and plugboard.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalogue: Vec<Arc<RotorWiring>>,
    by_name: FxHashMap<String, usize>,
    slots: Vec<Rotor>,
    plugboard: Permutation,
}

impl Machine {
    /// A machine over `alphabet` with `num_rotors` slots and `pawls` pawls,
    /// choosing its rotors from `catalogue`.
    ///
    /// No rotors are inserted yet and the plugboard is the identity.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::InvalidSlotCounts`] unless `num_rotors >= 2` and
    ///   `num_rotors > pawls`
    /// - [`EnigmaError::DuplicateRotorName`] if two templates share a name
    /// - [`EnigmaError::AlphabetMismatch`] if a template uses another alphabet
    pub fn new<I>(alphabet: Arc<Alphabet>, num_rotors: usize, pawls: usize, catalogue: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Arc<RotorWiring>>,
    {
        if num_rotors < 2 || num_rotors <= pawls {
            return Err(EnigmaError::InvalidSlotCounts { num_rotors, pawls });
        }

        let mut templates = Vec::new();
        let mut by_name = FxHashMap::default();
        for wiring in catalogue {
            let wiring: Arc<RotorWiring> = wiring.into();
            if **wiring.alphabet() != *alphabet {
                return Err(EnigmaError::AlphabetMismatch(wiring.to_string()));
            }
            if by_name
                .insert(wiring.name().to_string(), templates.len())
                .is_some()
            {
                return Err(EnigmaError::DuplicateRotorName(wiring.name().to_string()));
            }
            templates.push(wiring);
        }

        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Self {
            alphabet,
            num_rotors,
            pawls,
            catalogue: templates,
            by_name,
            slots: Vec::new(),
            plugboard,
        })
    }

    /// Common alphabet of the machine.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of rotor slots, reflector included.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and so of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Every template the machine can choose from, in catalogue order.
    pub fn catalogue(&self) -> &[Arc<RotorWiring>] {
        &self.catalogue
    }

    /// Rotor in slot `k`; slot 0 is the reflector. `None` before insertion.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k)
    }

    /// All occupied slots, left to right.
    pub fn rotors(&self) -> &[Rotor] {
        &self.slots
    }

    /// Current plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Fill the slots with the rotors named `names`, left to right.
    ///
    /// `names[0]` names the reflector. Every rotor starts at setting 0. Each
    /// call replaces the whole slot sequence; if validation fails the
    /// previous slots stay in place.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::LengthMismatch`] unless `names.len() == num_rotors()`
    /// - [`EnigmaError::UnknownRotor`] for a name missing from the catalogue
    /// - [`EnigmaError::RepeatedRotor`] if a name is given twice
    /// - [`EnigmaError::PawlMismatch`] unless exactly `num_pawls()` rotors rotate
    /// - [`EnigmaError::MissingReflector`] unless slot 0 is a reflector
    /// - [`EnigmaError::MisplacedReflector`] for a reflector in another slot
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::LengthMismatch {
                what: "rotor names",
                expected: self.num_rotors,
                found: names.len(),
            });
        }

        let mut slots: Vec<Rotor> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let &index = self
                .by_name
                .get(name)
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            if slots.iter().any(|r| r.name() == name) {
                return Err(EnigmaError::RepeatedRotor(name.to_string()));
            }
            slots.push(Rotor::new(self.catalogue[index].clone()));
        }

        let rotating = slots.iter().filter(|r| r.rotates()).count();
        if rotating != self.pawls {
            return Err(EnigmaError::PawlMismatch {
                expected: self.pawls,
                found: rotating,
            });
        }
        if !slots[0].reflects() {
            return Err(EnigmaError::MissingReflector(slots[0].name().to_string()));
        }
        if let Some((slot, rotor)) = slots.iter().enumerate().skip(1).find(|(_, r)| r.reflects()) {
            return Err(EnigmaError::MisplacedReflector {
                name: rotor.name().to_string(),
                slot,
            });
        }

        self.slots = slots;
        Ok(())
    }

    /// Set slots 1.. to the positions named by the symbols of `setting`.
    ///
    /// The first symbol is the leftmost rotor after the reflector.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::RotorsNotInserted`] before a successful insertion
    /// - [`EnigmaError::LengthMismatch`] unless `setting` has
    ///   `num_rotors() - 1` symbols
    /// - [`EnigmaError::UnknownSymbol`] for a symbol outside the alphabet
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        self.ensure_inserted()?;
        let symbols: Vec<char> = setting.chars().collect();
        if symbols.len() != self.num_rotors - 1 {
            return Err(EnigmaError::LengthMismatch {
                what: "rotor setting",
                expected: self.num_rotors - 1,
                found: symbols.len(),
            });
        }
        let positions = symbols
            .iter()
            .map(|&c| self.alphabet.to_int(c))
            .collect::<Result<Vec<_>>>()?;
        for (rotor, posn) in self.slots[1..].iter_mut().zip(positions) {
            rotor.set(posn)?;
        }
        Ok(())
    }

    /// Replace the plugboard.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::InvalidPlugboardCycle`] for a cycle longer than 2
    /// - [`EnigmaError::AlphabetMismatch`] if `plugboard` uses another alphabet
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::AlphabetMismatch("plugboard".to_string()));
        }
        let longest = plugboard.max_cycle_len();
        if longest > 2 {
            return Err(EnigmaError::InvalidPlugboardCycle(longest));
        }
        self.plugboard = plugboard;
        Ok(())
    }

    /// Positions of slots 1.. as symbols, left to right.
    pub fn positions(&self) -> String {
        let symbols = self.alphabet.symbols();
        self.slots
            .iter()
            .skip(1)
            .map(|r| symbols[r.setting()])
            .collect()
    }

    /// Step the machine, then convert the symbol with index `c`.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::RotorsNotInserted`] before a successful insertion
    /// - [`EnigmaError::IndexOutOfRange`] unless `c < alphabet().size()`
    pub fn convert_index(&mut self, c: usize) -> Result<usize> {
        self.convert_index_with(c, NoopObserver)
    }

    /// [`convert_index`](Self::convert_index), reporting to `observer`.
    pub fn convert_index_with<O: StepObserver>(&mut self, c: usize, mut observer: O) -> Result<usize> {
        self.ensure_inserted()?;
        let input = self.alphabet.to_char(c)?;

        self.advance_rotors()?;

        let plugged = self.plugboard.permute(c);
        let output = self.plugboard.permute(self.apply_rotors(plugged));

        if observer.enabled() {
            let symbols = self.alphabet.symbols();
            observer.observe(&StepTrace {
                positions: self.positions(),
                input,
                plugged: symbols[plugged],
                output: symbols[output],
            });
        }

        Ok(output)
    }

    /// Convert `msg`, ignoring whitespace.
    ///
    /// Every symbol is checked before the first rotor moves, so a message
    /// with an unknown symbol leaves the machine untouched.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::RotorsNotInserted`] before a successful insertion
    /// - [`EnigmaError::UnknownSymbol`] for a symbol outside the alphabet
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        self.convert_with(msg, NoopObserver)
    }

    /// [`convert`](Self::convert), reporting each symbol to `observer`.
    pub fn convert_with<O: StepObserver>(&mut self, msg: &str, mut observer: O) -> Result<String> {
        self.ensure_inserted()?;
        let indices = msg
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<_>>>()?;

        let mut result = String::with_capacity(indices.len());
        for index in indices {
            let converted = self.convert_index_with(index, &mut observer)?;
            result.push(self.alphabet.symbols()[converted]);
        }
        Ok(result)
    }

    fn ensure_inserted(&self) -> Result<()> {
        if self.slots.is_empty() {
            Err(EnigmaError::RotorsNotInserted)
        } else {
            Ok(())
        }
    }

    /// Advance the rotors that move on this keypress.
    fn advance_rotors(&mut self) -> Result<()> {
        let n = self.slots.len();
        let mut marked = vec![false; n];
        marked[n - 1] = self.slots[n - 1].rotates();

        for i in (1..n).rev() {
            if self.slots[i].at_notch() && self.slots[i - 1].rotates() {
                marked[i] = true;
                marked[i - 1] = true;
            }
        }

        for (rotor, _) in self.slots.iter_mut().zip(marked).skip(1).filter(|(_, m)| *m) {
            rotor.advance()?;
        }
        Ok(())
    }

    /// Send `c` forward through every slot and back through slots 1...
    fn apply_rotors(&self, c: usize) -> usize {
        let forward = self
            .slots
            .iter()
            .rev()
            .fold(c, |c, rotor| rotor.convert_forward(c));
        self.slots
            .iter()
            .skip(1)
            .fold(forward, |c, rotor| rotor.convert_backward(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFLECTOR_B: &str =
        "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";
    const ROTOR_I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)";
    const ROTOR_II: &str = "(BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)";
    const ROTOR_III: &str = "(ABDHPEJT) (CFLVMZOYQIRWUKXSG)";
    const BETA: &str = "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)";

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn catalogue(alpha: &Arc<Alphabet>) -> Vec<RotorWiring> {
        let p = |c: &str| Permutation::parse(c, alpha.clone()).unwrap();
        vec![
            RotorWiring::reflector("B", p(REFLECTOR_B)).unwrap(),
            RotorWiring::moving("I", p(ROTOR_I), "Q").unwrap(),
            RotorWiring::moving("II", p(ROTOR_II), "E").unwrap(),
            RotorWiring::moving("III", p(ROTOR_III), "V").unwrap(),
            RotorWiring::fixed("Beta", p(BETA)),
        ]
    }

    fn machine() -> Machine {
        let alpha = upper();
        let cat = catalogue(&alpha);
        Machine::new(alpha, 4, 3, cat).unwrap()
    }

    fn ready(setting: &str) -> Machine {
        let mut m = machine();
        m.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        m.set_rotors(setting).unwrap();
        m
    }

    #[test]
    fn test_reference_vector() {
        let mut m = ready("AAA");
        assert_eq!(m.convert("AAAAA").unwrap(), "BDZGO");
        assert_eq!(m.positions(), "AAF");
    }

    #[test]
    fn test_reciprocal() {
        let mut enc = ready("QEV");
        let mut dec = ready("QEV");
        let plain = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
        let cipher = enc.convert(plain).unwrap();
        assert_ne!(cipher, plain);
        assert_eq!(dec.convert(&cipher).unwrap(), plain);
    }

    #[test]
    fn test_double_step() {
        let mut m = ready("ADU");
        let mut traces: Vec<StepTrace> = Vec::new();
        m.convert_with("AAA", &mut traces).unwrap();
        let positions: Vec<&str> = traces.iter().map(|t| t.positions.as_str()).collect();
        assert_eq!(positions, vec!["ADV", "AEW", "BFX"]);
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let mut a = ready("AAA");
        let mut b = ready("AAA");
        assert_eq!(
            a.convert("HELLO WORLD").unwrap(),
            b.convert("HELLOWORLD").unwrap()
        );
        assert_eq!(ready("AAA").convert("HELLO WORLD").unwrap(), "ILBDAAMTAZ");
        assert_eq!(ready("AAA").convert("").unwrap(), "");
    }

    #[test]
    fn test_plugboard_applied_both_ways() {
        let mut m = ready("AAA");
        let alpha = m.alphabet().clone();
        m.set_plugboard(Permutation::parse("(AB) (CD)", alpha).unwrap())
            .unwrap();
        assert_eq!(m.convert("HELLOWORLD").unwrap(), "ILACBBMTBE");
    }

    #[test]
    fn test_unknown_symbol_leaves_state() {
        let mut m = ready("AAA");
        assert!(matches!(
            m.convert("AB?CD"),
            Err(EnigmaError::UnknownSymbol('?'))
        ));
        assert_eq!(m.positions(), "AAA");
    }

    #[test]
    fn test_convert_index_range() {
        let mut m = ready("AAA");
        assert!(matches!(
            m.convert_index(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        ));
        assert_eq!(m.convert_index(0).unwrap(), 1);
    }

    #[test]
    fn test_convert_before_insert() {
        let mut m = machine();
        assert!(matches!(m.convert("A"), Err(EnigmaError::RotorsNotInserted)));
        assert!(matches!(m.set_rotors("AAA"), Err(EnigmaError::RotorsNotInserted)));
    }

    #[test]
    fn test_insert_validation() {
        let mut m = machine();
        assert!(matches!(
            m.insert_rotors(&["B", "I", "II"]),
            Err(EnigmaError::LengthMismatch { expected: 4, found: 3, .. })
        ));
        assert!(matches!(
            m.insert_rotors(&["B", "I", "II", "IV"]),
            Err(EnigmaError::UnknownRotor(name)) if name == "IV"
        ));
        assert!(matches!(
            m.insert_rotors(&["B", "I", "I", "III"]),
            Err(EnigmaError::RepeatedRotor(_))
        ));
        assert!(matches!(
            m.insert_rotors(&["B", "Beta", "II", "III"]),
            Err(EnigmaError::PawlMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(
            m.insert_rotors(&["I", "II", "III", "B"]),
            Err(EnigmaError::MissingReflector(_))
        ));
    }

    #[test]
    fn test_reflector_outside_slot_zero() {
        let alpha = upper();
        let mut cat = catalogue(&alpha);
        cat.push(RotorWiring::reflector(
            "C",
            Permutation::parse(
                "(AF) (BV) (CP) (DJ) (EI) (GO) (HY) (KR) (LZ) (MX) (NW) (QT) (SU)",
                alpha.clone(),
            )
            .unwrap(),
        )
        .unwrap());
        let mut m = Machine::new(alpha, 4, 2, cat).unwrap();
        assert!(matches!(
            m.insert_rotors(&["B", "C", "II", "III"]),
            Err(EnigmaError::MisplacedReflector { slot: 1, .. })
        ));
    }

    #[test]
    fn test_failed_insert_keeps_previous_slots() {
        let mut m = ready("XYZ");
        assert!(m.insert_rotors(&["B", "I", "Beta", "III"]).is_err());
        assert_eq!(m.rotor(2).map(|r| r.name()), Some("II"));
        assert_eq!(m.positions(), "XYZ");
    }

    #[test]
    fn test_reinsert_replaces_and_resets() {
        let mut m = ready("XYZ");
        m.insert_rotors(&["B", "III", "I", "II"]).unwrap();
        let names: Vec<&str> = m.rotors().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["B", "III", "I", "II"]);
        assert_eq!(m.positions(), "AAA");
    }

    #[test]
    fn test_set_rotors_validation() {
        let mut m = ready("AAA");
        assert!(matches!(
            m.set_rotors("AAAA"),
            Err(EnigmaError::LengthMismatch { expected: 3, found: 4, .. })
        ));
        assert!(matches!(m.set_rotors("Aa1"), Err(EnigmaError::UnknownSymbol('a'))));
        assert_eq!(m.positions(), "AAA");
        m.set_rotors("MCK").unwrap();
        assert_eq!(m.positions(), "MCK");
        assert_eq!(m.rotor(0).unwrap().setting(), 0);
    }

    #[test]
    fn test_plugboard_rejects_long_cycles() {
        let mut m = ready("AAA");
        let alpha = m.alphabet().clone();
        assert!(matches!(
            m.set_plugboard(Permutation::parse("(ABC)", alpha).unwrap()),
            Err(EnigmaError::InvalidPlugboardCycle(3))
        ));
        assert!(m.plugboard().is_identity());
    }

    #[test]
    fn test_plugboard_alphabet_mismatch() {
        let mut m = ready("AAA");
        let other = Arc::new(Alphabet::new("ABCD").unwrap());
        assert!(matches!(
            m.set_plugboard(Permutation::parse("(AB)", other).unwrap()),
            Err(EnigmaError::AlphabetMismatch(_))
        ));
    }

    #[test]
    fn test_new_validation() {
        let alpha = upper();
        assert!(matches!(
            Machine::new(alpha.clone(), 3, 3, catalogue(&alpha)),
            Err(EnigmaError::InvalidSlotCounts { .. })
        ));
        assert!(matches!(
            Machine::new(alpha.clone(), 1, 0, catalogue(&alpha)),
            Err(EnigmaError::InvalidSlotCounts { .. })
        ));
        let mut dup = catalogue(&alpha);
        dup.push(dup[1].clone());
        assert!(matches!(
            Machine::new(alpha.clone(), 4, 3, dup),
            Err(EnigmaError::DuplicateRotorName(name)) if name == "I"
        ));
        let other = Arc::new(Alphabet::new("ABCD").unwrap());
        let foreign = RotorWiring::fixed("X", Permutation::parse("(AB)", other).unwrap());
        assert!(matches!(
            Machine::new(alpha, 4, 3, vec![foreign]),
            Err(EnigmaError::AlphabetMismatch(_))
        ));
    }

    #[test]
    fn test_single_rotor_period() {
        let alpha = upper();
        let mut m = Machine::new(alpha.clone(), 2, 1, catalogue(&alpha)).unwrap();
        m.insert_rotors(&["B", "III"]).unwrap();
        m.set_rotors("A").unwrap();
        for _ in 0..26 {
            m.convert_index(0).unwrap();
        }
        assert_eq!(m.positions(), "A");
    }

    #[test]
    fn test_fixed_rightmost_does_not_step() {
        let alpha = upper();
        let mut m = Machine::new(alpha.clone(), 3, 1, catalogue(&alpha)).unwrap();
        m.insert_rotors(&["B", "I", "Beta"]).unwrap();
        m.set_rotors("AA").unwrap();
        m.convert("ABC").unwrap();
        assert_eq!(m.positions(), "AA");
    }

    #[test]
    fn test_shared_templates_between_machines() {
        let alpha = upper();
        let cat: Vec<Arc<RotorWiring>> = catalogue(&alpha).into_iter().map(Arc::new).collect();
        let mut a = Machine::new(alpha.clone(), 4, 3, cat.clone()).unwrap();
        let mut b = Machine::new(alpha, 4, 3, cat).unwrap();
        a.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        b.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        a.convert("AAAAA").unwrap();
        assert_eq!(a.positions(), "AAF");
        assert_eq!(b.positions(), "AAA");
    }

    #[test]
    fn test_machine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Machine>();
    }
}
