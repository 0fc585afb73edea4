//! Machine configuration files.
//!
//! A configuration describes the alphabet, the machine shape and the rotor
//! catalogue. [`MachineConfig::build`] turns it into a [`Machine`] with no
//! rotors inserted yet.
//!
//! # Text format
//!
//! Whitespace separated tokens:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I    MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)
//! II   ME  (BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)
//! Beta N   (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B    R   (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
//! ```
//!
//! 1. the alphabet,
//! 2. the number of slots and the number of pawls,
//! 3. one descriptor per rotor: name, kind (`M` followed by the notch
//!    symbols, `N` for a fixed rotor, `R` for a reflector) and the wiring in
//!    cycle notation. A cycle may be split over several tokens.
//!
//! With the `serialization` feature the same structures can be read from and
//! written to JSON.

use std::str::FromStr;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::RotorWiring;

/// Kind of a catalogue rotor, as written in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum RotorKindSpec {
    /// Moving rotor with its notch symbols.
    Moving {
        /// Notch symbols, possibly empty.
        #[cfg_attr(feature = "serialization", serde(default))]
        notches: String,
    },
    /// Non-moving rotor.
    Fixed,
    /// Reflector.
    Reflector,
}

impl RotorKindSpec {
    /// Parse a kind tag: `M<notches>`, `N` or `R`.
    pub fn parse_tag(name: &str, tag: &str) -> Result<Self> {
        match tag {
            "N" => Ok(Self::Fixed),
            "R" => Ok(Self::Reflector),
            _ => match tag.strip_prefix('M') {
                Some(notches) => Ok(Self::Moving {
                    notches: notches.to_string(),
                }),
                None => Err(EnigmaError::InvalidRotorKind {
                    name: name.to_string(),
                    kind: tag.to_string(),
                }),
            },
        }
    }
}

impl std::fmt::Display for RotorKindSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moving { notches } => write!(f, "M{}", notches),
            Self::Fixed => write!(f, "N"),
            Self::Reflector => write!(f, "R"),
        }
    }
}

/// One rotor of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RotorSpec {
    /// Catalogue name.
    pub name: String,
    /// Kind and notches.
    #[cfg_attr(feature = "serialization", serde(flatten))]
    pub kind: RotorKindSpec,
    /// Wiring in cycle notation.
    #[cfg_attr(feature = "serialization", serde(default))]
    pub cycles: String,
}

impl RotorSpec {
    /// Build the immutable template over `alphabet`.
    pub fn to_wiring(&self, alphabet: &Arc<Alphabet>) -> Result<RotorWiring> {
        let permutation = Permutation::parse(&self.cycles, alphabet.clone())?;
        Ok(match &self.kind {
            RotorKindSpec::Moving { notches } => {
                RotorWiring::moving(self.name.clone(), permutation, notches)?
            }
            RotorKindSpec::Fixed => RotorWiring::fixed(self.name.clone(), permutation),
            RotorKindSpec::Reflector => RotorWiring::reflector(self.name.clone(), permutation)?,
        })
    }
}

/// Alphabet, machine shape and rotor catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct MachineConfig {
    /// Alphabet symbols in index order.
    pub alphabet: String,
    /// Number of rotor slots, reflector included.
    pub num_rotors: usize,
    /// Number of pawls.
    pub pawls: usize,
    /// Available rotors.
    pub rotors: Vec<RotorSpec>,
}

impl MachineConfig {
    /// Parse the text format.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::TruncatedConfig`] when a required token is missing
    /// - [`EnigmaError::InvalidCount`] for a slot or pawl count that is not
    ///   a number, or a third number
    /// - [`EnigmaError::InvalidRotorKind`] for an unknown kind tag
    ///
    /// Alphabet and wiring are only checked by [`build`](Self::build).
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet = tokens
            .next()
            .ok_or(EnigmaError::TruncatedConfig("alphabet"))?
            .to_string();
        let num_rotors = parse_count(tokens.next(), "number of rotor slots")?;
        let pawls = parse_count(tokens.next(), "number of pawls")?;

        if let Some(extra) = tokens.peek() {
            if extra.parse::<i64>().is_ok() {
                return Err(EnigmaError::InvalidCount {
                    expected: "rotor name",
                    found: extra.to_string(),
                });
            }
        }

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            let tag = tokens
                .next()
                .ok_or(EnigmaError::TruncatedConfig("rotor kind"))?;
            let kind = RotorKindSpec::parse_tag(name, tag)?;

            let mut cycles = String::new();
            let mut depth = 0i32;
            while let Some(&token) = tokens.peek() {
                if depth == 0 && !token.starts_with('(') {
                    break;
                }
                for ch in token.chars() {
                    match ch {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        _ => {}
                    }
                }
                if !cycles.is_empty() {
                    cycles.push(' ');
                }
                cycles.push_str(token);
                tokens.next();
            }

            rotors.push(RotorSpec {
                name: name.to_string(),
                kind,
                cycles,
            });
        }

        Ok(Self {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Validate every part and build a machine with no rotors inserted.
    pub fn build(&self) -> Result<Machine> {
        let alphabet = Arc::new(Alphabet::new(&self.alphabet)?);
        let catalogue = self
            .rotors
            .iter()
            .map(|spec| spec.to_wiring(&alphabet))
            .collect::<Result<Vec<_>>>()?;
        Machine::new(alphabet, self.num_rotors, self.pawls, catalogue)
    }

    /// Read a JSON configuration.
    #[cfg(feature = "serialization")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write this configuration as pretty-printed JSON.
    #[cfg(feature = "serialization")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromStr for MachineConfig {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for MachineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.alphabet)?;
        writeln!(f, "{} {}", self.num_rotors, self.pawls)?;
        for rotor in &self.rotors {
            writeln!(f, "{} {} {}", rotor.name, rotor.kind, rotor.cycles)?;
        }
        Ok(())
    }
}

fn parse_count(token: Option<&str>, expected: &'static str) -> Result<usize> {
    let token = token.ok_or(EnigmaError::TruncatedConfig(expected))?;
    token.parse().map_err(|_| EnigmaError::InvalidCount {
        expected,
        found: token.to_string(),
    })
}
