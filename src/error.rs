//! Error types for the rotor machine.
//!
//! Every fallible operation in the crate returns [`EnigmaError`]. Variants are
//! grouped into broad categories by [`ErrorKind`] so that callers can tell a
//! malformed configuration apart from a structurally invalid rotor selection
//! or an out-of-range symbol without matching every variant.

use thiserror::Error;

/// Broad category of an [`EnigmaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed alphabet, cycle notation, rotor descriptor or settings line.
    Configuration,
    /// Rotor selection or setting that violates the machine's shape.
    Structural,
    /// Operation a rotor variant does not support.
    Operation,
    /// Index or symbol outside the alphabet.
    Range,
    /// Failure reading input or writing output.
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Structural => write!(f, "structural"),
            Self::Operation => write!(f, "operation"),
            Self::Range => write!(f, "range"),
            Self::Io => write!(f, "i/o"),
        }
    }
}

/// Errors produced while building or running a rotor machine.
#[derive(Debug, Error)]
pub enum EnigmaError {
    // --- configuration ---------------------------------------------------
    /// The alphabet definition contains no symbols.
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    /// A symbol occurs twice in the alphabet definition.
    #[error("duplicate symbol '{0}' in alphabet")]
    DuplicateSymbol(char),

    /// The alphabet uses a character reserved by the notation.
    #[error("symbol {0:?} is reserved and cannot be part of an alphabet")]
    ReservedSymbol(char),

    /// Parentheses in cycle notation do not pair up.
    #[error("unbalanced parenthesis in cycle notation {0:?}")]
    UnbalancedParenthesis(String),

    /// A cycle group `()` contains no symbols.
    #[error("empty cycle in cycle notation {0:?}")]
    EmptyCycle(String),

    /// A cycle group contains a single symbol.
    #[error("cycle ({0}) has a single symbol; cycles need at least two")]
    SingletonCycle(char),

    /// A symbol appears outside any parenthesized group.
    #[error("symbol '{0}' appears outside of a cycle")]
    StraySymbol(char),

    /// A symbol is mapped by more than one position in the cycles.
    #[error("symbol '{0}' appears more than once in cycle notation")]
    DuplicateMapping(char),

    /// The rotor kind tag is not `M<notches>`, `N` or `R`.
    #[error("invalid rotor kind {kind:?} for rotor {name}")]
    InvalidRotorKind {
        /// Rotor being described.
        name: String,
        /// Offending tag.
        kind: String,
    },

    /// A reflector wiring that does not swap symbols in pairs.
    #[error("reflector {name} has a cycle of length {cycle_len}; reflector cycles have at most two symbols")]
    NonInvolutiveReflector {
        /// Reflector name.
        name: String,
        /// Length of its longest cycle.
        cycle_len: usize,
    },

    /// Two catalogue entries share a name.
    #[error("rotor {0} is defined more than once")]
    DuplicateRotorName(String),

    /// Slot and pawl counts cannot describe a machine.
    #[error("invalid machine shape: {num_rotors} slots with {pawls} pawls (need slots >= 2 and slots > pawls)")]
    InvalidSlotCounts {
        /// Number of rotor slots.
        num_rotors: usize,
        /// Number of pawls.
        pawls: usize,
    },

    /// A count in the configuration is not a non-negative integer.
    #[error("expected {expected}, found {found:?}")]
    InvalidCount {
        /// What the parser was looking for.
        expected: &'static str,
        /// Token that was found instead.
        found: String,
    },

    /// The configuration ended before a required item.
    #[error("configuration truncated: missing {0}")]
    TruncatedConfig(&'static str),

    /// A settings line does not start with `*`.
    #[error("settings line must start with '*'")]
    MissingMarker,

    /// A settings line names its rotors but gives no positions.
    #[error("settings line has no initial positions")]
    MissingPositions,

    /// A message line arrived before any settings line.
    #[error("no settings line before first message")]
    MissingSettings,

    /// Two permutations or rotors use different alphabets.
    #[error("{0} does not use the machine alphabet")]
    AlphabetMismatch(String),

    // --- structural ------------------------------------------------------
    /// Number of rotating rotors differs from the pawl count.
    #[error("{found} rotating rotors inserted but the machine has {expected} pawls")]
    PawlMismatch {
        /// Pawl count of the machine.
        expected: usize,
        /// Rotating rotors among the inserted ones.
        found: usize,
    },

    /// Slot 0 does not hold a reflector.
    #[error("slot 0 must hold a reflector, found {0}")]
    MissingReflector(String),

    /// A reflector sits in a slot other than 0.
    #[error("reflector {name} can only sit in slot 0, found in slot {slot}")]
    MisplacedReflector {
        /// Reflector name.
        name: String,
        /// Slot it was placed in.
        slot: usize,
    },

    /// A list has the wrong number of entries.
    #[error("{what}: expected {expected}, got {found}")]
    LengthMismatch {
        /// What was being counted.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// No catalogue entry has the requested name.
    #[error("unknown rotor {0}")]
    UnknownRotor(String),

    /// The same rotor was requested for two slots.
    #[error("rotor {0} named in more than one slot")]
    RepeatedRotor(String),

    /// Operation requires rotors to be inserted first.
    #[error("no rotors inserted")]
    RotorsNotInserted,

    /// The plugboard contains a cycle longer than a pair.
    #[error("plugboard cycles must swap at most two symbols, found a cycle of {0}")]
    InvalidPlugboardCycle(usize),

    // --- operation -------------------------------------------------------
    /// `advance` called on a rotor that does not rotate.
    #[error("rotor {0} does not rotate")]
    IllegalAdvance(String),

    /// Notch query on a fixed rotor.
    #[error("fixed rotor {0} has no notches")]
    NotchQuery(String),

    /// Reflectors only have position 0.
    #[error("reflector {name} has a single position, cannot set to {position}")]
    ImmutablePosition {
        /// Reflector name.
        name: String,
        /// Requested position.
        position: usize,
    },

    // --- range -----------------------------------------------------------
    /// Index outside `[0, size)`.
    #[error("index {index} outside alphabet of size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Alphabet size.
        size: usize,
    },

    /// Symbol not in the alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    UnknownSymbol(char),

    // --- i/o -------------------------------------------------------------
    /// Reading or writing a stream failed.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON configuration could not be (de)serialized.
    #[cfg(feature = "serialization")]
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl EnigmaError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        use EnigmaError::*;
        match self {
            EmptyAlphabet
            | DuplicateSymbol(_)
            | ReservedSymbol(_)
            | UnbalancedParenthesis(_)
            | EmptyCycle(_)
            | SingletonCycle(_)
            | StraySymbol(_)
            | DuplicateMapping(_)
            | InvalidRotorKind { .. }
            | NonInvolutiveReflector { .. }
            | DuplicateRotorName(_)
            | InvalidSlotCounts { .. }
            | InvalidCount { .. }
            | TruncatedConfig(_)
            | MissingMarker
            | MissingPositions
            | MissingSettings
            | AlphabetMismatch(_) => ErrorKind::Configuration,
            PawlMismatch { .. }
            | MissingReflector(_)
            | MisplacedReflector { .. }
            | LengthMismatch { .. }
            | UnknownRotor(_)
            | RepeatedRotor(_)
            | RotorsNotInserted
            | InvalidPlugboardCycle(_) => ErrorKind::Structural,
            IllegalAdvance(_) | NotchQuery(_) | ImmutablePosition { .. } => ErrorKind::Operation,
            IndexOutOfRange { .. } | UnknownSymbol(_) => ErrorKind::Range,
            Io(_) => ErrorKind::Io,
            #[cfg(feature = "serialization")]
            Json(_) => ErrorKind::Configuration,
        }
    }
}

/// A specialized `Result` type for rotor machine operations.
pub type Result<T> = std::result::Result<T, EnigmaError>;
