//! # libenigma
//!
//! Simulation of electromechanical rotor cipher machines.
//!
//! A machine is built from four parts:
//!
//! - an [`Alphabet`](alphabet::Alphabet) mapping symbols to dense indices,
//! - [`Permutation`](permutation::Permutation)s written in cycle notation,
//! - rotors ([`RotorWiring`](rotor::RotorWiring) templates placed into
//!   [`Rotor`](rotor::Rotor) slots) that are moving, fixed or reflecting,
//! - the [`Machine`](machine::Machine), which steps the rotors and sends each
//!   symbol through plugboard, rotors, reflector and back.
//!
//! Encryption and decryption are the same operation: a machine started from
//! the same settings turns the ciphertext back into the plaintext.
//!
//! ## Example
//!
//! ```rust
//! use libenigma::prelude::*;
//!
//! let config = MachineConfig::parse(
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ 4 3
//!      I   MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)
//!      II  ME (BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)
//!      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
//!      B   R  (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
//! )
//! .unwrap();
//!
//! let mut machine = config.build().unwrap();
//! Settings::parse("* B I II III AAA", machine.num_rotors())
//!     .unwrap()
//!     .apply(&mut machine)
//!     .unwrap();
//! assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod settings;
pub mod stream;
pub mod trace;

/// Command-line front end
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::alphabet::Alphabet;
    pub use crate::config::{MachineConfig, RotorKindSpec, RotorSpec};
    pub use crate::error::{EnigmaError, ErrorKind};
    pub use crate::machine::Machine;
    pub use crate::permutation::Permutation;
    pub use crate::rotor::{Rotor, RotorKind, RotorWiring};
    pub use crate::settings::Settings;
    pub use crate::stream::{group_five, process, ProcessStats};
    pub use crate::trace::{NoopObserver, StepObserver, StepTrace};
}
