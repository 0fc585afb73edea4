//! Settings directives.
//!
//! A settings line selects the rotors, their initial positions and the
//! plugboard for the messages that follow it:
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! ```
//!
//! The `*` marker is followed by one rotor name per slot (reflector first),
//! the positions of every slot except the reflector, and optionally the
//! plugboard in cycle notation.

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Marker that introduces a settings line.
pub const MARKER: char = '*';

/// A parsed settings directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial positions of slots 1..
    pub positions: String,
    /// Plugboard in cycle notation; empty for none.
    pub plugboard: String,
}

impl Settings {
    /// True if `line` is a settings directive rather than a message.
    pub fn is_directive(line: &str) -> bool {
        line.contains(MARKER)
    }

    /// Parse `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    ///
    /// - [`EnigmaError::MissingMarker`] unless the line starts with `*`
    /// - [`EnigmaError::LengthMismatch`] if fewer than `num_rotors` names follow
    /// - [`EnigmaError::MissingPositions`] if no position string follows
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let rest = line
            .trim_start()
            .strip_prefix(MARKER)
            .ok_or(EnigmaError::MissingMarker)?;
        let mut tokens = rest.split_whitespace();

        let rotors: Vec<String> = tokens
            .by_ref()
            .take(num_rotors)
            .map(str::to_string)
            .collect();
        if rotors.len() != num_rotors {
            return Err(EnigmaError::LengthMismatch {
                what: "rotor names",
                expected: num_rotors,
                found: rotors.len(),
            });
        }

        let positions = tokens
            .next()
            .ok_or(EnigmaError::MissingPositions)?
            .to_string();
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Self {
            rotors,
            positions,
            plugboard,
        })
    }

    /// Insert the rotors, set their positions and install the plugboard.
    ///
    /// The machine changes only if every step succeeds; on error it keeps
    /// its previous rotors, positions and plugboard.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::parse(&self.plugboard, machine.alphabet().clone())?;

        let mut staged = machine.clone();
        staged.insert_rotors(&self.rotors)?;
        staged.set_rotors(&self.positions)?;
        staged.set_plugboard(plugboard)?;

        *machine = staged;
        Ok(())
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", MARKER, self.rotors.join(" "), self.positions)?;
        if !self.plugboard.is_empty() {
            write!(f, " {}", self.plugboard)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;

    const CONFIG: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 4 3
        I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)
        II ME (BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)
        III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
        B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";

    #[test]
    fn test_parse_full_line() {
        let settings = Settings::parse("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)", 5).unwrap();
        assert_eq!(settings.rotors, vec!["B", "Beta", "III", "IV", "I"]);
        assert_eq!(settings.positions, "AXLE");
        assert_eq!(settings.plugboard, "(HQ) (EX) (IP) (TR) (BY)");
        assert_eq!(
            settings.to_string(),
            "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)"
        );
    }

    #[test]
    fn test_marker_attached_to_name() {
        let settings = Settings::parse("  *B I II III AAA", 4).unwrap();
        assert_eq!(settings.rotors[0], "B");
        assert!(settings.plugboard.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Settings::parse("B I II III AAA", 4),
            Err(EnigmaError::MissingMarker)
        ));
        assert!(matches!(
            Settings::parse("* B I II", 4),
            Err(EnigmaError::LengthMismatch { expected: 4, found: 3, .. })
        ));
        assert!(matches!(
            Settings::parse("* B I II III", 4),
            Err(EnigmaError::MissingPositions)
        ));
    }

    #[test]
    fn test_apply() {
        let mut machine = MachineConfig::parse(CONFIG).unwrap().build().unwrap();
        Settings::parse("* B I II III AAA", 4)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");

        Settings::parse("* B I II III AAA (AB) (CD)", 4)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.positions(), "AAA");
        assert_eq!(machine.convert("HELLOWORLD").unwrap(), "ILACBBMTBE");
    }

    #[test]
    fn test_apply_rejects_long_plugboard_cycle() {
        let mut machine = MachineConfig::parse(CONFIG).unwrap().build().unwrap();
        let result = Settings::parse("* B I II III AAA (ABC)", 4)
            .unwrap()
            .apply(&mut machine);
        assert!(matches!(result, Err(EnigmaError::InvalidPlugboardCycle(3))));
    }

    fn snapshot(machine: &Machine) -> (Vec<String>, String, String) {
        (
            machine.rotors().iter().map(|r| r.name().to_string()).collect(),
            machine.positions(),
            machine.plugboard().to_string(),
        )
    }

    #[test]
    fn test_apply_failure_leaves_machine_untouched() {
        let mut machine = MachineConfig::parse(CONFIG).unwrap().build().unwrap();
        Settings::parse("* B I II III AAA (AB)", 4)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        machine.convert("HELLO").unwrap();
        let before = snapshot(&machine);
        assert_eq!(before.1, "AAF");
        assert_eq!(before.2, "(AB)");

        let bad_position = Settings::parse("* B III II I A?A (CD)", 4)
            .unwrap()
            .apply(&mut machine);
        assert!(matches!(bad_position, Err(EnigmaError::UnknownSymbol('?'))));
        assert_eq!(snapshot(&machine), before);

        let long_cycle = Settings::parse("* B II I III AAA (ABC)", 4)
            .unwrap()
            .apply(&mut machine);
        assert!(matches!(long_cycle, Err(EnigmaError::InvalidPlugboardCycle(3))));
        assert_eq!(snapshot(&machine), before);

        let short_setting = Settings::parse("* B III II I AA", 4)
            .unwrap()
            .apply(&mut machine);
        assert!(matches!(short_setting, Err(EnigmaError::LengthMismatch { .. })));
        assert_eq!(snapshot(&machine), before);

        let bad_board = Settings::parse("* B III II I AAA (A", 4)
            .unwrap()
            .apply(&mut machine);
        assert!(matches!(bad_board, Err(EnigmaError::UnbalancedParenthesis(_))));
        assert_eq!(snapshot(&machine), before);
    }
}
