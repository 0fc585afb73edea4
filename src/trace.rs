//! Per-symbol diagnostics.
//!
//! The machine reports what happens to every converted symbol to a
//! [`StepObserver`] supplied by the caller. Nothing is recorded unless an
//! observer asks for it, and each machine call takes its own observer.

/// What the machine did with one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTrace {
    /// Positions of slots 1.. after stepping, before substitution.
    pub positions: String,
    /// Input symbol.
    pub input: char,
    /// Input after the first plugboard pass.
    pub plugged: char,
    /// Final output symbol.
    pub output: char,
}

impl std::fmt::Display for StepTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} -> {} -> {}",
            self.positions, self.input, self.plugged, self.output
        )
    }
}

/// Receives a [`StepTrace`] for every converted symbol.
pub trait StepObserver {
    /// Whether traces should be built at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Called once per symbol, after its output is known.
    fn observe(&mut self, trace: &StepTrace);
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn enabled(&self) -> bool {
        false
    }

    fn observe(&mut self, _trace: &StepTrace) {}
}

impl StepObserver for Vec<StepTrace> {
    fn observe(&mut self, trace: &StepTrace) {
        self.push(trace.clone());
    }
}

impl<O: StepObserver + ?Sized> StepObserver for &mut O {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn observe(&mut self, trace: &StepTrace) {
        (**self).observe(trace)
    }
}
