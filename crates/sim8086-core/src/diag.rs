//! Saturating counters describing decode activity on a processor.

use crate::execute::StepOutcome;
use crate::fault::DecodeFault;

/// Decode statistics accumulated across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodeDiagnostics {
    /// Register-to-register moves executed.
    pub moves_executed: u32,
    /// Unrecognized opcode bytes skipped.
    pub opcodes_skipped: u32,
    /// Stream bytes consumed by successful steps.
    pub bytes_consumed: u32,
    /// Passes aborted on a malformed stream.
    pub faults: u32,
    /// Most recent fault, if any.
    pub last_fault: Option<DecodeFault>,
}

impl DecodeDiagnostics {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one completed step.
    pub fn record_step(&mut self, outcome: StepOutcome) {
        let consumed = match outcome {
            StepOutcome::Executed { .. } => {
                self.moves_executed = self.moves_executed.saturating_add(1);
                2
            }
            StepOutcome::Skipped { .. } => {
                self.opcodes_skipped = self.opcodes_skipped.saturating_add(1);
                1
            }
            StepOutcome::Finished => 0,
        };
        self.bytes_consumed = self.bytes_consumed.saturating_add(consumed);
    }

    /// Counts an aborted pass.
    pub fn record_fault(&mut self, fault: DecodeFault) {
        self.faults = self.faults.saturating_add(1);
        self.last_fault = Some(fault);
    }

    /// Resets every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
