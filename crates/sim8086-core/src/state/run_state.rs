use crate::DecodeFault;

/// Dispatcher state for one pass over an instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchState {
    /// Cursor is inside the stream; the next step decodes an instruction.
    #[default]
    Scanning,
    /// Cursor reached the end of the stream.
    Done,
    /// The pass stopped on a malformed stream and makes no further progress.
    Aborted(DecodeFault),
}

impl DispatchState {
    /// Returns `true` once no further steps will make progress.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Scanning)
    }

    /// Returns the fault that aborted the pass, if any.
    #[must_use]
    pub const fn fault(self) -> Option<DecodeFault> {
        match self {
            Self::Aborted(fault) => Some(fault),
            Self::Scanning | Self::Done => None,
        }
    }
}
