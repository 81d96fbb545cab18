//! Processor state model: register file and dispatcher run state.

/// Register file types and storage model.
pub mod registers;

/// Dispatcher state machine.
pub mod run_state;

pub use registers::{
    Register, RegisterFile, RegisterId, RegisterRow, RegisterSnapshot, REGISTER_COUNT,
};
pub use run_state::DispatchState;
