//! Decode-dispatch loop.
//!
//! Each step:
//! 1. Reads the byte at the cursor and classifies its opcode
//! 2. Skips unrecognized opcodes one byte at a time
//! 3. Resolves both operands of a register-to-register move
//! 4. Emits the rendered instruction to the trace sink
//! 5. Applies the transfer to the register file
//! 6. Advances the cursor past the instruction
//!
//! A malformed stream aborts the pass before the faulting instruction touches
//! any register.

mod transfer;

pub use transfer::execute_move;

use crate::api::{TraceEvent, TraceSink};
use crate::decoder::{DecodedInstruction, Decoder, MovInstruction};
use crate::fault::DecodeFault;
use crate::state::{DispatchState, RegisterFile};

/// Result of one dispatcher step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// A register-to-register move was executed.
    Executed {
        /// Offset of the instruction's first byte.
        offset: usize,
        /// The executed instruction.
        instruction: MovInstruction,
    },
    /// An unrecognized opcode byte was skipped.
    Skipped {
        /// Offset of the skipped byte.
        offset: usize,
        /// The skipped byte.
        byte: u8,
    },
    /// The cursor reached the end of the stream.
    Finished,
}

/// Cursor over one instruction stream.
#[derive(Debug, Clone)]
pub struct Dispatcher<'a> {
    stream: &'a [u8],
    cursor: usize,
    state: DispatchState,
}

impl<'a> Dispatcher<'a> {
    /// Starts a pass at offset zero.
    #[must_use]
    pub const fn new(stream: &'a [u8]) -> Self {
        Self {
            stream,
            cursor: 0,
            state: DispatchState::Scanning,
        }
    }

    /// Offset of the next byte to decode.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current state of the pass.
    #[must_use]
    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// Length of the stream being decoded.
    #[must_use]
    pub const fn stream_len(&self) -> usize {
        self.stream.len()
    }

    /// Decodes and executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeFault`] that aborted the pass. Once aborted, every
    /// further call returns the same fault without touching `regs`.
    pub fn step(
        &mut self,
        regs: &mut RegisterFile,
        trace: &mut dyn TraceSink,
    ) -> Result<StepOutcome, DecodeFault> {
        match self.state {
            DispatchState::Done => return Ok(StepOutcome::Finished),
            DispatchState::Aborted(fault) => return Err(fault),
            DispatchState::Scanning => {}
        }

        if self.stream.is_empty() {
            return Err(self.abort(DecodeFault::EmptyStream, trace));
        }

        let offset = self.cursor;
        let decoded = match Decoder::decode_at(self.stream, offset) {
            Ok(decoded) => decoded,
            Err(fault) => return Err(self.abort(fault, trace)),
        };

        let outcome = match decoded {
            DecodedInstruction::Move(instruction) => {
                trace.on_event(TraceEvent::MoveExecuted {
                    offset,
                    instruction,
                });
                execute_move(regs, &instruction);
                StepOutcome::Executed {
                    offset,
                    instruction,
                }
            }
            DecodedInstruction::Unrecognized { byte } => {
                trace.on_event(TraceEvent::OpcodeSkipped { offset, byte });
                StepOutcome::Skipped { offset, byte }
            }
        };

        self.cursor += decoded.byte_len();
        if self.cursor >= self.stream.len() {
            self.state = DispatchState::Done;
        }

        Ok(outcome)
    }

    /// Steps until the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeFault`]; register writes from instructions
    /// that completed before it are kept.
    pub fn run(
        &mut self,
        regs: &mut RegisterFile,
        trace: &mut dyn TraceSink,
    ) -> Result<(), DecodeFault> {
        while self.step(regs, trace)? != StepOutcome::Finished {}
        Ok(())
    }

    fn abort(&mut self, fault: DecodeFault, trace: &mut dyn TraceSink) -> DecodeFault {
        self.state = DispatchState::Aborted(fault);
        trace.on_event(TraceEvent::StreamAborted {
            offset: self.cursor,
            fault,
        });
        fault
    }
}
