//! Decoder and register-file model for 8086 register-to-register moves.

/// Processor state: register file and dispatcher state machine.
pub mod state;
pub use state::{
    DispatchState, Register, RegisterFile, RegisterId, RegisterRow, RegisterSnapshot,
    REGISTER_COUNT,
};

/// Bit-mask field extraction for instruction and addressing bytes.
pub mod encoding;
pub use encoding::{
    classify_opcode, AddressingFields, AddressingMode, Direction, FieldIndex, InstructionFields,
    OpcodeClass, OperandSelector, Width, MASK_DIRECTION, MASK_MOD, MASK_OPCODE, MASK_REG,
    MASK_RM, MASK_WIDTH, MOV_REGISTER_OPCODE,
};

/// Operand field to register lookup tables.
pub mod resolver;
pub use resolver::{resolve, resolve_width, OperandRef, Section, BYTE_OPERANDS, WORD_OPERANDS};

/// Instruction boundary detection and move decoding.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder, MovInstruction};

/// Malformed-stream fault taxonomy.
pub mod fault;
pub use fault::DecodeFault;

/// Decode-dispatch loop and register transfer.
pub mod execute;
pub use execute::{execute_move, Dispatcher, StepOutcome};

/// Host-facing processor API, configuration, and trace hooks.
pub mod api;
pub use api::{
    DecodeConfig, DecodeReport, InstructionStream, NullTrace, Processor, TraceEvent, TraceLog,
    TraceSink, DEFAULT_PROCESSOR_NAME,
};

/// Saturating decode counters.
pub mod diag;
pub use diag::DecodeDiagnostics;

/// Static listing of an instruction stream.
pub mod disasm;
pub use disasm::{disassemble, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
