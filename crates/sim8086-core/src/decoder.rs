//! Instruction boundary detection and operand resolution.
//!
//! The decoder looks at the byte at an offset, decides how many bytes the
//! instruction occupies, and for register-to-register moves resolves both
//! operands. It never mutates registers.

use core::fmt;

use crate::encoding::{
    AddressingFields, AddressingMode, Direction, FieldIndex, InstructionFields, OpcodeClass,
    OperandSelector, Width, MOV_REGISTER_OPCODE,
};
use crate::fault::DecodeFault;
use crate::resolver::{resolve, OperandRef};

/// A decoded register-to-register `mov`.
///
/// Both operands are resolved from the same width bit, so they always have
/// the same width. Values of this type only come from [`MovInstruction::new`]
/// or the decoder, which keeps that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovInstruction {
    selector: OperandSelector,
    mode: AddressingMode,
    reg: FieldIndex,
    rm: FieldIndex,
    dest: OperandRef,
    src: OperandRef,
}

impl MovInstruction {
    /// Builds a register-to-register move from its encoded fields.
    #[must_use]
    pub const fn new(direction: Direction, width: Width, reg: FieldIndex, rm: FieldIndex) -> Self {
        Self::from_fields(
            OperandSelector::new(direction, width),
            AddressingFields {
                mode: AddressingMode::Register,
                reg,
                rm,
            },
        )
    }

    const fn from_fields(selector: OperandSelector, addressing: AddressingFields) -> Self {
        let reg_operand = resolve(selector, addressing.reg);
        let rm_operand = resolve(selector, addressing.rm);
        let (dest, src) = match selector.direction() {
            Direction::RegIsDestination => (reg_operand, rm_operand),
            Direction::RegIsSource => (rm_operand, reg_operand),
        };
        Self {
            selector,
            mode: addressing.mode,
            reg: addressing.reg,
            rm: addressing.rm,
            dest,
            src,
        }
    }

    /// Decodes a move from its two bytes.
    ///
    /// Returns `None` unless `first` carries the move opcode. The `mod` field
    /// of `second` does not affect the operands: `reg` and `r/m` both resolve
    /// to registers.
    #[must_use]
    pub const fn from_bytes(first: u8, second: u8) -> Option<Self> {
        let fields = InstructionFields::from_byte(first);
        if fields.opcode != MOV_REGISTER_OPCODE {
            return None;
        }
        Some(Self::from_fields(
            fields.selector,
            AddressingFields::from_byte(second),
        ))
    }

    /// Destination operand.
    #[must_use]
    pub const fn dest(self) -> OperandRef {
        self.dest
    }

    /// Source operand.
    #[must_use]
    pub const fn src(self) -> OperandRef {
        self.src
    }

    /// Direction/width selector used for both operand lookups.
    #[must_use]
    pub const fn selector(self) -> OperandSelector {
        self.selector
    }

    /// Operand width shared by destination and source.
    #[must_use]
    pub const fn width(self) -> Width {
        self.selector.width()
    }

    /// `mod` field the instruction was encoded with.
    #[must_use]
    pub const fn mode(self) -> AddressingMode {
        self.mode
    }

    /// Re-encodes the instruction as its two bytes.
    #[must_use]
    pub const fn encode(self) -> [u8; 2] {
        let first = (MOV_REGISTER_OPCODE << 2) | self.selector.bits();
        let second = AddressingFields {
            mode: self.mode,
            reg: self.reg,
            rm: self.rm,
        }
        .to_byte();
        [first, second]
    }
}

impl fmt::Display for MovInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mov {}, {}", self.dest, self.src)
    }
}

/// One instruction located in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodedInstruction {
    /// Register-to-register move; executed by the dispatcher.
    Move(MovInstruction),
    /// Opcode outside the supported subset; one byte is skipped.
    Unrecognized {
        /// The skipped byte.
        byte: u8,
    },
}

impl DecodedInstruction {
    /// Number of stream bytes this instruction occupies.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::Move(_) => 2,
            Self::Unrecognized { .. } => 1,
        }
    }

    /// Returns the move if this is a register-to-register move.
    #[must_use]
    pub const fn as_move(self) -> Option<MovInstruction> {
        match self {
            Self::Move(mov) => Some(mov),
            Self::Unrecognized { .. } => None,
        }
    }
}

/// Stateless decoder over a borrowed byte stream.
pub struct Decoder;

impl Decoder {
    /// Decodes the instruction starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFault::TruncatedInstruction`] when a move opcode is the
    /// last byte of `stream`, and [`DecodeFault::EmptyStream`] when `offset`
    /// is already at or past the end.
    pub fn decode_at(stream: &[u8], offset: usize) -> Result<DecodedInstruction, DecodeFault> {
        let Some(&first) = stream.get(offset) else {
            return Err(DecodeFault::EmptyStream);
        };

        let fields = InstructionFields::from_byte(first);
        match fields.class() {
            OpcodeClass::Unrecognized => Ok(DecodedInstruction::Unrecognized { byte: first }),
            OpcodeClass::RegisterMove => {
                let Some(&second) = stream.get(offset + 1) else {
                    return Err(DecodeFault::TruncatedInstruction {
                        offset,
                        needed: 2,
                        available: stream.len() - offset,
                    });
                };
                Ok(DecodedInstruction::Move(MovInstruction::from_fields(
                    fields.selector,
                    AddressingFields::from_byte(second),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DecodedInstruction, Decoder, MovInstruction};
    use crate::encoding::{AddressingMode, Direction, FieldIndex, Width};
    use crate::fault::DecodeFault;
    use crate::resolver::Section;
    use crate::state::RegisterId;

    #[rstest]
    #[case([0x89, 0xD9], "mov cx, bx")]
    #[case([0x88, 0xE5], "mov ch, ah")]
    #[case([0x89, 0xDA], "mov dx, bx")]
    #[case([0x89, 0xDE], "mov si, bx")]
    #[case([0x89, 0xFB], "mov bx, di")]
    #[case([0x88, 0xC8], "mov al, cl")]
    #[case([0x88, 0xED], "mov ch, ch")]
    #[case([0x89, 0xC3], "mov bx, ax")]
    #[case([0x89, 0xF3], "mov bx, si")]
    #[case([0x89, 0xFC], "mov sp, di")]
    #[case([0x89, 0xC5], "mov bp, ax")]
    #[case([0x8B, 0xC3], "mov ax, bx")]
    #[case([0x8A, 0xE0], "mov ah, al")]
    fn renders_register_moves(#[case] bytes: [u8; 2], #[case] text: &str) {
        let mov = MovInstruction::from_bytes(bytes[0], bytes[1]).expect("register move");
        assert_eq!(mov.to_string(), text);
        assert_eq!(mov.encode(), bytes);
    }

    #[test]
    fn reg_field_is_destination_when_direction_set() {
        let mov = MovInstruction::from_bytes(0x8B, 0xC3).expect("register move");
        assert_eq!(mov.dest().register(), RegisterId::A);
        assert_eq!(mov.src().register(), RegisterId::B);
        assert_eq!(mov.width(), Width::Word);
    }

    #[test]
    fn rm_field_is_destination_when_direction_clear() {
        let mov = MovInstruction::from_bytes(0x89, 0xC3).expect("register move");
        assert_eq!(mov.dest().register(), RegisterId::B);
        assert_eq!(mov.src().register(), RegisterId::A);
    }

    #[test]
    fn constructor_matches_byte_decode() {
        let reg = FieldIndex::from_low_bits(0b100);
        let rm = FieldIndex::from_low_bits(0b000);
        let mov = MovInstruction::new(Direction::RegIsDestination, Width::Byte, reg, rm);
        assert_eq!(mov.encode(), [0x8A, 0xE0]);
        assert_eq!(mov.dest().section(), Section::High);
        assert_eq!(mov.src().section(), Section::Low);
    }

    #[test]
    fn only_the_move_opcode_decodes_as_a_move() {
        assert!(MovInstruction::from_bytes(0xA1, 0xC3).is_none());
        assert!(MovInstruction::from_bytes(0x8C, 0xC3).is_none());
    }

    #[rstest]
    #[case([0x8B, 0x06], AddressingMode::MemoryNoDisplacement)]
    #[case([0x8B, 0x46], AddressingMode::MemoryDisplacement8)]
    #[case([0x8B, 0x86], AddressingMode::MemoryDisplacement16)]
    #[case([0x8B, 0xC6], AddressingMode::Register)]
    fn mod_field_does_not_change_operands(
        #[case] bytes: [u8; 2],
        #[case] mode: AddressingMode,
    ) {
        let mov = MovInstruction::from_bytes(bytes[0], bytes[1]).expect("move opcode");
        assert_eq!(mov.to_string(), "mov ax, si");
        assert_eq!(mov.mode(), mode);
        assert_eq!(mov.encode(), bytes);
    }

    #[test]
    fn unrecognized_opcode_occupies_one_byte() {
        let decoded = Decoder::decode_at(&[0xA1, 0x00], 0).expect("decodes");
        assert_eq!(decoded, DecodedInstruction::Unrecognized { byte: 0xA1 });
        assert_eq!(decoded.byte_len(), 1);
        assert!(decoded.as_move().is_none());
    }

    #[rstest]
    #[case(&[0x89, 0x07], "mov di, ax")]
    #[case(&[0x89, 0x47, 0x10], "mov di, ax")]
    #[case(&[0x89, 0x87, 0x10, 0x20], "mov di, ax")]
    #[case(&[0x89, 0x06, 0x34, 0x12], "mov si, ax")]
    fn every_move_occupies_two_bytes(#[case] stream: &[u8], #[case] text: &str) {
        let decoded = Decoder::decode_at(stream, 0).expect("decodes");
        assert_eq!(decoded.byte_len(), 2);
        assert_eq!(decoded.as_move().map(|mov| mov.to_string()).as_deref(), Some(text));
    }

    #[test]
    fn move_opcode_as_last_byte_is_truncated() {
        let fault = Decoder::decode_at(&[0x00, 0x89], 1).expect_err("missing addressing byte");
        assert_eq!(
            fault,
            DecodeFault::TruncatedInstruction {
                offset: 1,
                needed: 2,
                available: 1,
            }
        );
    }

    #[test]
    fn trailing_bytes_after_move_start_the_next_instruction() {
        let stream = [0x89, 0x87, 0x10];
        let first = Decoder::decode_at(&stream, 0).expect("two-byte move");
        assert_eq!(first.byte_len(), 2);

        let second = Decoder::decode_at(&stream, 2).expect("next instruction");
        assert_eq!(second, DecodedInstruction::Unrecognized { byte: 0x10 });
    }

    #[test]
    fn offset_past_end_is_rejected() {
        assert_eq!(Decoder::decode_at(&[], 0), Err(DecodeFault::EmptyStream));
        assert_eq!(Decoder::decode_at(&[0x90], 1), Err(DecodeFault::EmptyStream));
    }
}
