//! Bit-level field extraction for the first two bytes of an instruction.
//!
//! Nothing here touches registers or bounds-checks a stream; callers hand in
//! bytes they already know exist.

/// Opcode bits of the first byte (bits 7..2).
pub const MASK_OPCODE: u8 = 0b1111_1100;
/// Direction bit of the first byte (bit 1).
pub const MASK_DIRECTION: u8 = 0b0000_0010;
/// Width bit of the first byte (bit 0).
pub const MASK_WIDTH: u8 = 0b0000_0001;
/// Addressing-mode bits of the second byte (bits 7..6).
pub const MASK_MOD: u8 = 0b1100_0000;
/// Register field of the second byte (bits 5..3).
pub const MASK_REG: u8 = 0b0011_1000;
/// Register/memory field of the second byte (bits 2..0).
pub const MASK_RM: u8 = 0b0000_0111;

/// Six-bit opcode of the register/memory move family (`100010dw`).
pub const MOV_REGISTER_OPCODE: u8 = 0b10_0010;

/// Opcode families the dispatcher distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeClass {
    /// `mov` between a register and a register/memory operand.
    RegisterMove,
    /// Any opcode outside the supported subset.
    Unrecognized,
}

/// Classifies a six-bit opcode value.
#[must_use]
pub const fn classify_opcode(opcode: u8) -> OpcodeClass {
    if opcode == MOV_REGISTER_OPCODE {
        OpcodeClass::RegisterMove
    } else {
        OpcodeClass::Unrecognized
    }
}

/// Which addressing-byte field names the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `d = 0`: the register field is the source, r/m is the destination.
    RegIsSource,
    /// `d = 1`: the register field is the destination, r/m is the source.
    RegIsDestination,
}

/// Operand size selected by the `w` bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// `w = 0`: 8-bit operands.
    Byte,
    /// `w = 1`: 16-bit operands.
    Word,
}

/// The direction and width bits of the first byte, kept together as one
/// two-bit value (`0b000000dw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSelector(u8);

impl OperandSelector {
    /// Takes the `d` and `w` bits from an instruction byte; other bits are dropped.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte & (MASK_DIRECTION | MASK_WIDTH))
    }

    /// Builds a selector from typed direction and width.
    #[must_use]
    pub const fn new(direction: Direction, width: Width) -> Self {
        let d = match direction {
            Direction::RegIsSource => 0,
            Direction::RegIsDestination => MASK_DIRECTION,
        };
        let w = match width {
            Width::Byte => 0,
            Width::Word => MASK_WIDTH,
        };
        Self(d | w)
    }

    /// Raw `0b000000dw` value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Direction encoded by the `d` bit.
    #[must_use]
    pub const fn direction(self) -> Direction {
        if self.0 & MASK_DIRECTION == MASK_DIRECTION {
            Direction::RegIsDestination
        } else {
            Direction::RegIsSource
        }
    }

    /// Width encoded by the `w` bit.
    #[must_use]
    pub const fn width(self) -> Width {
        if self.0 & MASK_WIDTH == MASK_WIDTH {
            Width::Word
        } else {
            Width::Byte
        }
    }
}

/// A normalized 3-bit operand field value.
///
/// Both the register field and the register/memory field are stored in the
/// low three bits, so one lookup table serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldIndex(u8);

impl FieldIndex {
    /// Accepts values `0..=7`.
    #[must_use]
    pub const fn from_u3(value: u8) -> Option<Self> {
        if value <= 0b111 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Keeps the low three bits of `bits`.
    #[must_use]
    pub const fn from_low_bits(bits: u8) -> Self {
        Self(bits & MASK_RM)
    }

    /// Numeric value in `0..=7`.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Value usable as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The `mod` field of the addressing byte.
///
/// Move decoding keeps the field for re-encoding only: both operand fields
/// always name registers, whatever the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `00`: memory operand without displacement (direct address when r/m is `110`).
    MemoryNoDisplacement,
    /// `01`: memory operand with an 8-bit displacement.
    MemoryDisplacement8,
    /// `10`: memory operand with a 16-bit displacement.
    MemoryDisplacement16,
    /// `11`: both operands are registers.
    Register,
}

impl AddressingMode {
    /// Converts a 2-bit `mod` value.
    #[must_use]
    pub const fn from_u2(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(Self::MemoryNoDisplacement),
            0b01 => Some(Self::MemoryDisplacement8),
            0b10 => Some(Self::MemoryDisplacement16),
            0b11 => Some(Self::Register),
            _ => None,
        }
    }
}

/// Fields of the first instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionFields {
    /// Six-bit opcode (bits 7..2 shifted down).
    pub opcode: u8,
    /// Combined `d` and `w` bits.
    pub selector: OperandSelector,
}

impl InstructionFields {
    /// Extracts opcode, direction, and width.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            opcode: (byte & MASK_OPCODE) >> 2,
            selector: OperandSelector::from_byte(byte),
        }
    }

    /// Opcode family of this byte.
    #[must_use]
    pub const fn class(self) -> OpcodeClass {
        classify_opcode(self.opcode)
    }
}

/// Fields of the addressing byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressingFields {
    /// `mod` field.
    pub mode: AddressingMode,
    /// Register field, shifted down into `0..=7`.
    pub reg: FieldIndex,
    /// Register/memory field.
    pub rm: FieldIndex,
}

impl AddressingFields {
    /// Extracts `mod`, `reg`, and `r/m`.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        let mode = match (byte & MASK_MOD) >> 6 {
            0b00 => AddressingMode::MemoryNoDisplacement,
            0b01 => AddressingMode::MemoryDisplacement8,
            0b10 => AddressingMode::MemoryDisplacement16,
            _ => AddressingMode::Register,
        };
        Self {
            mode,
            reg: FieldIndex::from_low_bits((byte & MASK_REG) >> 3),
            rm: FieldIndex::from_low_bits(byte & MASK_RM),
        }
    }

    /// Packs the fields back into an addressing byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mode = match self.mode {
            AddressingMode::MemoryNoDisplacement => 0b00,
            AddressingMode::MemoryDisplacement8 => 0b01,
            AddressingMode::MemoryDisplacement16 => 0b10,
            AddressingMode::Register => 0b11,
        };
        (mode << 6) | (self.reg.value() << 3) | self.rm.value()
    }
}
