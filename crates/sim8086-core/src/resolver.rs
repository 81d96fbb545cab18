//! Operand field to register mapping.
//!
//! The mapping is two fixed tables, one per operand width, indexed by the
//! normalized 3-bit field. Byte-width indices `4..=7` reuse the general-purpose
//! registers of indices `0..=3` and select their high bytes.

use core::fmt;

use crate::encoding::{FieldIndex, OperandSelector, Width};
use crate::state::RegisterId;

/// Part of a register addressed by an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Section {
    /// Full 16 bits of a general-purpose register (`ax`).
    Full,
    /// Low byte of a general-purpose register (`al`).
    Low,
    /// High byte of a general-purpose register (`ah`).
    High,
    /// Full 16 bits of a pointer/index register, which has no byte parts (`sp`).
    NotSubAddressable,
}

impl Section {
    /// Suffix appended to the register name when rendering an operand.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Full => "x",
            Self::Low => "l",
            Self::High => "h",
            Self::NotSubAddressable => "",
        }
    }

    /// Operand width implied by this section.
    #[must_use]
    pub const fn width(self) -> Width {
        match self {
            Self::Full | Self::NotSubAddressable => Width::Word,
            Self::Low | Self::High => Width::Byte,
        }
    }
}

/// A resolved `(register, section)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OperandRef {
    register: RegisterId,
    section: Section,
}

impl OperandRef {
    const fn new(register: RegisterId, section: Section) -> Self {
        Self { register, section }
    }

    /// Register holding the operand.
    #[must_use]
    pub const fn register(self) -> RegisterId {
        self.register
    }

    /// Section of the register the operand addresses.
    #[must_use]
    pub const fn section(self) -> Section {
        self.section
    }

    /// Field value that resolves to this operand at its own width.
    #[must_use]
    pub const fn field_index(self) -> FieldIndex {
        let base = self.register.index() as u8;
        match self.section {
            Section::High => FieldIndex::from_low_bits(base + 4),
            Section::Full | Section::Low | Section::NotSubAddressable => {
                FieldIndex::from_low_bits(base)
            }
        }
    }
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.register.name(), self.section.suffix())
    }
}

/// Word-width table: `ax, cx, dx, bx, sp, bp, si, di`.
pub const WORD_OPERANDS: [OperandRef; 8] = [
    OperandRef::new(RegisterId::A, Section::Full),
    OperandRef::new(RegisterId::C, Section::Full),
    OperandRef::new(RegisterId::D, Section::Full),
    OperandRef::new(RegisterId::B, Section::Full),
    OperandRef::new(RegisterId::Sp, Section::NotSubAddressable),
    OperandRef::new(RegisterId::Bp, Section::NotSubAddressable),
    OperandRef::new(RegisterId::Si, Section::NotSubAddressable),
    OperandRef::new(RegisterId::Di, Section::NotSubAddressable),
];

/// Byte-width table: `al, cl, dl, bl, ah, ch, dh, bh`.
pub const BYTE_OPERANDS: [OperandRef; 8] = [
    OperandRef::new(RegisterId::A, Section::Low),
    OperandRef::new(RegisterId::C, Section::Low),
    OperandRef::new(RegisterId::D, Section::Low),
    OperandRef::new(RegisterId::B, Section::Low),
    OperandRef::new(RegisterId::A, Section::High),
    OperandRef::new(RegisterId::C, Section::High),
    OperandRef::new(RegisterId::D, Section::High),
    OperandRef::new(RegisterId::B, Section::High),
];

/// Resolves an operand field to a register and section.
///
/// Only the width bit of `selector` takes part; direction is applied by the
/// caller when it picks which field is the destination.
#[must_use]
pub const fn resolve(selector: OperandSelector, field: FieldIndex) -> OperandRef {
    resolve_width(selector.width(), field)
}

/// Resolves an operand field at an explicit width.
#[must_use]
pub const fn resolve_width(width: Width, field: FieldIndex) -> OperandRef {
    match width {
        Width::Word => WORD_OPERANDS[field.index()],
        Width::Byte => BYTE_OPERANDS[field.index()],
    }
}
