use core::fmt;

use crate::resolver::{OperandRef, Section};

/// Number of architecturally visible registers (`a, c, d, b, sp, bp, si, di`).
pub const REGISTER_COUNT: usize = 8;

/// Register identifier in encoding order.
///
/// The discriminant is the 3-bit field value that selects the register for a
/// word-sized operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum RegisterId {
    A = 0,
    C = 1,
    D = 2,
    B = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl RegisterId {
    /// All registers in encoding order.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::A,
        Self::C,
        Self::D,
        Self::B,
        Self::Sp,
        Self::Bp,
        Self::Si,
        Self::Di,
    ];

    /// All registers in report order (`a, b, c, d, sp, bp, si, di`).
    pub const REPORT_ORDER: [Self; REGISTER_COUNT] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::Sp,
        Self::Bp,
        Self::Si,
        Self::Di,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 3-bit value into a register in encoding order.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::A),
            1 => Some(Self::C),
            2 => Some(Self::D),
            3 => Some(Self::B),
            4 => Some(Self::Sp),
            5 => Some(Self::Bp),
            6 => Some(Self::Si),
            7 => Some(Self::Di),
            _ => None,
        }
    }

    /// Stable register name without a section suffix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::C => "c",
            Self::D => "d",
            Self::B => "b",
            Self::Sp => "sp",
            Self::Bp => "bp",
            Self::Si => "si",
            Self::Di => "di",
        }
    }

    /// Returns `true` for `a, b, c, d`, the registers with addressable byte halves.
    #[must_use]
    pub const fn is_general_purpose(self) -> bool {
        matches!(self, Self::A | Self::C | Self::D | Self::B)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 16-bit register with independently writable byte halves.
///
/// Byte order is fixed as `x == (high << 8) | low`: the low section is the
/// least significant byte of the full value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register {
    x: u16,
}

impl Register {
    /// Creates a register holding `value`.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self { x: value }
    }

    /// Reads the full 16-bit value.
    #[must_use]
    pub const fn x(self) -> u16 {
        self.x
    }

    /// Writes the full 16-bit value.
    pub const fn set_x(&mut self, value: u16) {
        self.x = value;
    }

    /// Reads the low byte.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn low(self) -> u8 {
        (self.x & 0x00FF) as u8
    }

    /// Writes the low byte, preserving the high byte.
    pub const fn set_low(&mut self, value: u8) {
        self.x = (self.x & 0xFF00) | value as u16;
    }

    /// Reads the high byte.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn high(self) -> u8 {
        (self.x >> 8) as u8
    }

    /// Writes the high byte, preserving the low byte.
    pub const fn set_high(&mut self, value: u8) {
        self.x = (self.x & 0x00FF) | ((value as u16) << 8);
    }
}

/// Register file for one simulated processor.
///
/// This is a flat state container. Which sections of which registers are
/// legal operands is decided by the resolver, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    regs: [Register; REGISTER_COUNT],
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of a register.
    #[must_use]
    pub const fn register(&self, id: RegisterId) -> Register {
        self.regs[id.index()]
    }

    /// Returns a mutable reference to a register.
    pub const fn register_mut(&mut self, id: RegisterId) -> &mut Register {
        &mut self.regs[id.index()]
    }

    /// Reads a register's full 16-bit value.
    #[must_use]
    pub const fn x(&self, id: RegisterId) -> u16 {
        self.regs[id.index()].x()
    }

    /// Writes a register's full 16-bit value.
    pub const fn set_x(&mut self, id: RegisterId, value: u16) {
        self.regs[id.index()].set_x(value);
    }

    /// Reads the section addressed by a resolved operand.
    ///
    /// Byte sections are returned zero-extended.
    #[must_use]
    pub const fn read(&self, operand: OperandRef) -> u16 {
        let reg = self.regs[operand.register().index()];
        match operand.section() {
            Section::Full | Section::NotSubAddressable => reg.x(),
            Section::Low => reg.low() as u16,
            Section::High => reg.high() as u16,
        }
    }

    /// Writes the section addressed by a resolved operand.
    ///
    /// Byte sections take the low eight bits of `value`.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn write(&mut self, operand: OperandRef, value: u16) {
        let reg = &mut self.regs[operand.register().index()];
        match operand.section() {
            Section::Full | Section::NotSubAddressable => reg.set_x(value),
            Section::Low => reg.set_low(value as u8),
            Section::High => reg.set_high(value as u8),
        }
    }

    /// Captures every register's full and byte values in report order.
    #[must_use]
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            rows: RegisterId::REPORT_ORDER.map(|id| {
                let reg = self.register(id);
                RegisterRow {
                    id,
                    x: reg.x(),
                    low: reg.low(),
                    high: reg.high(),
                }
            }),
        }
    }
}

/// One register's values at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterRow {
    /// Which register this row describes.
    pub id: RegisterId,
    /// Full 16-bit value.
    pub x: u16,
    /// Low byte.
    pub low: u8,
    /// High byte.
    pub high: u8,
}

impl fmt::Display for RegisterRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "REG: {}\t\tx:{:04x}\t\tlow:{:02x}\t\thigh:{:02x}",
            self.id.name(),
            self.x,
            self.low,
            self.high
        )
    }
}

/// Post-execution view of the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterSnapshot {
    /// Rows in report order (`a, b, c, d, sp, bp, si, di`).
    pub rows: [RegisterRow; REGISTER_COUNT],
}

impl RegisterSnapshot {
    /// Looks up a row by register.
    #[must_use]
    pub fn row(&self, id: RegisterId) -> Option<&RegisterRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
