//! Register-to-register data transfer.

use crate::decoder::MovInstruction;
use crate::resolver::Section;
use crate::state::RegisterFile;

/// Copies the source operand of `mov` into its destination.
///
/// A word-sized destination receives the source register's full 16-bit value.
/// Byte-sized destinations receive exactly the addressed source byte, leaving
/// the other half of the destination register untouched.
///
/// A word destination paired with a byte source cannot be decoded: both
/// operands are resolved from one width bit.
pub fn execute_move(regs: &mut RegisterFile, mov: &MovInstruction) {
    let dest = mov.dest();
    let src = mov.src();
    let source = regs.register(src.register());
    let target = regs.register_mut(dest.register());

    match (dest.section(), src.section()) {
        (Section::Full | Section::NotSubAddressable, _) => target.set_x(source.x()),
        (Section::Low, Section::Low) => target.set_low(source.low()),
        (Section::Low, Section::High) => target.set_low(source.high()),
        (Section::High, Section::Low) => target.set_high(source.low()),
        (Section::High, Section::High) => target.set_high(source.high()),
        (Section::Low | Section::High, Section::Full | Section::NotSubAddressable) => {
            unreachable!("operands resolved from one width bit share a width")
        }
    }
}
