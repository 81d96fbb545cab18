//! Text output for the `sim8086` binary.

use sim8086_core::{DisassemblyRow, TraceEvent, TraceSink};

/// ANSI sequence that clears the terminal and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Formats the loaded buffer as `N bytes read: xx xx ...`.
#[must_use]
pub fn byte_dump(bytes: &[u8]) -> String {
    let mut line = format!("{} bytes read:", bytes.len());
    for byte in bytes {
        line.push_str(&format!(" {byte:02x}"));
    }
    line
}

/// Heading printed above the register snapshot.
#[must_use]
pub fn banner(processor_name: &str) -> String {
    format!("Processor: {processor_name}")
}

/// Formats one listing row as `offset: bytes  text`.
#[must_use]
pub fn listing_line(row: &DisassemblyRow) -> String {
    format!("{:04x}: {:<12} {}", row.offset, row.hex_bytes(), row.text)
}

/// Trace sink that prints each executed move to stdout.
#[derive(Debug, Default)]
pub struct StdoutTrace;

impl TraceSink for StdoutTrace {
    fn on_event(&mut self, event: TraceEvent) {
        if let Some(line) = trace_line(&event) {
            println!("{line}");
        }
    }
}

/// Renders the stdout line for an event, if it has one.
#[must_use]
pub fn trace_line(event: &TraceEvent) -> Option<String> {
    match event {
        TraceEvent::MoveExecuted { instruction, .. } => Some(instruction.to_string()),
        TraceEvent::OpcodeSkipped { .. } | TraceEvent::StreamAborted { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use sim8086_core::{disassemble, DecodeFault, MovInstruction, TraceEvent};

    use super::{banner, byte_dump, listing_line, trace_line};

    #[test]
    fn dump_lists_every_byte_in_hex() {
        assert_eq!(byte_dump(&[0x89, 0xD9, 0x0A]), "3 bytes read: 89 d9 0a");
        assert_eq!(byte_dump(&[]), "0 bytes read:");
    }

    #[test]
    fn banner_names_the_processor() {
        assert_eq!(banner("Intel x8086"), "Processor: Intel x8086");
    }

    #[test]
    fn listing_line_pads_bytes_column() {
        let rows = disassemble(&[0xA1, 0x89, 0xD9]);
        assert_eq!(listing_line(&rows[0]), "0000: a1           db 0xa1");
        assert_eq!(listing_line(&rows[1]), "0001: 89 d9        mov cx, bx");
    }

    #[test]
    fn only_moves_produce_trace_lines() {
        let instruction = MovInstruction::from_bytes(0x8B, 0xC3).expect("register move");
        let moved = TraceEvent::MoveExecuted {
            offset: 0,
            instruction,
        };
        let skipped = TraceEvent::OpcodeSkipped {
            offset: 2,
            byte: 0xA1,
        };
        let aborted = TraceEvent::StreamAborted {
            offset: 3,
            fault: DecodeFault::EmptyStream,
        };

        assert_eq!(trace_line(&moved).as_deref(), Some("mov ax, bx"));
        assert_eq!(trace_line(&skipped), None);
        assert_eq!(trace_line(&aborted), None);
    }
}
