//! Static listing of an instruction stream.
//!
//! Walks the same instruction boundaries as the dispatcher without touching
//! a register file.

use crate::decoder::{DecodedInstruction, Decoder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Offset of the instruction's first byte.
    pub offset: usize,
    /// Raw instruction bytes.
    pub bytes: Vec<u8>,
    /// Rendered instruction text (`mov ax, bx`, or `db 0xa1` for data).
    pub text: String,
    /// Whether the row would be executed by the dispatcher.
    pub executable: bool,
}

impl DisassemblyRow {
    /// Bytes rendered as space-separated lowercase hex.
    #[must_use]
    pub fn hex_bytes(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lists every instruction in `stream`.
///
/// Unrecognized bytes become `db` rows. A truncated instruction at the end of
/// the stream becomes a final `db` row annotated as truncated, so the listing
/// always covers every byte.
#[must_use]
pub fn disassemble(stream: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::new();
    let mut offset = 0;

    while offset < stream.len() {
        match Decoder::decode_at(stream, offset) {
            Ok(decoded) => {
                let len = decoded.byte_len();
                let bytes = stream[offset..offset + len].to_vec();
                let (text, executable) = match decoded {
                    DecodedInstruction::Move(mov) => (mov.to_string(), true),
                    DecodedInstruction::Unrecognized { byte } => {
                        (format!("db 0x{byte:02x}"), false)
                    }
                };
                rows.push(DisassemblyRow {
                    offset,
                    bytes,
                    text,
                    executable,
                });
                offset += len;
            }
            Err(_) => {
                let bytes = stream[offset..].to_vec();
                let text = format!(
                    "db {} ; truncated",
                    bytes
                        .iter()
                        .map(|b| format!("0x{b:02x}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                rows.push(DisassemblyRow {
                    offset,
                    bytes,
                    text,
                    executable: false,
                });
                break;
            }
        }
    }

    rows
}
