use thiserror::Error;

/// Malformed-stream conditions that abort a decode pass.
///
/// Unrecognized opcodes are not faults: the dispatcher skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodeFault {
    /// The stream holds no bytes.
    #[error("instruction stream is empty")]
    EmptyStream,
    /// The loader reported a zero or negative length.
    #[error("invalid instruction stream length {reported}")]
    NonPositiveLength {
        /// Length reported by the loader.
        reported: i64,
    },
    /// The loader reported more bytes than the buffer holds.
    #[error("reported length {reported} exceeds buffer of {available} bytes")]
    LengthExceedsBuffer {
        /// Length reported by the loader.
        reported: i64,
        /// Bytes actually present in the buffer.
        available: usize,
    },
    /// A multi-byte instruction runs past the end of the stream.
    #[error(
        "instruction at offset {offset} needs {needed} bytes but only {available} remain"
    )]
    TruncatedInstruction {
        /// Offset of the instruction's first byte.
        offset: usize,
        /// Total bytes the instruction occupies.
        needed: usize,
        /// Bytes left in the stream from `offset`.
        available: usize,
    },
}

impl DecodeFault {
    /// Stable numeric code for reporting.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::EmptyStream => 0x01,
            Self::NonPositiveLength { .. } => 0x02,
            Self::LengthExceedsBuffer { .. } => 0x03,
            Self::TruncatedInstruction { .. } => 0x04,
        }
    }

    /// Returns `true` when the fault was raised before any byte was decoded.
    #[must_use]
    pub const fn is_length_fault(self) -> bool {
        !matches!(self, Self::TruncatedInstruction { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::DecodeFault;

    #[test]
    fn codes_are_unique() {
        let faults = [
            DecodeFault::EmptyStream,
            DecodeFault::NonPositiveLength { reported: -1 },
            DecodeFault::LengthExceedsBuffer {
                reported: 4,
                available: 2,
            },
            DecodeFault::TruncatedInstruction {
                offset: 0,
                needed: 2,
                available: 1,
            },
        ];
        let codes: HashSet<_> = faults.iter().map(|f| f.code()).collect();
        assert_eq!(codes.len(), faults.len());
    }

    #[test]
    fn only_truncation_happens_mid_stream() {
        assert!(DecodeFault::EmptyStream.is_length_fault());
        assert!(DecodeFault::NonPositiveLength { reported: 0 }.is_length_fault());
        assert!(!DecodeFault::TruncatedInstruction {
            offset: 3,
            needed: 2,
            available: 1
        }
        .is_length_fault());
    }

    #[test]
    fn messages_name_the_offending_values() {
        let fault = DecodeFault::TruncatedInstruction {
            offset: 6,
            needed: 2,
            available: 1,
        };
        assert_eq!(
            fault.to_string(),
            "instruction at offset 6 needs 2 bytes but only 1 remain"
        );
        assert_eq!(
            DecodeFault::NonPositiveLength { reported: -1 }.to_string(),
            "invalid instruction stream length -1"
        );
    }
}
