//! Host-facing API for loaders and front ends.
//!
//! A [`Processor`] owns one register file. Hosts hand it a byte buffer (or a
//! buffer plus the length their loader reported) and read back the executed
//! instructions and a register snapshot.

use crate::decoder::MovInstruction;
use crate::diag::DecodeDiagnostics;
use crate::execute::{Dispatcher, StepOutcome};
use crate::fault::DecodeFault;
use crate::state::{RegisterFile, RegisterSnapshot};

/// Processor name used when none is configured.
pub const DEFAULT_PROCESSOR_NAME: &str = "Intel x8086";

/// Configuration for a processor instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodeConfig {
    /// Name shown in the snapshot banner.
    pub processor_name: String,
    /// Forwards trace events to the caller's sink when enabled.
    pub tracing_enabled: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            processor_name: DEFAULT_PROCESSOR_NAME.to_string(),
            tracing_enabled: true,
        }
    }
}

/// Trace events emitted in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A register-to-register move is about to be applied.
    MoveExecuted {
        /// Offset of the instruction's first byte.
        offset: usize,
        /// The decoded instruction; its `Display` is the `mov` line.
        instruction: MovInstruction,
    },
    /// An unrecognized opcode byte was skipped.
    OpcodeSkipped {
        /// Offset of the byte.
        offset: usize,
        /// The byte.
        byte: u8,
    },
    /// The pass stopped on a malformed stream.
    StreamAborted {
        /// Cursor position when the fault was raised.
        offset: usize,
        /// The fault.
        fault: DecodeFault,
    },
}

/// Sink for trace events.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    /// Events in the order they were emitted.
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    /// Rendered `mov` lines for the executed moves.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::MoveExecuted { instruction, .. } => Some(instruction.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl TraceSink for TraceLog {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// A byte buffer validated against the length its loader reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionStream<'a> {
    bytes: &'a [u8],
}

impl<'a> InstructionStream<'a> {
    /// Wraps a whole buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFault::EmptyStream`] for an empty buffer.
    pub const fn new(bytes: &'a [u8]) -> Result<Self, DecodeFault> {
        if bytes.is_empty() {
            return Err(DecodeFault::EmptyStream);
        }
        Ok(Self { bytes })
    }

    /// Wraps the first `reported_len` bytes of `buffer`.
    ///
    /// Loaders report a negative length when the source could not be read.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFault::NonPositiveLength`] when `reported_len <= 0` and
    /// [`DecodeFault::LengthExceedsBuffer`] when it is larger than `buffer`.
    pub fn from_loaded(buffer: &'a [u8], reported_len: i64) -> Result<Self, DecodeFault> {
        if reported_len <= 0 {
            return Err(DecodeFault::NonPositiveLength {
                reported: reported_len,
            });
        }
        let len = usize::try_from(reported_len)
            .ok()
            .filter(|len| *len <= buffer.len())
            .ok_or(DecodeFault::LengthExceedsBuffer {
                reported: reported_len,
                available: buffer.len(),
            })?;
        Ok(Self {
            bytes: &buffer[..len],
        })
    }

    /// The validated bytes.
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of bytes to decode.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: construction rejects empty buffers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Summary of one completed decode pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodeReport {
    /// Executed moves in order.
    pub executed: Vec<MovInstruction>,
    /// Unrecognized opcode bytes skipped.
    pub skipped_bytes: usize,
    /// Final cursor position (equal to the stream length).
    pub consumed: usize,
}

impl DecodeReport {
    /// Rendered `mov` lines for the executed moves.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.executed.iter().map(ToString::to_string).collect()
    }
}

/// A simulated processor: a named register file plus decode diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Processor {
    config: DecodeConfig,
    registers: RegisterFile,
    diagnostics: DecodeDiagnostics,
}

impl Processor {
    /// Creates a processor with cleared registers.
    #[must_use]
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            config,
            registers: RegisterFile::new(),
            diagnostics: DecodeDiagnostics::new(),
        }
    }

    /// Configured processor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.processor_name
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Read access to the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Write access to the register file, for seeding state before a pass.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Counters accumulated over every pass on this processor.
    #[must_use]
    pub const fn diagnostics(&self) -> &DecodeDiagnostics {
        &self.diagnostics
    }

    /// Captures the register file in report order.
    #[must_use]
    pub fn snapshot(&self) -> RegisterSnapshot {
        self.registers.snapshot()
    }

    /// Clears registers and diagnostics, keeping the configuration.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::new();
        self.diagnostics.reset();
    }

    /// Decodes and executes `stream` without tracing.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeFault`] that aborted the pass.
    pub fn decode_stream(&mut self, stream: &[u8]) -> Result<DecodeReport, DecodeFault> {
        self.decode_stream_traced(stream, &mut NullTrace)
    }

    /// Decodes the prefix of `buffer` reported by a loader.
    ///
    /// # Errors
    ///
    /// Returns a length fault before touching any register, or the fault that
    /// aborted the pass.
    pub fn decode_loaded(
        &mut self,
        buffer: &[u8],
        reported_len: i64,
        trace: &mut dyn TraceSink,
    ) -> Result<DecodeReport, DecodeFault> {
        match InstructionStream::from_loaded(buffer, reported_len) {
            Ok(stream) => self.decode_stream_traced(stream.bytes(), trace),
            Err(fault) => {
                self.diagnostics.record_fault(fault);
                if self.config.tracing_enabled {
                    trace.on_event(TraceEvent::StreamAborted { offset: 0, fault });
                }
                Err(fault)
            }
        }
    }

    /// Decodes and executes `stream`, forwarding trace events to `trace` when
    /// tracing is enabled.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeFault`] that aborted the pass. Moves executed before
    /// the fault stay applied.
    pub fn decode_stream_traced(
        &mut self,
        stream: &[u8],
        trace: &mut dyn TraceSink,
    ) -> Result<DecodeReport, DecodeFault> {
        let mut silent = NullTrace;
        let sink: &mut dyn TraceSink = if self.config.tracing_enabled {
            trace
        } else {
            &mut silent
        };

        let mut dispatcher = Dispatcher::new(stream);
        let mut report = DecodeReport::default();

        loop {
            match dispatcher.step(&mut self.registers, sink) {
                Ok(StepOutcome::Finished) => break,
                Ok(outcome) => {
                    self.diagnostics.record_step(outcome);
                    match outcome {
                        StepOutcome::Executed { instruction, .. } => {
                            report.executed.push(instruction);
                        }
                        StepOutcome::Skipped { .. } => report.skipped_bytes += 1,
                        StepOutcome::Finished => {}
                    }
                }
                Err(fault) => {
                    self.diagnostics.record_fault(fault);
                    return Err(fault);
                }
            }
        }

        report.consumed = dispatcher.cursor();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DecodeConfig, InstructionStream, Processor, TraceEvent, TraceLog, DEFAULT_PROCESSOR_NAME,
    };
    use crate::fault::DecodeFault;
    use crate::state::{RegisterFile, RegisterId};

    #[test]
    fn default_config_names_processor_and_traces() {
        let config = DecodeConfig::default();
        assert_eq!(config.processor_name, DEFAULT_PROCESSOR_NAME);
        assert_eq!(DEFAULT_PROCESSOR_NAME, "Intel x8086");
        assert!(config.tracing_enabled);
    }

    #[test]
    fn loader_length_is_validated() {
        let buffer = [0x8B, 0xC3, 0x00];

        assert_eq!(
            InstructionStream::from_loaded(&buffer, -1),
            Err(DecodeFault::NonPositiveLength { reported: -1 })
        );
        assert_eq!(
            InstructionStream::from_loaded(&buffer, 0),
            Err(DecodeFault::NonPositiveLength { reported: 0 })
        );
        assert_eq!(
            InstructionStream::from_loaded(&buffer, 4),
            Err(DecodeFault::LengthExceedsBuffer {
                reported: 4,
                available: 3
            })
        );

        let prefix = InstructionStream::from_loaded(&buffer, 2).expect("valid prefix");
        assert_eq!(prefix.bytes(), &[0x8B, 0xC3]);
        assert_eq!(prefix.len(), 2);
        assert!(!prefix.is_empty());

        assert_eq!(InstructionStream::new(&[]), Err(DecodeFault::EmptyStream));
    }

    #[test]
    fn negative_length_leaves_registers_untouched() {
        let mut processor = Processor::default();
        processor.registers_mut().set_x(RegisterId::B, 0x00FF);
        let before = processor.registers().clone();
        let mut trace = TraceLog::default();

        let fault = processor
            .decode_loaded(&[0x8B, 0xC3], -1, &mut trace)
            .expect_err("negative length is malformed");

        assert_eq!(fault, DecodeFault::NonPositiveLength { reported: -1 });
        assert_eq!(processor.registers(), &before);
        assert_eq!(processor.diagnostics().faults, 1);
        assert_eq!(
            trace.events,
            vec![TraceEvent::StreamAborted { offset: 0, fault }]
        );
    }

    #[test]
    fn report_collects_lines_and_counts() {
        let mut processor = Processor::default();
        let report = processor
            .decode_stream(&[0x89, 0xD9, 0xA1, 0x88, 0xE5])
            .expect("well-formed stream");

        assert_eq!(report.lines(), ["mov cx, bx", "mov ch, ah"]);
        assert_eq!(report.skipped_bytes, 1);
        assert_eq!(report.consumed, 5);
        assert_eq!(processor.diagnostics().moves_executed, 2);
    }

    #[test]
    fn tracing_disabled_suppresses_events() {
        let mut processor = Processor::new(DecodeConfig {
            tracing_enabled: false,
            ..DecodeConfig::default()
        });
        let mut trace = TraceLog::default();

        processor
            .decode_stream_traced(&[0x8B, 0xC3], &mut trace)
            .expect("well-formed stream");

        assert!(trace.events.is_empty());
    }

    #[test]
    fn trace_log_renders_executed_moves() {
        let mut processor = Processor::default();
        let mut trace = TraceLog::default();

        processor
            .decode_stream_traced(&[0x00, 0x8B, 0xC3], &mut trace)
            .expect("well-formed stream");

        assert_eq!(trace.events.len(), 2);
        assert_eq!(trace.lines(), ["mov ax, bx"]);
    }

    #[test]
    fn processors_are_independent() {
        let mut first = Processor::default();
        let mut second = Processor::default();
        first.registers_mut().set_x(RegisterId::B, 0x1234);

        first.decode_stream(&[0x8B, 0xC3]).expect("decodes");
        second.decode_stream(&[0x8B, 0xC3]).expect("decodes");

        assert_eq!(first.registers().x(RegisterId::A), 0x1234);
        assert_eq!(second.registers(), &RegisterFile::new());
    }

    #[test]
    fn reset_clears_registers_and_diagnostics() {
        let mut processor = Processor::default();
        processor.registers_mut().set_x(RegisterId::Si, 0x0101);
        processor.decode_stream(&[0x89, 0xF3]).expect("decodes");

        processor.reset();

        assert_eq!(processor.registers(), &RegisterFile::new());
        assert_eq!(processor.diagnostics().moves_executed, 0);
        assert_eq!(processor.name(), DEFAULT_PROCESSOR_NAME);
    }
}
