//! CLI entry point for the sim8086 decoder binary.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use sim8086_cli::loader::{load_program, CliError};
use sim8086_cli::report::{banner, byte_dump, listing_line, StdoutTrace, CLEAR_SCREEN};
use sim8086_core::{disassemble, NullTrace, Processor, TraceSink};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: sim8086 <command> [options]

Commands:
  run    <input> [--bytes] [--clear] [--quiet]  Decode and execute register moves
  disasm <input>                                List instructions without executing

Options:
  -b, --bytes  Print the loaded bytes before decoding (run only)
  -c, --clear  Clear the terminal before printing (run only)
  -q, --quiet  Suppress per-instruction output (run only)
  -h, --help   Show this help message

Examples:
  sim8086 run listing_0038_many_register_mov
  sim8086 run program.bin --bytes
  sim8086 disasm program.bin
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Disasm(DisasmArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    bytes: bool,
    clear: bool,
    quiet: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct DisasmArgs {
    input: PathBuf,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "disasm" => parse_disasm_args(args)
            .map(Command::Disasm)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_run_args(args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut bytes = false;
    let mut clear = false;
    let mut quiet = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--bytes" || arg == "-b" {
            bytes = true;
            continue;
        }

        if arg == "--clear" || arg == "-c" {
            clear = true;
            continue;
        }

        if arg == "--quiet" || arg == "-q" {
            quiet = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(RunArgs {
        input,
        bytes,
        clear,
        quiet,
    })
}

fn parse_disasm_args(args: impl Iterator<Item = OsString>) -> Result<DisasmArgs, String> {
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(DisasmArgs { input })
}

fn run_decode(args: &RunArgs) -> Result<(), CliError> {
    let program = load_program(&args.input)?;

    if args.clear {
        print!("{CLEAR_SCREEN}");
    }
    if args.bytes {
        println!("{}", byte_dump(&program.bytes));
    }

    let mut processor = Processor::default();
    let mut stdout_trace = StdoutTrace;
    let mut null_trace = NullTrace;
    let trace: &mut dyn TraceSink = if args.quiet {
        &mut null_trace
    } else {
        &mut stdout_trace
    };

    let outcome = processor.decode_loaded(&program.bytes, program.reported_len, trace);

    // Registers written before an abort are still reported.
    println!();
    println!("{}", banner(processor.name()));
    print!("{}", processor.snapshot());

    outcome?;
    Ok(())
}

fn run_disasm(args: &DisasmArgs) -> Result<(), CliError> {
    let program = load_program(&args.input)?;

    for row in disassemble(&program.bytes) {
        println!("{}", listing_line(&row));
    }

    Ok(())
}

fn finish(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => finish(run_decode(&args)),
        Ok(ParseResult::Command(Command::Disasm(args))) => finish(run_disasm(&args)),
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
