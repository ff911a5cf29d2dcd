//! RTL driver CLI.
//!
//! This binary provides a single entry point for driving and preparing programs. It performs:
//! 1. **Run:** Reset the device, preload an image, clock until halt or timeout, report the result.
//! 2. **Inspect:** List the preload words an image produces.
//! 3. **Hex:** Convert a raw binary or ELF into the text hex image format.
//! 4. **Calc:** Evaluate one soft multiply/divide helper.
//!
//! `run` drives the in-crate reference device; RTL backends link against
//! `dutsim-core` and implement its `Device` trait.

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use dutsim_core::config::Config;
use dutsim_core::sim::{ProgramImage, RunOutcome, run_program};
use dutsim_core::soc::PreloadRam;
use dutsim_core::softmath::SoftOp;

/// Exit status for a run that exhausted its cycle budget.
const EXIT_TIMEOUT: i32 = 1;
/// Exit status for unreadable inputs and invalid arguments.
const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate RTL driver",
    long_about = "Reset a processor model, preload a program through its preload bus, and clock it until it signals termination.\n\nExamples:\n  sim run -f program.hex\n  sim run -f program.elf --max-cycles 1000000 --json\n  sim hex -i program.bin -o program.hex\n  sim calc __divsi3 -- -7 2"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preload an image into the reference device and run it.
    Run {
        /// Program image (.hex text, .bin raw binary, or ELF). Defaults to the configured path.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the execution cycle budget.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Make the reference device terminate after N cycles.
        #[arg(long)]
        halt_after: Option<u64>,

        /// Load address for raw binaries (hex).
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        base: u32,

        /// Print the run report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Print driver statistics after the run.
        #[arg(long)]
        stats: bool,
    },

    /// List the preload words an image produces.
    Inspect {
        /// Program image (.hex text, .bin raw binary, or ELF).
        #[arg(short, long)]
        file: PathBuf,

        /// Load address for raw binaries (hex).
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        base: u32,
    },

    /// Convert a raw binary or ELF into the text hex image format.
    Hex {
        /// Input file (.bin raw binary or ELF).
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Load address for raw binaries (hex).
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        base: u32,
    },

    /// Evaluate a soft arithmetic helper (e.g. `__mulsi3`, `__divsi3`).
    Calc {
        /// Runtime helper symbol.
        symbol: String,
        /// First operand (decimal, may be negative, or 0x-prefixed hex).
        #[arg(allow_hyphen_values = true)]
        a: String,
        /// Second operand (decimal, may be negative, or 0x-prefixed hex).
        #[arg(allow_hyphen_values = true)]
        b: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Soft arithmetic result in machine-readable form.
#[derive(Serialize)]
struct CalcReport<'a> {
    symbol: &'a str,
    a: u32,
    b: u32,
    result: u32,
    signed_result: i32,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            file,
            config,
            max_cycles,
            halt_after,
            base,
            json,
            stats,
        } => cmd_run(
            file,
            config.as_deref(),
            max_cycles,
            halt_after,
            base,
            json,
            stats,
        ),
        Commands::Inspect { file, base } => cmd_inspect(&file, base),
        Commands::Hex {
            input,
            output,
            base,
        } => cmd_hex(&input, output.as_deref(), base),
        Commands::Calc { symbol, a, b, json } => cmd_calc(&symbol, &a, &b, json),
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, preloads the image into the reference device, and runs it.
///
/// Exits with status 0 on halt, 1 on timeout, and 2 when the config or image cannot be loaded.
fn cmd_run(
    file: Option<PathBuf>,
    config_path: Option<&Path>,
    max_cycles: Option<u64>,
    halt_after: Option<u64>,
    base: u32,
    json: bool,
    print_stats: bool,
) {
    let mut config = match config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fatal(&e)),
        None => Config::default(),
    };
    if let Some(n) = max_cycles {
        config.driver.max_cycles = n;
    }
    if halt_after.is_some() {
        config.device.halt_after = halt_after;
    }
    if let Err(e) = config.validate() {
        fatal(&e);
    }
    if cli_trace_requested() {
        config.general.trace_cycles = true;
    }

    let path = file.unwrap_or_else(|| config.driver.image_path.clone());
    let image = ProgramImage::load(&path, base).unwrap_or_else(|e| fatal(&e));

    if !json {
        println!("--- Loading {} via preload bus ---", path.display());
    }
    let device = PreloadRam::new(&config.device);
    let (report, _device) = run_program(device, &config, &image);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => fatal(&e),
        }
    } else {
        match report.outcome {
            RunOutcome::Halted {
                cycles,
                return_value,
            } => {
                println!("\n[HALT] Terminated at cycle {cycles}");
                println!("Result (x10/a0): {return_value}");
            }
            RunOutcome::TimedOut { .. } => println!("\n[ERROR] Simulation Timed Out!"),
        }
        if print_stats {
            report.stats.print();
        }
    }

    if !report.outcome.is_halted() {
        process::exit(EXIT_TIMEOUT);
    }
}

/// Prints one line per preload word, in load order.
fn cmd_inspect(file: &Path, base: u32) {
    let image = ProgramImage::load(file, base).unwrap_or_else(|e| fatal(&e));
    for word in &image {
        println!(
            "[Preload] Load instr {:08x} at addr {:08x}",
            word.data, word.addr
        );
    }
    println!("{} words", image.len());
}

/// Converts a raw binary or ELF into hex text, writing to `output` or stdout.
fn cmd_hex(input: &Path, output: Option<&Path>, base: u32) {
    let image = ProgramImage::load(input, base).unwrap_or_else(|e| fatal(&e));
    let text = image.to_hex();
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &text) {
                fatal(&e);
            }
            println!("Generated little-endian hex: {}", path.display());
            for line in text.lines().take(5) {
                println!("  {line}");
            }
        }
        None => print!("{text}"),
    }
}

/// Evaluates one soft arithmetic helper and prints the result.
fn cmd_calc(symbol: &str, a: &str, b: &str, json: bool) {
    let Some(op) = SoftOp::from_symbol(symbol) else {
        let known: Vec<&str> = SoftOp::ALL.iter().map(|op| op.symbol()).collect();
        fatal(&format!(
            "unknown helper '{symbol}' (expected one of {})",
            known.join(", ")
        ));
    };
    let a = parse_operand(a).unwrap_or_else(|e| fatal(&e));
    let b = parse_operand(b).unwrap_or_else(|e| fatal(&e));
    let result = op.execute(a, b).unwrap_or_else(|e| fatal(&e));

    if json {
        let report = CalcReport {
            symbol: op.symbol(),
            a,
            b,
            result,
            signed_result: result as i32,
        };
        match serde_json::to_string(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => fatal(&e),
        }
    } else if op.is_signed() {
        println!("{op}({}, {}) = {}", a as i32, b as i32, result as i32);
    } else {
        println!("{op}({a}, {b}) = {result}");
    }
}

/// Returns `true` when the active log filter admits trace-level events.
fn cli_trace_requested() -> bool {
    tracing::enabled!(tracing::Level::TRACE)
}

/// Parses a hex address with an optional `0x` prefix.
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{s}': {e}"))
}

/// Parses a 32-bit operand: `0x` hex, or decimal in the `i32` or `u32` range.
fn parse_operand(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).map_err(|e| format!("invalid operand '{s}': {e}"));
    }
    s.parse::<i32>()
        .map(|v| v as u32)
        .or_else(|_| s.parse::<u32>())
        .map_err(|e| format!("invalid operand '{s}': {e}"))
}

/// Prints an error and exits with the usage status.
fn fatal(err: &dyn std::fmt::Display) -> ! {
    eprintln!("\n[!] FATAL: {err}");
    process::exit(EXIT_USAGE);
}
