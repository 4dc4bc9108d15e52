//! Cache simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Demo run:** Execute one of the four built-in presets against the reference trace.
//! 2. **Exponent run:** Build a configuration from power-of-two sizes and policy names.
//! 3. **Config run:** Load a JSON configuration file.
//!
//! Traces come from a file, from stdin (`-`), or default to the reference trace.

use std::io::Read as _;
use std::{fs, io, process};

use clap::{ArgAction, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{Config, Mapping, Preset, ReplacementPolicy, WritePolicy};
use cachesim_core::memory::hexdump;
use cachesim_core::sim::{Access, reference_trace, trace_lines};
use cachesim_core::{SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache simulator",
    long_about = "Replay a read/write trace through a configurable cache and report hits and misses.\n\nExamples:\n  cachesim demo 1\n  cachesim demo fifo-full-wb\n  cachesim run 10 6 3 set:2 LRU WT --trace trace.txt\n  cachesim config cache.json --trace -"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print the full statistics report after the run.
    #[arg(long, global = true)]
    stats: bool,

    /// Flush dirty lines at the end and hex-dump the first N bytes of memory.
    #[arg(long, global = true, value_name = "N")]
    dump: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a built-in preset (1-4 or its slug) on the reference trace.
    Demo {
        /// Preset: 1 lru-direct-wb, 2 fifo-full-wb, 3 lru-2way-wt, 4 rand-direct-wb.
        preset: Preset,
    },

    /// Run with sizes given as powers of two (2^EXP bytes).
    Run {
        /// Memory size exponent.
        mem_exp: u32,
        /// Cache size exponent.
        cache_exp: u32,
        /// Block size exponent.
        block_exp: u32,
        /// Mapping: direct, full, or set:N.
        mapping: Mapping,
        /// Replacement policy: RAND, LRU, FIFO, LFU.
        replacement: ReplacementPolicy,
        /// Write policy: WT, WB, WA.
        write: WritePolicy,

        /// Trace file (`-` for stdin). Defaults to the reference trace.
        #[arg(short, long)]
        trace: Option<String>,

        /// Seed for random replacement.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run with a JSON configuration file.
    Config {
        /// Path to the configuration file.
        path: String,

        /// Trace file (`-` for stdin). Defaults to the reference trace.
        #[arg(short, long)]
        trace: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (title, config, trace_path) = match cli.command {
        Commands::Demo { preset } => (preset.name().to_string(), preset.config(), None),
        Commands::Run {
            mem_exp,
            cache_exp,
            block_exp,
            mapping,
            replacement,
            write,
            trace,
            seed,
        } => {
            let mut config = Config::from_exponents(
                mem_exp,
                cache_exp,
                block_exp,
                mapping,
                replacement,
                write,
            )
            .unwrap_or_else(|e| fail(&e));
            if let Some(seed) = seed {
                config.cache.seed = seed;
            }
            ("Custom Configuration".to_string(), config, trace)
        }
        Commands::Config { path, trace } => {
            let json = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Error reading config {path}: {e}");
                process::exit(1);
            });
            let config = Config::from_json(&json).unwrap_or_else(|e| fail(&e));
            (path, config, trace)
        }
    };

    let trace = match trace_path {
        Some(path) => load_trace(&path),
        None => reference_trace(),
    };

    run(&title, &config, &trace, cli.stats, cli.dump);
}

/// Installs the `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the default `warn` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reports a configuration error and exits with status 1.
fn fail(err: &SimError) -> ! {
    eprintln!("Error: {err}");
    process::exit(1);
}

/// Reads a trace from `path` (or stdin for `-`).
///
/// Malformed lines are reported and skipped; `done` ends the trace.
fn load_trace(path: &str) -> Vec<Access> {
    let text = if path == "-" {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("Error reading trace from stdin: {e}");
            process::exit(1);
        }
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading trace {path}: {e}");
            process::exit(1);
        })
    };

    trace_lines(&text)
        .filter_map(|(lineno, access)| match access {
            Ok(access) => Some(access),
            Err(e) => {
                warn!(line = lineno, "skipping trace line: {e}");
                None
            }
        })
        .collect()
}

/// Builds the simulator, replays `trace`, and prints per-step and final results.
fn run(title: &str, config: &Config, trace: &[Access], stats: bool, dump: Option<usize>) {
    let mut sim = Simulator::new(config).unwrap_or_else(|e| fail(&e));

    println!("\n=== Running: {title} ===");
    println!("Configuration:");
    println!("  Memory size:   {}", config.memory.size_bytes);
    println!("  Cache size:    {}", config.cache.size_bytes);
    println!("  Block size:    {}", config.cache.block_bytes);
    println!("  Mapping:       {}", config.cache.mapping);
    println!(
        "  Sets x ways:   {} x {}",
        sim.cache().num_sets(),
        sim.cache().associativity()
    );
    println!("  Replacement:   {}", config.cache.replacement);
    println!("  Write policy:  {}", config.cache.write_policy);
    println!("==========================================\n");

    for &access in trace {
        match sim.step(access) {
            Ok(record) => {
                let outcome = if record.hit { "HIT " } else { "MISS" };
                match access {
                    Access::Read { address } => println!(
                        "READ   addr={address:3} -> value={:3}  {outcome} (hits={}, misses={})",
                        record.value.unwrap_or_default(),
                        record.hits,
                        record.misses
                    ),
                    Access::Write { address, value } => println!(
                        "WRITE  addr={address:3},  value={value:3}  {outcome} (hits={}, misses={})",
                        record.hits, record.misses
                    ),
                }
            }
            Err(e) => eprintln!("REJECTED {access}: {e}"),
        }
    }

    let cache = sim.cache();
    println!("\n=== FINAL RESULTS ===");
    println!("Hits:      {}", cache.hits());
    println!("Misses:    {}", cache.misses());
    println!("Hit Ratio: {:.2}", cache.hit_ratio());
    println!("=====================");

    if stats {
        println!();
        cache.stats().print();
    }

    if let Some(len) = dump {
        if let Err(e) = sim.flush() {
            eprintln!("Error flushing cache: {e}");
        }
        let bytes = sim.memory().as_slice();
        let len = len.min(bytes.len());
        println!("\nMemory [0..{len}) after flush:");
        for (row, chunk) in bytes[..len].chunks(16).enumerate() {
            println!("  {:04X}: {}", row * 16, hexdump(chunk));
        }
    }
}
