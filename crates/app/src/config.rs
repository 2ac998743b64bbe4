//! Configuration for the prefix-code-demo application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it builds the classic
//! `{a:25, b:76, e:135}` code and steps through a random message. All
//! resolved values can be printed so runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Where the code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Count the characters of a raw text
    Text(String),
    /// Two-column symbol/frequency file
    FrequencyFile(PathBuf),
    /// Two-column symbol/codeword file
    CodebookFile(PathBuf),
    /// Generate this many symbol frequencies from the seed
    Random(usize),
    /// Built-in sample frequencies
    Sample,
}

/// What the cursor steps through once the code is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Encode(String),
    Decode(String),
    /// Generate a plaintext of this many symbols from the seed
    Random(usize),
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    pub source: Source,

    pub message: Message,

    /// Seed for every generated input
    pub seed: u64,

    // === Output ===
    /// Print every frontier snapshot of the construction
    pub show_trace: bool,

    /// Print code statistics
    pub print_stats: bool,

    /// Print the resolved configuration
    pub print_config: bool,

    /// 0 = info, 1 = debug, 2+ = trace
    pub verbosity: u8,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If no arguments are provided, uses the sample frequencies and a
    /// randomized message from a time-based seed.
    /// If --seed is provided, every generated value uses that seed.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut source: Option<Source> = None;
        let mut message: Option<Message> = None;
        let mut seed: Option<u64> = None;
        let mut show_trace = false;
        let mut print_stats = true;
        let mut print_config = false;
        let mut verbosity: u8 = 0;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--text" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--text requires a string".to_string());
                    }
                    set_once(&mut source, Source::Text(args[i].clone()), "input")?;
                }
                "--freq" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--freq requires a path".to_string());
                    }
                    set_once(
                        &mut source,
                        Source::FrequencyFile(PathBuf::from(&args[i])),
                        "input",
                    )?;
                }
                "--codebook" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--codebook requires a path".to_string());
                    }
                    set_once(
                        &mut source,
                        Source::CodebookFile(PathBuf::from(&args[i])),
                        "input",
                    )?;
                }
                "--random" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--random requires a number".to_string());
                    }
                    let n: usize = args[i].parse().map_err(|_| "invalid symbol count")?;
                    if n < 2 {
                        return Err("--random needs at least 2 symbols".to_string());
                    }
                    set_once(&mut source, Source::Random(n), "input")?;
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--encode" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--encode requires a string".to_string());
                    }
                    set_once(&mut message, Message::Encode(args[i].clone()), "message")?;
                }
                "--decode" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--decode requires a bit string".to_string());
                    }
                    set_once(&mut message, Message::Decode(args[i].clone()), "message")?;
                }
                "--random-message" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--random-message requires a number".to_string());
                    }
                    let n = args[i].parse().map_err(|_| "invalid message length")?;
                    set_once(&mut message, Message::Random(n), "message")?;
                }
                "--trace" => {
                    show_trace = true;
                }
                "--no-stats" => {
                    print_stats = false;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--verbose" | "-v" => {
                    verbosity = verbosity.saturating_add(1);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or_default()
        });

        // Generate defaults using seed
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Ok(Config {
            source: source.unwrap_or(Source::Sample),
            message: message.unwrap_or_else(|| Message::Random(rng.gen_range(8..=24))),
            seed,
            show_trace,
            print_stats,
            print_config,
            verbosity,
        })
    }

    /// Log filter directive for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.source {
            Source::Text(text) => println!("Input: text {:?}", text),
            Source::FrequencyFile(path) => println!("Input: frequencies from {}", path.display()),
            Source::CodebookFile(path) => println!("Input: codebook from {}", path.display()),
            Source::Random(n) => println!("Input: {} random symbol frequencies", n),
            Source::Sample => println!("Input: sample frequencies (a 25, b 76, e 135)"),
        }
        match &self.message {
            Message::Encode(text) => println!("Message: encode {:?}", text),
            Message::Decode(bits) => println!("Message: decode {:?}", bits),
            Message::Random(n) => println!("Message: {} random symbols", n),
        }
        println!("Seed: {}", self.seed);
        println!();
        println!("Show trace: {}", self.show_trace);
        println!("Print stats: {}", self.print_stats);
        println!("Log level: {}", self.log_filter());
        println!();
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &str) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("only one {} option may be given", what));
    }
    *slot = Some(value);
    Ok(())
}

fn print_help() {
    println!("prefix-code-demo: Build Huffman codes and step through encoding and decoding");
    println!();
    println!("USAGE:");
    println!("    prefix-code-demo [OPTIONS]");
    println!();
    println!("INPUT (pick one, default: a 25, b 76, e 135):");
    println!("    --text <STR>            Build from the character counts of a text");
    println!("    --freq <PATH>           Symbol/frequency file, one pair per line");
    println!("    --codebook <PATH>       Symbol/codeword file, one pair per line");
    println!("    --random <N>            Generate N symbol frequencies");
    println!("    --seed <N>              Random seed for determinism");
    println!();
    println!("MESSAGE (pick one, default: random 8-24 symbols):");
    println!("    --encode <STR>          Step through encoding a plaintext");
    println!("    --decode <BITS>         Step through decoding a bit string");
    println!("    --random-message <N>    Step through encoding N random symbols");
    println!();
    println!("    --trace                 Print every merge of the construction");
    println!("    --no-stats              Don't print code statistics");
    println!("    --print-config          Print resolved configuration");
    println!("    --verbose, -v           More logging (repeat for trace level)");
    println!("    --help, -h              Print this help");
    println!();
    println!("In input files write a space as \\s, a newline as \\n and a tab as \\t.");
    println!();
    println!("EXAMPLES:");
    println!("    prefix-code-demo --seed 42                        # Deterministic run");
    println!("    prefix-code-demo --text \"abracadabra\" --trace    # Watch the merges");
    println!("    prefix-code-demo --codebook code.txt --decode 0110 # Decode with a given code");
    println!();
}
