//! prefix-code-demo: build a prefix code and watch it encode or decode.
//!
//! Pipeline: resolve config -> build model -> print codebook, tree, trace
//! and statistics -> step a cursor through the message until it stops.

mod config;
mod input_gen;
mod report;

use config::{Config, Message, Source};
use prefix_code_core::input::{parse_codebook, parse_frequencies, parse_plaintext};
use prefix_code_core::stats::CodeStats;
use prefix_code_core::{CodeModel, CodecCursor, FrequencyTable};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Frequencies used when no input is given.
const SAMPLE_FREQUENCIES: [(&str, u64); 3] = [("a", 25), ("b", 76), ("e", 135)];

#[derive(Error, Debug)]
enum RunError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Code(#[from] prefix_code_core::Error),
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), RunError> {
    let model = build_model(config)?;
    info!(
        symbols = model.len(),
        frequencies = model.has_frequency_data(),
        "code built"
    );

    report::print_codebook(&model);
    report::print_tree(&model);
    if config.show_trace {
        if model.has_frequency_data() {
            report::print_trace(&model)?;
        } else {
            info!("codebook-built models have no construction trace");
        }
    }
    if config.print_stats {
        CodeStats::from_model(&model).print_summary();
    }

    let mut cursor = CodecCursor::new();
    match &config.message {
        Message::Encode(text) => {
            cursor.edit_plain(&model, text);
        }
        Message::Decode(bits) => {
            cursor.edit_encoded(&model, bits);
        }
        Message::Random(len) => {
            let text = input_gen::generate_message(config.seed, &model, *len);
            cursor.edit_plain(&model, &text);
        }
    }
    let (steps, truncated) = report::play(&mut cursor);
    info!(steps, truncated, "cursor finished");
    Ok(())
}

fn build_model(config: &Config) -> Result<CodeModel, RunError> {
    let model = match &config.source {
        Source::Text(text) => CodeModel::from_text(parse_plaintext(text)?)?,
        Source::FrequencyFile(path) => {
            CodeModel::from_frequencies(&parse_frequencies(&read(path)?)?)?
        }
        Source::CodebookFile(path) => CodeModel::from_codebook(&parse_codebook(&read(path)?)?)?,
        Source::Random(symbols) => {
            let table = input_gen::generate_frequencies(config.seed, *symbols)?;
            CodeModel::from_frequencies(&table)?
        }
        Source::Sample => {
            CodeModel::from_frequencies(&FrequencyTable::from_pairs(SAMPLE_FREQUENCIES)?)?
        }
    };
    Ok(model)
}

fn read(path: &Path) -> Result<String, RunError> {
    std::fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.to_path_buf(),
        source,
    })
}
