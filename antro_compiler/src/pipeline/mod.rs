//! Tokenize-then-parse driver
//!
//! Tokenization runs to completion before parsing starts. The first failure
//! from any stage ends the run and comes back as one [`PipelineError`].

mod error;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::{create_processor_from_preferences, FileMetadata};
use crate::lexical::create_analyzer_with_preferences;
use std::path::Path;
use std::time::Instant;

/// Tokenize and parse in-memory source; `source_name` labels diagnostics
pub fn process_source(source_name: &str, source: &str) -> Result<PipelineResult, PipelineError> {
    process_source_with_config(source_name, source, &RuntimeConfig::default())
}

pub fn process_source_with_config(
    source_name: &str,
    source: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    run(source_name, source, None, config, Instant::now())
}

/// Read, tokenize and parse the file at `file_path`
pub fn process_file(file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: impl AsRef<Path>,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let file_result =
        create_processor_from_preferences(&config.file_processor).process_file(file_path)?;
    let source_name = file_result.metadata.source_name();

    run(
        &source_name,
        &file_result.source,
        Some(file_result.metadata),
        config,
        start_time,
    )
}

fn run(
    source_name: &str,
    source: &str,
    file_metadata: Option<FileMetadata>,
    config: &RuntimeConfig,
    start_time: Instant,
) -> Result<PipelineResult, PipelineError> {
    crate::log_info!("Starting pipeline", "source" => source_name);

    let mut analyzer = create_analyzer_with_preferences(config.lexical.clone());
    let tokens = analyzer.tokenize_named(source_name, source)?;
    let token_count = tokens.len();

    let tree = crate::syntax::parse_with_preferences(tokens, config.syntax.clone())?;

    let result = PipelineResult {
        tree,
        token_count,
        lexical_metrics: analyzer.metrics().clone(),
        source_name: source_name.to_string(),
        file_metadata,
        duration: start_time.elapsed(),
    };
    result.log_success();

    Ok(result)
}
