use crate::file_processor::FileMetadata;
use crate::grammar::tree::ParseTree;
use crate::lexical::LexicalMetrics;
use std::time::Duration;

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub tree: ParseTree,
    pub token_count: usize,
    pub lexical_metrics: LexicalMetrics,
    pub source_name: String,
    /// Present when the source came from a file
    pub file_metadata: Option<FileMetadata>,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Tokenize and parse completed",
            "source" => self.source_name,
            "tokens" => self.token_count,
            "nodes" => self.tree.len(),
            "duration_ms" => format!("{:.2}", self.duration.as_secs_f64() * 1000.0)
        );
    }
}
