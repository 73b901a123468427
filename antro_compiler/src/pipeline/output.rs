use crate::grammar::tree::ParseTree;
use crate::pipeline::PipelineResult;
use serde::{Deserialize, Serialize};

/// Serializable view of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub source_name: String,
    pub token_count: usize,
    pub tree: ParseTree,
}

impl PipelineOutput {
    pub fn new(source_name: impl Into<String>, token_count: usize, tree: ParseTree) -> Self {
        Self {
            source_name: source_name.into(),
            token_count,
            tree,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&PipelineResult> for PipelineOutput {
    fn from(result: &PipelineResult) -> Self {
        Self::new(
            result.source_name.clone(),
            result.token_count,
            result.tree.clone(),
        )
    }
}
