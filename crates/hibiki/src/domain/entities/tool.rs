//! Tool execution - Context produced by capability tools

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RoleConfig, SentimentResult};

/// Input handed to every capability tool
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub user_id: Uuid,
    pub user_message: String,
    pub sentiment: SentimentResult,
}

/// Output of a single tool run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_name: String,
    pub relevance: u8,
    pub context_prompt: Option<String>,
    pub suggested_role: Option<RoleConfig>,
}

/// Aggregated output of the tool executor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolExecutionResult {
    pub executed_results: Vec<ToolResult>,
    pub merged_context_prompt: Option<String>,
    pub suggested_role: Option<RoleConfig>,
    pub has_context: bool,
}

impl ToolExecutionResult {
    /// Merge individual results: prose joined by blank lines, first suggested role wins
    pub fn from_results(executed_results: Vec<ToolResult>) -> Self {
        let prose: Vec<&str> = executed_results
            .iter()
            .filter_map(|r| r.context_prompt.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let merged_context_prompt = if prose.is_empty() {
            None
        } else {
            Some(prose.join("\n\n"))
        };

        let suggested_role = executed_results
            .iter()
            .find_map(|r| r.suggested_role.clone());

        Self {
            has_context: merged_context_prompt.is_some(),
            merged_context_prompt,
            suggested_role,
            executed_results,
        }
    }
}
