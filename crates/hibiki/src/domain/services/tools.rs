//! Capability tools and the registry that executes them
//!
//! Each tool scores its own relevance for a message; the registry runs
//! the best-scoring tools that clear the relevance bar and merges what
//! they produce.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{errors::DomainError, RoleConfig, ToolContext, ToolExecutionResult, ToolResult};
use crate::ports::ToolExecutor;

use super::RoleCatalog;

/// A single capability that can contribute prompt context
#[async_trait]
pub trait CapabilityTool: Send + Sync {
    fn name(&self) -> &str;

    /// Relevance for this message, 0..=100
    fn relevance(&self, context: &ToolContext) -> u8;

    async fn run(&self, context: &ToolContext, relevance: u8) -> Result<ToolResult, DomainError>;
}

/// Tool executor over a fixed set of tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn CapabilityTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tools
    pub fn with_builtin_tools(roles: &RoleCatalog) -> Self {
        Self::new()
            .with_tool(Arc::new(ClockTool))
            .with_tool(Arc::new(GuidanceTool::new(roles.get("mentor").cloned())))
            .with_tool(Arc::new(TopicBriefTool::new(roles.get("researcher").cloned())))
    }

    pub fn with_tool(mut self, tool: Arc<dyn CapabilityTool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(
        &self,
        context: &ToolContext,
        max_tools: usize,
        min_relevance_score: u8,
    ) -> Result<ToolExecutionResult, DomainError> {
        let mut scored: Vec<(u8, &Arc<dyn CapabilityTool>)> = self
            .tools
            .iter()
            .map(|tool| (tool.relevance(context), tool))
            .filter(|(score, _)| *score > min_relevance_score)
            .collect();

        // Stable sort keeps registration order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut results = Vec::with_capacity(max_tools.min(scored.len()));
        for (score, tool) in scored.into_iter().take(max_tools) {
            match tool.run(context, score).await {
                Ok(result) => {
                    tracing::debug!(tool = %tool.name(), relevance = score, "Tool produced context");
                    results.push(result);
                }
                Err(e) => {
                    tracing::warn!(tool = %tool.name(), error = %e, "Tool failed, skipping");
                }
            }
        }

        Ok(ToolExecutionResult::from_results(results))
    }
}

// ============================================
// Built-in tools
// ============================================

const TIME_WORDS: &[&str] = &["time", "date", "today", "what day", "tomorrow", "weekday"];

/// Current date and time facts
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTool;

#[async_trait]
impl CapabilityTool for ClockTool {
    fn name(&self) -> &str {
        "clock"
    }

    fn relevance(&self, context: &ToolContext) -> u8 {
        if context.sentiment.information_seeking_score == 0 {
            return 0;
        }
        let lowered = context.user_message.to_lowercase();
        let topic = context
            .sentiment
            .information_topic
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        if TIME_WORDS.iter().any(|w| lowered.contains(w) || topic.contains(w)) {
            90
        } else {
            0
        }
    }

    async fn run(&self, _context: &ToolContext, relevance: u8) -> Result<ToolResult, DomainError> {
        let now = Utc::now();
        Ok(ToolResult {
            tool_name: self.name().to_string(),
            relevance,
            context_prompt: Some(format!(
                "Current date and time (UTC): {} ({}).",
                now.format("%Y-%m-%d %H:%M"),
                now.format("%A")
            )),
            suggested_role: None,
        })
    }
}

/// Frames advice requests
#[derive(Debug, Clone, Default)]
pub struct GuidanceTool {
    role: Option<RoleConfig>,
}

impl GuidanceTool {
    pub fn new(role: Option<RoleConfig>) -> Self {
        Self { role }
    }
}

#[async_trait]
impl CapabilityTool for GuidanceTool {
    fn name(&self) -> &str {
        "guidance"
    }

    fn relevance(&self, context: &ToolContext) -> u8 {
        context.sentiment.guidance_seeking_score
    }

    async fn run(&self, _context: &ToolContext, relevance: u8) -> Result<ToolResult, DomainError> {
        Ok(ToolResult {
            tool_name: self.name().to_string(),
            relevance,
            context_prompt: Some(
                "The user is asking for advice. Give concrete next steps and ask one \
                 clarifying question if the situation is unclear."
                    .to_string(),
            ),
            suggested_role: self.role.clone(),
        })
    }
}

/// States what the user wants explained
#[derive(Debug, Clone, Default)]
pub struct TopicBriefTool {
    role: Option<RoleConfig>,
}

impl TopicBriefTool {
    pub fn new(role: Option<RoleConfig>) -> Self {
        Self { role }
    }
}

#[async_trait]
impl CapabilityTool for TopicBriefTool {
    fn name(&self) -> &str {
        "topic_brief"
    }

    fn relevance(&self, context: &ToolContext) -> u8 {
        let score = context.sentiment.information_seeking_score;
        if context.sentiment.information_topic.is_some() {
            score
        } else {
            score / 2
        }
    }

    async fn run(&self, context: &ToolContext, relevance: u8) -> Result<ToolResult, DomainError> {
        let prompt = match context.sentiment.information_topic.as_deref() {
            Some(topic) => format!(
                "The user wants information about \"{}\". Answer factually and say so when unsure.",
                topic
            ),
            None => "The user is asking a factual question. Answer factually and say so when unsure."
                .to_string(),
        };
        Ok(ToolResult {
            tool_name: self.name().to_string(),
            relevance,
            context_prompt: Some(prompt),
            suggested_role: self.role.clone(),
        })
    }
}
