//! Prompt planning
//!
//! Runs the sentiment analyzer and tool executor for the trigger message
//! and turns the outcome into a [`ReplyPlan`]: the turn list, system prompt
//! and role for the selected persona.
//!
//! An executor that is configured but unreachable sends every message down
//! the history path with a random role, neutral ones included. Neutral
//! messages never reach `execute`.

use std::sync::Arc;

use uuid::Uuid;

use hibiki::domain::{compose_system_prompt, context_turns, history_turns, plain_turns};
use hibiki::{
    ActivePersona, ChatMessage, Dice, DomainError, Message, MessageStore, RoleCatalog, RoleConfig,
    SentimentAnalyzer, ToolContext, ToolExecutor,
};

use super::history::RecentHistory;
use crate::config::OrchestratorConfig;

/// Turn layout chosen for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPath {
    /// Single user turn, no system prompt
    Wild,
    /// Trigger alone under the persona's own voice
    Plain,
    /// Tool context injected between the addressed-user line and the trigger
    Context,
    /// Labelled recent history, random role
    History,
}

#[derive(Debug, Clone)]
pub struct ReplyPlan {
    pub path: PromptPath,
    pub turns: Vec<ChatMessage>,
    pub system_prompt: Option<String>,
    pub role: Option<RoleConfig>,
}

impl ReplyPlan {
    pub fn wild(trigger_text: &str) -> Self {
        Self {
            path: PromptPath::Wild,
            turns: plain_turns(trigger_text),
            system_prompt: None,
            role: None,
        }
    }
}

enum Gathered {
    Neutral,
    Context { prose: String, role: Option<RoleConfig> },
    Empty,
}

pub struct ContextPlanner {
    store: Arc<dyn MessageStore>,
    roles: Arc<RoleCatalog>,
    sentiment: Option<Arc<dyn SentimentAnalyzer>>,
    tools: Option<Arc<dyn ToolExecutor>>,
    config: OrchestratorConfig,
}

impl ContextPlanner {
    pub fn new(store: Arc<dyn MessageStore>, roles: Arc<RoleCatalog>, config: OrchestratorConfig) -> Self {
        Self {
            store,
            roles,
            sentiment: None,
            tools: None,
            config,
        }
    }

    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = Some(analyzer);
        self
    }

    pub fn with_tools(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.tools = Some(executor);
        self
    }

    pub async fn plan(
        &self,
        persona: &ActivePersona,
        trigger: &Message,
        sender_id: Uuid,
        sender_name: &str,
        dice: &mut dyn Dice,
    ) -> ReplyPlan {
        let (Some(sentiment), Some(tools)) = (&self.sentiment, &self.tools) else {
            return self.plain(persona, &trigger.text);
        };

        match self
            .gather(sentiment.as_ref(), tools.as_ref(), sender_id, &trigger.text)
            .await
        {
            Ok(Gathered::Neutral) => self.plain(persona, &trigger.text),
            Ok(Gathered::Context { prose, role }) => {
                let role = role.unwrap_or_else(|| self.default_role());
                ReplyPlan {
                    path: PromptPath::Context,
                    turns: context_turns(sender_name, &prose, &trigger.text),
                    system_prompt: Some(compose_system_prompt(&persona.persona, Some(&role))),
                    role: Some(role),
                }
            }
            Ok(Gathered::Empty) => self.with_history(persona, trigger, sender_name, dice).await,
            Err(e) => {
                tracing::warn!(room_id = %trigger.room_id, error = %e, "Context pipeline failed, using history");
                self.with_history(persona, trigger, sender_name, dice).await
            }
        }
    }

    async fn gather(
        &self,
        sentiment: &dyn SentimentAnalyzer,
        tools: &dyn ToolExecutor,
        sender_id: Uuid,
        text: &str,
    ) -> Result<Gathered, DomainError> {
        tools.check_ready().await?;

        let result = sentiment.analyze(text).await?;
        if result.is_neutral {
            tracing::debug!("Neutral message, skipping tools");
            return Ok(Gathered::Neutral);
        }

        let context = ToolContext {
            user_id: sender_id,
            user_message: text.to_string(),
            sentiment: result,
        };
        let executed = tools
            .execute(&context, self.config.max_tools, self.config.min_relevance_score)
            .await?;

        match executed.merged_context_prompt {
            Some(prose) if executed.has_context && !prose.trim().is_empty() => {
                tracing::debug!(tools = executed.executed_results.len(), "Tool context gathered");
                Ok(Gathered::Context {
                    prose,
                    role: executed.suggested_role,
                })
            }
            _ => Ok(Gathered::Empty),
        }
    }

    fn plain(&self, persona: &ActivePersona, trigger_text: &str) -> ReplyPlan {
        ReplyPlan {
            path: PromptPath::Plain,
            turns: plain_turns(trigger_text),
            system_prompt: Some(compose_system_prompt(&persona.persona, None)),
            role: None,
        }
    }

    async fn with_history(
        &self,
        persona: &ActivePersona,
        trigger: &Message,
        sender_name: &str,
        dice: &mut dyn Dice,
    ) -> ReplyPlan {
        let role = self.roles.random(dice);

        let history = match RecentHistory::rebuild(
            self.store.as_ref(),
            trigger.room_id,
            self.config.history_window,
            self.config.history_limit,
        )
        .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(room_id = %trigger.room_id, error = %e, "History unavailable, replying to trigger only");
                RecentHistory::default()
            }
        };

        let mut turns = history_turns(persona.kind(), sender_name, history.entries());
        if !history.contains_message(trigger.id) {
            turns.push(ChatMessage::user(trigger.text.clone()));
        }

        ReplyPlan {
            path: PromptPath::History,
            turns,
            system_prompt: Some(compose_system_prompt(&persona.persona, Some(&role))),
            role: Some(role),
        }
    }

    fn default_role(&self) -> RoleConfig {
        self.roles
            .get(&self.config.default_role)
            .cloned()
            .unwrap_or_else(|| self.roles.secretary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{Fixture, StaticSentiment, StaticTools};
    use hibiki::{MessageRole, ScriptedDice, SentimentResult};

    fn planner(fx: &Fixture) -> ContextPlanner {
        ContextPlanner::new(fx.store.clone(), fx.roles.clone(), OrchestratorConfig::default())
    }

    #[tokio::test]
    async fn test_without_collaborators_plan_is_plain() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "hello");

        let plan = planner(&fx)
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::default())
            .await;

        assert_eq!(plan.path, PromptPath::Plain);
        assert_eq!(plan.turns, vec![ChatMessage::user("hello")]);
        assert!(plan.role.is_none());
        assert!(plan.system_prompt.unwrap().contains("You are Mio"));
    }

    #[tokio::test]
    async fn test_neutral_message_skips_tools() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "lol");
        let tools = Arc::new(StaticTools::with_context("unused", None));
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::returning(SentimentResult::neutral())))
            .with_tools(tools.clone());

        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::default())
            .await;

        assert_eq!(plan.path, PromptPath::Plain);
        assert_eq!(tools.calls(), 0);
    }

    #[tokio::test]
    async fn test_context_path_defaults_to_secretary() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "what is rust?");
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::returning(fx.curious())))
            .with_tools(Arc::new(StaticTools::with_context("Rust is a language.", None)));

        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::default())
            .await;

        assert_eq!(plan.path, PromptPath::Context);
        assert_eq!(plan.role.as_ref().map(|r| r.name.as_str()), Some("secretary"));
        assert_eq!(plan.turns.len(), 3);
        assert_eq!(plan.turns[1].content, "Context: Rust is a language.");
        assert_eq!(plan.turns[2].content, "what is rust?");
    }

    #[tokio::test]
    async fn test_no_context_uses_history_with_random_role() {
        let fx = Fixture::new();
        fx.store.post(fx.room_id, fx.default_actor, "earlier reply");
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "what is rust?");
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::returning(fx.curious())))
            .with_tools(Arc::new(StaticTools::empty()));

        // role index 3 = comedian
        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::new([3]))
            .await;

        assert_eq!(plan.path, PromptPath::History);
        assert_eq!(plan.role.as_ref().map(|r| r.name.as_str()), Some("comedian"));
        assert_eq!(plan.turns[0].content, "You are talking with Aiko.");
        assert_eq!(plan.turns[1].role, MessageRole::Assistant);
        assert_eq!(plan.turns.last().map(|t| t.content.as_str()), Some("what is rust?"));
        assert_eq!(plan.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_failing_executor_uses_history_without_context() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "why?");
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::returning(fx.curious())))
            .with_tools(Arc::new(StaticTools::failing()));

        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::new([0]))
            .await;

        assert_eq!(plan.path, PromptPath::History);
        assert!(plan.role.is_some());
        assert!(plan.turns.iter().all(|t| !t.content.starts_with("Context:")));
    }

    #[tokio::test]
    async fn test_failing_analyzer_uses_history() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "why?");
        let tools = Arc::new(StaticTools::with_context("unused", None));
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::failing()))
            .with_tools(tools.clone());

        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::new([0]))
            .await;

        assert_eq!(plan.path, PromptPath::History);
        assert_eq!(tools.calls(), 0);
    }

    #[tokio::test]
    async fn test_neutral_message_with_unreachable_executor_draws_role() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "ok");
        let tools = Arc::new(StaticTools::failing());
        let planner = planner(&fx)
            .with_sentiment(Arc::new(StaticSentiment::returning(SentimentResult::neutral())))
            .with_tools(tools.clone());

        // role index 2 = researcher
        let plan = planner
            .plan(&fx.active_default(), &trigger, fx.sender_id, "Aiko", &mut ScriptedDice::new([2]))
            .await;

        assert_eq!(plan.path, PromptPath::History);
        assert_eq!(plan.role.as_ref().map(|r| r.name.as_str()), Some("researcher"));
        assert_eq!(tools.calls(), 0);
        assert!(plan.turns.iter().all(|t| !t.content.starts_with("Context:")));
    }
}
