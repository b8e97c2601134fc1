//! Reply Orchestrator
//!
//! One run per inbound human message:
//!
//! 1. guard: bot enabled, credentials, completion client, room, trigger, sender
//! 2. wild lottery and input quality gate
//! 3. persona selection
//! 4. prompt planning (plain, context or history path), second lottery on
//!    the plain path
//! 5. read receipt, typing bracket around generation, delivery
//!
//! Guard failures are skips, not errors. Once the typing indicator is up
//! every exit path clears it exactly once.

use std::sync::Arc;

use uuid::Uuid;

use hibiki::domain::wild_lottery;
use hibiki::{
    ActivePersona, CompletionClient, CompletionClientFactory, ContentPersonaClassifier, Dice,
    HistoryPersonaClassifier, InputQualityAnalyzer, Message, MessageStore, NotificationPublisher,
    PersonaCatalog, RandomDice, ReplyOutcome, ReplyRequest, RoleCatalog, SentimentAnalyzer,
    SkipReason, TenantRepository, ToolExecutor,
};

use super::context::{ContextPlanner, PromptPath, ReplyPlan};
use super::error::ReplyError;
use super::generator::generate_reply;
use super::presence::PresenceEmitter;
use super::selector::{PersonaSelector, SelectionStrategy};
use crate::config::OrchestratorConfig;

/// Everything the guard step resolved
struct Prepared {
    client: Arc<dyn CompletionClient>,
    trigger: Message,
    sender_name: String,
}

enum Gate {
    Open(Prepared),
    Skip(SkipReason),
}

pub struct ReplyOrchestrator {
    store: Arc<dyn MessageStore>,
    tenants: Arc<dyn TenantRepository>,
    completions: Arc<dyn CompletionClientFactory>,
    input_quality: Option<Arc<dyn InputQualityAnalyzer>>,
    selector: PersonaSelector,
    planner: ContextPlanner,
    presence: PresenceEmitter,
}

impl ReplyOrchestrator {
    pub fn new(
        store: Arc<dyn MessageStore>,
        tenants: Arc<dyn TenantRepository>,
        completions: Arc<dyn CompletionClientFactory>,
        publisher: Arc<dyn NotificationPublisher>,
        personas: Arc<PersonaCatalog>,
        roles: Arc<RoleCatalog>,
        config: OrchestratorConfig,
    ) -> Self {
        let selector = PersonaSelector::new(Arc::clone(&store), personas, config.clone());
        let planner = ContextPlanner::new(Arc::clone(&store), roles, config.clone());
        let presence = PresenceEmitter::new(Arc::clone(&store), publisher, config.typing_timeout_secs);

        Self {
            store,
            tenants,
            completions,
            input_quality: None,
            selector,
            planner,
            presence,
        }
    }

    pub fn with_input_quality(mut self, analyzer: Arc<dyn InputQualityAnalyzer>) -> Self {
        self.input_quality = Some(analyzer);
        self
    }

    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.planner = self.planner.with_sentiment(analyzer);
        self
    }

    pub fn with_tools(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.planner = self.planner.with_tools(executor);
        self
    }

    pub fn with_history_classifier(mut self, classifier: Arc<dyn HistoryPersonaClassifier>) -> Self {
        self.selector = self.selector.with_history_classifier(classifier);
        self
    }

    pub fn with_content_classifier(mut self, classifier: Arc<dyn ContentPersonaClassifier>) -> Self {
        self.selector = self.selector.with_content_classifier(classifier);
        self
    }

    pub async fn handle(&self, request: ReplyRequest) -> Result<ReplyOutcome, ReplyError> {
        let mut dice = RandomDice::from_entropy();
        self.handle_with_dice(request, &mut dice).await
    }

    pub async fn handle_with_dice(
        &self,
        request: ReplyRequest,
        dice: &mut dyn Dice,
    ) -> Result<ReplyOutcome, ReplyError> {
        let prepared = match self.prepare(&request).await? {
            Gate::Open(prepared) => prepared,
            Gate::Skip(reason) => {
                tracing::info!(
                    room_id = %request.room_id,
                    trigger_message_id = %request.trigger_message_id,
                    reason = %reason,
                    "Reply skipped"
                );
                return Ok(ReplyOutcome::skipped(reason));
            }
        };
        let Prepared {
            client,
            trigger,
            sender_name,
        } = prepared;

        let (persona, plan, strategy) = match self.wild_gate(request.organization_id, &trigger.text, dice).await {
            Some(wild) => (wild, ReplyPlan::wild(&trigger.text), SelectionStrategy::Wild),
            None => {
                let selection = self
                    .selector
                    .select(request.organization_id, request.room_id, &trigger.text, dice)
                    .await?;
                let plan = self
                    .planner
                    .plan(&selection.persona, &trigger, request.sender_id, &sender_name, dice)
                    .await;

                match self.second_lottery(request.organization_id, &plan, dice).await {
                    Some(wild) => (wild, ReplyPlan::wild(&trigger.text), SelectionStrategy::Wild),
                    None => (selection.persona, plan, selection.strategy),
                }
            }
        };

        tracing::info!(
            room_id = %request.room_id,
            persona = %persona.kind(),
            strategy = %strategy,
            path = ?plan.path,
            role = plan.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-"),
            "Persona selected"
        );

        self.respond(&request, &persona, &trigger, client.as_ref(), &plan)
            .await
            .map(|message| ReplyOutcome::Replied {
                message,
                persona: persona.kind(),
                wild: plan.path == PromptPath::Wild,
                role: plan.role.map(|r| r.name),
            })
    }

    async fn prepare(&self, request: &ReplyRequest) -> Result<Gate, ReplyError> {
        let settings = match self
            .tenants
            .find_bot_settings(request.organization_id)
            .await?
        {
            Some(settings) if settings.enabled => settings,
            _ => return Ok(Gate::Skip(SkipReason::BotDisabled)),
        };

        let Some(api_key) = settings.credentials() else {
            return Ok(Gate::Skip(SkipReason::MissingCredentials));
        };

        let Some(client) = self
            .completions
            .create_client(settings.vendor, api_key, settings.model_or_default())
        else {
            return Ok(Gate::Skip(SkipReason::ClientUnavailable));
        };

        match self.store.get_room(request.room_id).await.map_err(ReplyError::Store)? {
            Some(room) if room.organization_id == request.organization_id => {}
            _ => return Ok(Gate::Skip(SkipReason::RoomNotFound)),
        }

        let trigger = match self
            .store
            .get_message(request.trigger_message_id)
            .await
            .map_err(ReplyError::Store)?
        {
            Some(message) if message.room_id == request.room_id => message,
            _ => return Ok(Gate::Skip(SkipReason::TriggerNotFound)),
        };

        let Some(sender_name) = self
            .store
            .get_actor_display_name(request.sender_id)
            .await
            .map_err(ReplyError::Store)?
        else {
            return Ok(Gate::Skip(SkipReason::SenderUnresolved));
        };

        Ok(Gate::Open(Prepared {
            client,
            trigger,
            sender_name,
        }))
    }

    /// First lottery: a win on garbled or keyword-bearing input forces the
    /// wild persona. Blank text never enters the lottery.
    async fn wild_gate(&self, organization_id: Uuid, text: &str, dice: &mut dyn Dice) -> Option<ActivePersona> {
        if text.trim().is_empty() {
            return None;
        }

        let draw = wild_lottery(dice);
        tracing::debug!(roll = draw.roll, threshold = draw.threshold, won = draw.won, "Wild lottery");
        if !draw.won {
            return None;
        }

        let analyzer = self.input_quality.as_ref()?;
        let quality = match analyzer.analyze_input_quality(text).await {
            Ok(quality) => quality,
            Err(e) => {
                tracing::warn!(error = %e, "Input quality analysis failed");
                return None;
            }
        };
        if !quality.forces_wild() {
            return None;
        }

        let wild = self.selector.wild(organization_id).await;
        if wild.is_none() {
            tracing::warn!(organization_id = %organization_id, "Wild persona has no actor, selecting normally");
        }
        wild
    }

    /// Second lottery, only for replies that carry no role
    async fn second_lottery(
        &self,
        organization_id: Uuid,
        plan: &ReplyPlan,
        dice: &mut dyn Dice,
    ) -> Option<ActivePersona> {
        if plan.role.is_some() {
            return None;
        }

        let draw = wild_lottery(dice);
        tracing::debug!(roll = draw.roll, threshold = draw.threshold, won = draw.won, "Second wild lottery");
        if !draw.won {
            return None;
        }

        let wild = self.selector.wild(organization_id).await;
        if wild.is_none() {
            tracing::warn!(organization_id = %organization_id, "Wild persona has no actor, keeping selection");
        }
        wild
    }

    async fn respond(
        &self,
        request: &ReplyRequest,
        persona: &ActivePersona,
        trigger: &Message,
        client: &dyn CompletionClient,
        plan: &ReplyPlan,
    ) -> Result<Message, ReplyError> {
        let room_id = request.room_id;
        let actor_id = persona.actor_id;

        self.presence.mark_read(room_id, actor_id, trigger).await;

        let typing = self.presence.start_typing(room_id, actor_id).await;
        let generated = generate_reply(client, plan).await;
        typing.stop().await;

        let text = match generated {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(room_id = %room_id, persona = %persona.kind(), error = %e, "Reply generation failed");
                self.presence.report_failure(room_id, actor_id).await;
                return Err(ReplyError::Generation(e));
            }
        };

        match self
            .presence
            .deliver(request.organization_id, room_id, actor_id, &text)
            .await
        {
            Ok(message) => {
                tracing::info!(room_id = %room_id, message_id = %message.id, persona = %persona.kind(), "Reply delivered");
                Ok(message)
            }
            Err(e) => {
                tracing::error!(room_id = %room_id, error = %e, "Failed to persist reply");
                self.presence.report_failure(room_id, actor_id).await;
                Err(ReplyError::Store(e))
            }
        }
    }
}
