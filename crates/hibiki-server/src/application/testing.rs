//! In-memory fakes for the reply pipeline tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use hibiki::{
    ActivePersona, BotSettings, ChatMessage, CompletionClient, CompletionClientFactory,
    ContentPersonaClassifier, ConversationMessage, DomainError, HistoryPersonaClassifier,
    InputQuality, InputQualityAnalyzer, Message, MessageStore, NotificationEvent,
    NotificationPublisher, Persona, PersonaCatalog, PersonaKind, ReplyRequest, RoleCatalog,
    RoleConfig, Room, SentimentAnalyzer, SentimentResult, TenantRepository, ToolContext,
    ToolExecutionResult, ToolExecutor, ToolResult, Vendor,
};

use super::reply::ReplyOrchestrator;
use crate::config::{parse_persona_catalog, OrchestratorConfig};

pub const DEFAULT_REPLY: &str = "Hello from Mio";

const TEST_PERSONAS: &str = r#"
[[persona]]
kind = "default_chat"
name = "Mio"
voice = "You are Mio."
constraint = "Be kind."

[[persona]]
kind = "system"
name = "Kanri"
voice = "You are Kanri."
constraint = "Be precise."

[[persona]]
kind = "wild"
name = "Gonzo"
voice = "You are Gonzo."
constraint = ""
"#;

// ----------------------------------------------------------------------------
// Store
// ----------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    rooms: HashMap<Uuid, Room>,
    touched: Vec<Uuid>,
    messages: Vec<Message>,
    actors: HashMap<Uuid, String>,
    persona_actors: HashMap<(Uuid, PersonaKind), Uuid>,
    reads: HashMap<(Uuid, Uuid), DateTime<Utc>>,
    settings: HashMap<Uuid, BotSettings>,
    last_posted_at: Option<DateTime<Utc>>,
    fail_appends: bool,
    fail_reads: bool,
}

/// Message store and tenant settings in one
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn add_room(&self, room: Room) {
        self.lock().rooms.insert(room.id, room);
    }

    pub fn add_actor(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().actors.insert(id, name.to_string());
        id
    }

    pub fn bind_persona(&self, organization_id: Uuid, kind: PersonaKind, actor_id: Uuid) {
        self.lock().persona_actors.insert((organization_id, kind), actor_id);
    }

    pub fn unbind_persona(&self, organization_id: Uuid, kind: PersonaKind) {
        self.lock().persona_actors.remove(&(organization_id, kind));
    }

    pub fn set_settings(&self, settings: BotSettings) {
        self.lock().settings.insert(settings.organization_id, settings);
    }

    pub fn set_enabled(&self, organization_id: Uuid, enabled: bool) {
        if let Some(s) = self.lock().settings.get_mut(&organization_id) {
            s.enabled = enabled;
        }
    }

    pub fn set_api_key(&self, organization_id: Uuid, api_key: Option<&str>) {
        if let Some(s) = self.lock().settings.get_mut(&organization_id) {
            s.api_key = api_key.map(str::to_string);
        }
    }

    pub fn fail_appends(&self) {
        self.lock().fail_appends = true;
    }

    pub fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }

    /// Post with a strictly increasing timestamp
    pub fn post(&self, room_id: Uuid, actor_id: Uuid, text: &str) -> Message {
        let mut state = self.lock();
        let now = Utc::now();
        let at = match state.last_posted_at {
            Some(last) if last >= now => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        state.last_posted_at = Some(at);
        let message = Message::new(room_id, actor_id, text).with_created_at(at);
        state.messages.push(message.clone());
        message
    }

    pub fn post_at(&self, room_id: Uuid, actor_id: Uuid, text: &str, at: DateTime<Utc>) -> Message {
        let message = Message::new(room_id, actor_id, text).with_created_at(at);
        self.lock().messages.push(message.clone());
        message
    }

    pub fn messages_in(&self, room_id: Uuid) -> Vec<Message> {
        self.lock()
            .messages
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect()
    }

    pub fn read_at(&self, room_id: Uuid, actor_id: Uuid) -> Option<DateTime<Utc>> {
        self.lock().reads.get(&(room_id, actor_id)).copied()
    }

    pub fn room_touched(&self, room_id: Uuid) -> bool {
        self.lock().touched.contains(&room_id)
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, DomainError> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn list_recent_messages(
        &self,
        room_id: Uuid,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Message>, DomainError> {
        let mut recent: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.room_id == room_id && m.created_at >= since)
            .cloned()
            .collect();
        recent.sort_by_key(|m| m.created_at);
        let skip = recent.len().saturating_sub(limit);
        Ok(recent.into_iter().skip(skip).collect())
    }

    async fn append_message(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        text: &str,
    ) -> Result<Message, DomainError> {
        if self.lock().fail_appends {
            return Err(DomainError::Repository("insert failed".into()));
        }
        Ok(self.post(room_id, actor_id, text))
    }

    async fn get_room(&self, id: Uuid) -> Result<Option<Room>, DomainError> {
        Ok(self.lock().rooms.get(&id).cloned())
    }

    async fn touch_room_updated_at(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.lock();
        if let Some(room) = state.rooms.get_mut(&id) {
            room.updated_at = Utc::now();
        }
        state.touched.push(id);
        Ok(())
    }

    async fn get_actor_display_name(&self, actor_id: Uuid) -> Result<Option<String>, DomainError> {
        Ok(self.lock().actors.get(&actor_id).cloned())
    }

    async fn resolve_persona_actor(
        &self,
        kind: PersonaKind,
        organization_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError> {
        Ok(self.lock().persona_actors.get(&(organization_id, kind)).copied())
    }

    async fn persona_kind_of_actor(&self, actor_id: Uuid) -> Result<Option<PersonaKind>, DomainError> {
        Ok(self
            .lock()
            .persona_actors
            .iter()
            .find(|(_, id)| **id == actor_id)
            .map(|((_, kind), _)| *kind))
    }

    async fn mark_read(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut state = self.lock();
        if state.fail_reads {
            return Err(DomainError::Repository("room_reads unavailable".into()));
        }
        state.reads.insert((room_id, actor_id), read_at);
        Ok(())
    }
}

#[async_trait]
impl TenantRepository for InMemoryStore {
    async fn find_bot_settings(&self, organization_id: Uuid) -> Result<Option<BotSettings>, DomainError> {
        Ok(self.lock().settings.get(&organization_id).cloned())
    }
}

// ----------------------------------------------------------------------------
// Publisher
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Room(Uuid),
    Tenant(Uuid),
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(Target, NotificationEvent)>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<(Target, NotificationEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(|(_, e)| e.event_type()).collect()
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.event_types().into_iter().filter(|t| *t == event_type).count()
    }

    fn record(&self, target: Target, event: &NotificationEvent) -> Result<(), DomainError> {
        self.events.lock().unwrap().push((target, event.clone()));
        if self.fail {
            return Err(DomainError::ExternalService("gateway down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish_to_room(&self, room_id: Uuid, event: &NotificationEvent) -> Result<(), DomainError> {
        self.record(Target::Room(room_id), event)
    }

    async fn publish_to_tenant(
        &self,
        organization_id: Uuid,
        event: &NotificationEvent,
    ) -> Result<(), DomainError> {
        self.record(Target::Tenant(organization_id), event)
    }
}

// ----------------------------------------------------------------------------
// Completion
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub turns: Vec<ChatMessage>,
    pub system_prompt: Option<String>,
}

/// Replays queued results, then answers [`DEFAULT_REPLY`]
#[derive(Default)]
pub struct FakeCompletionClient {
    queued: Mutex<VecDeque<Result<String, DomainError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeCompletionClient {
    pub fn replying<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        let client = Self::default();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, reply: &str) {
        self.queued.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: DomainError) {
        self.queued.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn generate(
        &self,
        turns: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError> {
        self.calls.lock().unwrap().push(RecordedCall {
            turns: turns.to_vec(),
            system_prompt: system_prompt.map(str::to_string),
        });
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }

    fn vendor(&self) -> Vendor {
        Vendor::Anthropic
    }

    fn model_id(&self) -> &str {
        "fake-model"
    }
}

pub struct FakeCompletionFactory {
    client: Arc<FakeCompletionClient>,
    available: AtomicBool,
}

impl FakeCompletionFactory {
    pub fn new(client: Arc<FakeCompletionClient>) -> Self {
        Self {
            client,
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl CompletionClientFactory for FakeCompletionFactory {
    fn create_client(&self, _vendor: Vendor, _api_key: &str, _model: &str) -> Option<Arc<dyn CompletionClient>> {
        if !self.available.load(Ordering::SeqCst) {
            return None;
        }
        let client: Arc<dyn CompletionClient> = self.client.clone();
        Some(client)
    }
}

// ----------------------------------------------------------------------------
// Collaborators
// ----------------------------------------------------------------------------

pub struct StaticInputQuality {
    quality: InputQuality,
    calls: AtomicUsize,
}

impl StaticInputQuality {
    pub fn gibberish() -> Self {
        Self {
            quality: InputQuality::gibberish(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn normal() -> Self {
        Self {
            quality: InputQuality::normal(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InputQualityAnalyzer for StaticInputQuality {
    async fn analyze_input_quality(&self, _text: &str) -> Result<InputQuality, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quality)
    }
}

/// `None` fails every call
pub struct StaticSentiment(Option<SentimentResult>);

impl StaticSentiment {
    pub fn returning(result: SentimentResult) -> Self {
        Self(Some(result))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl SentimentAnalyzer for StaticSentiment {
    async fn analyze(&self, _text: &str) -> Result<SentimentResult, DomainError> {
        self.0
            .clone()
            .ok_or_else(|| DomainError::ExternalService("sentiment unavailable".into()))
    }
}

pub struct StaticTools {
    result: Option<ToolExecutionResult>,
    calls: AtomicUsize,
}

impl StaticTools {
    pub fn with_context(prose: &str, role: Option<RoleConfig>) -> Self {
        let result = ToolExecutionResult::from_results(vec![ToolResult {
            tool_name: "static".into(),
            relevance: 90,
            context_prompt: Some(prose.to_string()),
            suggested_role: role,
        }]);
        Self {
            result: Some(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            result: Some(ToolExecutionResult::default()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolExecutor for StaticTools {
    async fn execute(
        &self,
        _context: &ToolContext,
        _max_tools: usize,
        _min_relevance_score: u8,
    ) -> Result<ToolExecutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| DomainError::ExternalService("tools unavailable".into()))
    }

    async fn check_ready(&self) -> Result<(), DomainError> {
        match self.result {
            Some(_) => Ok(()),
            None => Err(DomainError::ExternalService("tools unreachable".into())),
        }
    }
}

/// `None` fails every call
pub struct StaticHistoryClassifier(Option<Option<PersonaKind>>);

impl StaticHistoryClassifier {
    pub fn returning(kind: Option<PersonaKind>) -> Self {
        Self(Some(kind))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl HistoryPersonaClassifier for StaticHistoryClassifier {
    async fn select(
        &self,
        _candidates: &[Persona],
        _history: &[ConversationMessage],
        _trigger_text: &str,
    ) -> Result<Option<PersonaKind>, DomainError> {
        self.0
            .ok_or_else(|| DomainError::ExternalService("classifier unavailable".into()))
    }
}

pub struct StaticContentClassifier(PersonaKind);

impl StaticContentClassifier {
    pub fn returning(kind: PersonaKind) -> Self {
        Self(kind)
    }
}

#[async_trait]
impl ContentPersonaClassifier for StaticContentClassifier {
    async fn classify(&self, _trigger_text: &str) -> Result<PersonaKind, DomainError> {
        Ok(self.0)
    }
}

// ----------------------------------------------------------------------------
// Fixture
// ----------------------------------------------------------------------------

/// One tenant, one room, a human sender "Aiko" and an actor per persona
pub struct Fixture {
    pub organization_id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub default_actor: Uuid,
    pub system_actor: Uuid,
    pub wild_actor: Uuid,
    pub store: Arc<InMemoryStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub client: Arc<FakeCompletionClient>,
    pub completions: Arc<FakeCompletionFactory>,
    pub personas: Arc<PersonaCatalog>,
    pub roles: Arc<RoleCatalog>,
}

impl Fixture {
    pub fn new() -> Self {
        let organization_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::default());

        let room = Room::new(organization_id, "general");
        let room_id = room.id;
        store.add_room(room);

        let sender_id = store.add_actor("Aiko");
        let default_actor = store.add_actor("Mio");
        let system_actor = store.add_actor("Kanri");
        let wild_actor = store.add_actor("Gonzo");
        store.bind_persona(organization_id, PersonaKind::DefaultChat, default_actor);
        store.bind_persona(organization_id, PersonaKind::System, system_actor);
        store.bind_persona(organization_id, PersonaKind::Wild, wild_actor);

        store.set_settings(BotSettings {
            organization_id,
            enabled: true,
            vendor: Vendor::Anthropic,
            api_key: Some("sk-test".into()),
            model: None,
        });

        let client = Arc::new(FakeCompletionClient::default());
        let completions = Arc::new(FakeCompletionFactory::new(client.clone()));
        let personas = Arc::new(parse_persona_catalog(TEST_PERSONAS).unwrap());

        Self {
            organization_id,
            room_id,
            sender_id,
            default_actor,
            system_actor,
            wild_actor,
            store,
            publisher: Arc::new(RecordingPublisher::default()),
            client,
            completions,
            personas,
            roles: Arc::new(RoleCatalog::builtin()),
        }
    }

    pub fn orchestrator(&self) -> ReplyOrchestrator {
        ReplyOrchestrator::new(
            self.store.clone(),
            self.store.clone(),
            self.completions.clone(),
            self.publisher.clone(),
            self.personas.clone(),
            self.roles.clone(),
            OrchestratorConfig::default(),
        )
    }

    pub fn request(&self, trigger: &Message) -> ReplyRequest {
        ReplyRequest {
            organization_id: self.organization_id,
            room_id: self.room_id,
            trigger_message_id: trigger.id,
            sender_id: self.sender_id,
        }
    }

    pub fn active_default(&self) -> ActivePersona {
        ActivePersona {
            persona: self.personas.get(PersonaKind::DefaultChat).cloned().unwrap(),
            actor_id: self.default_actor,
        }
    }

    /// Information-seeking, non-neutral sentiment
    pub fn curious(&self) -> SentimentResult {
        SentimentResult {
            is_neutral: false,
            guidance_seeking_score: 10,
            information_seeking_score: 80,
            information_topic: Some("rust".into()),
        }
    }
}
