//! Hibiki Domain Library
//!
//! Core domain types, heuristics and interfaces for the Hibiki persona
//! reply engine: deciding whether a persona answers a chat message,
//! which persona answers, and what it is told.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Persona, Message, SentimentResult, ...)
//!   - `value_objects/`: Immutable value types (PersonaKind, Vendor, InputQuality)
//!   - `services/`: Lottery, heuristics, role catalog, tools, prompt composition
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Message store and tenant settings
//!   - `services/`: Completion, notification and classifier interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use hibiki::domain::{wild_lottery, RandomDice};
//! use hibiki::ports::{MessageStore, NotificationPublisher};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ActivePersona, BotSettings, ConversationMessage, Dice, DomainError, HeuristicInputQuality,
    InputQuality, InputQualityType, KeywordContentClassifier, KeywordSentimentAnalyzer, Message,
    NotificationEvent, Persona, PersonaCatalog, PersonaKind, RandomDice,
    RecencyHistoryClassifier, ReplyOutcome, ReplyRequest, RoleCatalog, RoleConfig, Room,
    ScriptedDice, SentimentResult, SkipReason, ToolContext, ToolExecutionResult, ToolRegistry,
    ToolResult, Vendor, REPLY_FAILED_NOTICE, SECRETARY_ROLE, TYPING_TIMEOUT_SECS,
};
pub use ports::{
    ChatMessage,
    CompletionClient,
    CompletionClientFactory,
    CompletionOptions,
    ContentPersonaClassifier,
    HistoryPersonaClassifier,
    InputQualityAnalyzer,
    MessageRole,
    MessageStore,
    NotificationPublisher,
    SentimentAnalyzer,
    TenantRepository,
    ToolExecutor,
};
