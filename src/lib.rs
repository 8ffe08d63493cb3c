//! Taskchat: conversational front end for a task-management assistant.
//!
//! A user types a message, taskchat records it in a conversation, asks an
//! external language-model agent to act on it (the agent may create, list
//! or change the user's tasks through its own tools) and records the reply.
//!
//! # Architecture
//!
//! Taskchat follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and the agent
//! - **Adapters**: In-memory and `PostgreSQL` stores, the Gemini agent
//! - **Services**: The chat-turn orchestrator
//!
//! # Modules
//!
//! - [`conversation`]: Conversations, messages and chat-turn orchestration
//! - [`auth`]: Bearer-token verification
//! - [`http`]: The `axum` JSON API
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod auth;
pub mod config;
pub mod conversation;
pub mod http;
pub mod telemetry;
