//! Request, wire, and event types

pub mod chat;
pub mod events;
pub mod wire;

pub use chat::{ChatMessage, ChatRequest, MessageRole};
pub use events::{StreamEvent, TextDelta};
pub use wire::{
    ChunkChoice, ChunkDelta, ProviderChunk, ProviderMessage, ProviderRequest, ProviderRole,
};
