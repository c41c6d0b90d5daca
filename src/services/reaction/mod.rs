//! Reaction Resolver: who says what, and how the target reacts, when hit.
//!
//! The contract is async and fallible for every implementation, including the
//! local quote bank, so a remote backend can be swapped in without touching
//! the combat loop.

pub mod client;
pub mod quotes;
pub mod scripted;

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::rules::GestureType;

pub use client::RemoteResolver;
pub use quotes::QuoteBankResolver;
pub use scripted::{ScriptedReply, ScriptedResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionEffect {
    Hit,
    Dodge,
    Torn,
    Fly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionOutcome {
    pub dialogue: String,
    pub effect: ReactionEffect,
}

impl ReactionOutcome {
    pub fn new(dialogue: impl Into<String>, effect: ReactionEffect) -> Self {
        Self { dialogue: dialogue.into(), effect }
    }

    pub fn is_dodge(&self) -> bool {
        self.effect == ReactionEffect::Dodge
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub character_name: String,
    pub role: String,
    pub gesture: GestureType,
    /// 0-100
    pub health_percent: u8,
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("reaction bank is empty")]
    EmptyBank,
    #[error("resolver backend returned status {0}")]
    Status(u16),
    #[error("resolver transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("resolver failed: {0}")]
    Other(String),
}

pub trait ReactionResolver: Send + Sync + 'static {
    fn resolve(
        &self,
        request: ReactionRequest,
    ) -> impl Future<Output = Result<ReactionOutcome, ResolverError>> + Send;
}
