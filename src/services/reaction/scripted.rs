use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ReactionEffect, ReactionOutcome, ReactionRequest, ReactionResolver, ResolverError};

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Outcome(ReactionOutcome),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<ReactionRequest>,
}

/// Deterministic resolver for demos and tests. Replies are consumed in order;
/// once exhausted every request gets the fallback outcome.
#[derive(Debug, Clone)]
pub struct ScriptedResolver {
    script: Arc<Mutex<Script>>,
    fallback: ReactionOutcome,
    latency: Duration,
}

impl ScriptedResolver {
    pub fn always(effect: ReactionEffect) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            fallback: ReactionOutcome::new("...", effect),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push(&self, reply: ScriptedReply) {
        if let Ok(mut script) = self.script.lock() {
            script.replies.push_back(reply);
        }
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ReactionRequest> {
        self.script.lock().map(|s| s.requests.clone()).unwrap_or_default()
    }

    fn next_reply(&self, request: ReactionRequest) -> ScriptedReply {
        match self.script.lock() {
            Ok(mut script) => {
                script.requests.push(request);
                script.replies.pop_front()
                    .unwrap_or_else(|| ScriptedReply::Outcome(self.fallback.clone()))
            }
            Err(_) => ScriptedReply::Fail("script poisoned".to_string()),
        }
    }
}

impl ReactionResolver for ScriptedResolver {
    async fn resolve(&self, request: ReactionRequest) -> Result<ReactionOutcome, ResolverError> {
        let reply = self.next_reply(request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match reply {
            ScriptedReply::Outcome(o) => Ok(o),
            ScriptedReply::Fail(reason) => Err(ResolverError::Other(reason)),
        }
    }
}
