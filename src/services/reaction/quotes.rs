use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::debug;

use super::{ReactionEffect, ReactionOutcome, ReactionRequest, ReactionResolver, ResolverError};

/// Simulated thinking time so the local bank feels like a remote call.
pub const DEFAULT_LATENCY_MS: u64 = 300;

/// Picks a reaction uniformly at random from a fixed bank.
#[derive(Debug, Clone)]
pub struct QuoteBankResolver {
    quotes: Arc<Vec<ReactionOutcome>>,
    latency: Duration,
}

impl QuoteBankResolver {
    pub fn new(quotes: Vec<ReactionOutcome>, latency: Duration) -> Self {
        Self {
            quotes: Arc::new(quotes),
            latency,
        }
    }

    pub fn quotes(&self) -> &[ReactionOutcome] {
        &self.quotes
    }
}

impl Default for QuoteBankResolver {
    fn default() -> Self {
        Self::new(default_bank(), Duration::from_millis(DEFAULT_LATENCY_MS))
    }
}

impl ReactionResolver for QuoteBankResolver {
    async fn resolve(&self, request: ReactionRequest) -> Result<ReactionOutcome, ResolverError> {
        tokio::time::sleep(self.latency).await;

        let pick = self.quotes.choose(&mut rand::thread_rng()).cloned();
        debug!(
            "Quote bank reaction for {} at {}%: {:?}",
            request.character_name,
            request.health_percent,
            pick.as_ref().map(|p| p.effect)
        );
        pick.ok_or(ResolverError::EmptyBank)
    }
}

pub fn default_bank() -> Vec<ReactionOutcome> {
    use ReactionEffect::*;
    [
        // Dismissive
        ("I'm in a meeting, later.", Dodge),
        ("That's not a priority right now.", Dodge),
        ("Do a retro on that yourself first.", Dodge),
        ("Noted. Read it.", Dodge),
        // Jargon
        ("Think bigger picture.", Hit),
        ("Let's align on granularity.", Hit),
        ("What's the underlying logic here?", Hit),
        ("This plan has no leverage.", Hit),
        ("Did we close the loop?", Hit),
        ("Is this empowering anyone?", Hit),
        ("Where's the pain point?", Hit),
        // Personal
        ("This is your output?", Torn),
        ("With that attitude?", Torn),
        ("Not open for discussion.", Torn),
        ("Performance rating: C.", Torn),
        // Finishers
        ("The company has decided to optimize you.", Fly),
        ("Please see finance to settle up.", Fly),
        ("Happy graduation!", Fly),
    ]
    .into_iter()
    .map(|(d, e)| ReactionOutcome::new(d, e))
    .collect()
}
