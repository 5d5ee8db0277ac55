use crate::api::Activity;
use crate::auth::TokenPair;

/// Position of a session in the login → fetch → display sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unauthenticated,
    CodeReceived,
    Authenticated,
    Ready,
}

/// Per-browser key-value state mutated only by the flow.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub code: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub activities: Option<Vec<Activity>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the stage by checking fields in flow order.
    pub fn stage(&self) -> Stage {
        if self.code.is_none() {
            Stage::Unauthenticated
        } else if self.access_token.is_none() {
            Stage::CodeReceived
        } else if self.activities.is_none() {
            Stage::Authenticated
        } else {
            Stage::Ready
        }
    }

    pub fn store_tokens(&mut self, tokens: TokenPair) {
        self.access_token = Some(tokens.access_token);
        self.refresh_token = Some(tokens.refresh_token);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("stage", &self.stage())
            .field("has_code", &self.code.is_some())
            .field("has_tokens", &self.access_token.is_some())
            .field(
                "activities",
                &self.activities.as_ref().map(|list| list.len()),
            )
            .finish()
    }
}
