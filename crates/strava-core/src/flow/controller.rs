use url::Url;

use super::{transition, Action, Event, Session};
use crate::api::StravaApiClient;
use crate::auth::OAuthClient;
use crate::table::ActivityTable;

/// What the host should show once a pass halts.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login,
    Error(String),
    Activities(ActivityTable),
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// The host must re-invoke the pass from the top, without query parameters.
    Rerun,
    Halted(View),
}

/// Drives [`transition`] and performs the HTTP calls its actions request.
#[derive(Debug, Clone)]
pub struct FlowController {
    oauth: OAuthClient,
    api: StravaApiClient,
}

impl FlowController {
    pub fn new(oauth: OAuthClient, api: StravaApiClient) -> Self {
        Self { oauth, api }
    }

    /// Consent page link, shown on every page.
    pub fn authorization_url(&self) -> Url {
        self.oauth.authorization_url()
    }

    /// Evaluate the session from the top until it halts or needs a rerun.
    pub async fn run_pass(&self, session: &mut Session, query_code: Option<String>) -> PassOutcome {
        let mut event = Event::PageLoad { query_code };
        loop {
            let (next, action) = transition(std::mem::take(session), event);
            *session = next;
            tracing::debug!(stage = ?session.stage(), "flow step");

            event = match action {
                Action::Rerun => return PassOutcome::Rerun,
                Action::ShowLogin => return PassOutcome::Halted(View::Login),
                Action::ShowError(message) => return PassOutcome::Halted(View::Error(message)),
                Action::ShowActivities(table) => {
                    return PassOutcome::Halted(View::Activities(table))
                }
                Action::ExchangeCode(code) => match self.oauth.exchange_code(&code).await {
                    Ok(tokens) => Event::TokensReceived(tokens),
                    Err(err) => Event::TokenExchangeFailed(err),
                },
                Action::FetchActivities(access_token) => {
                    match self.api.athlete_activities(&access_token).await {
                        Ok(activities) => Event::ActivitiesReceived(activities),
                        Err(err) => Event::ActivityFetchFailed(err),
                    }
                }
            };
        }
    }
}
