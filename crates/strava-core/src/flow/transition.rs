use super::{Session, Stage};
use crate::api::{Activity, ApiError};
use crate::auth::{AuthError, TokenPair};
use crate::table::ActivityTable;

/// Input to the state machine.
#[derive(Debug)]
pub enum Event {
    /// Start of an evaluation pass, with the `code` query parameter if any.
    PageLoad { query_code: Option<String> },
    TokensReceived(TokenPair),
    TokenExchangeFailed(AuthError),
    ActivitiesReceived(Vec<Activity>),
    ActivityFetchFailed(ApiError),
}

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Session changed; restart evaluation from the top with a clean URL.
    Rerun,
    /// Nothing to do until the user follows the login link.
    ShowLogin,
    ExchangeCode(String),
    FetchActivities(String),
    /// Halt this pass and show the message inline.
    ShowError(String),
    ShowActivities(ActivityTable),
}

/// Advance the session by one event.
///
/// Pure: the caller performs whatever HTTP call the returned action names
/// and feeds the result back as the next event.
pub fn transition(mut session: Session, event: Event) -> (Session, Action) {
    let action = match event {
        Event::PageLoad {
            query_code: Some(code),
        } if !code.is_empty() => {
            session.code = Some(code);
            Action::Rerun
        }
        Event::PageLoad { .. } => evaluate(&session),
        Event::TokensReceived(tokens) => {
            session.store_tokens(tokens);
            Action::Rerun
        }
        Event::TokenExchangeFailed(err) => {
            // A code the provider answered for is spent; a transport failure
            // keeps it so the next pass retries the exchange.
            if !matches!(err, AuthError::Http(_)) {
                session.code = None;
            }
            Action::ShowError(format!("Authorization failed!: {err}"))
        }
        Event::ActivitiesReceived(activities) => {
            let table = ActivityTable::from_activities(&activities);
            session.activities = Some(activities);
            Action::ShowActivities(table)
        }
        Event::ActivityFetchFailed(err) => {
            Action::ShowError(format!("Failed to retrieve athlete activities: {err}"))
        }
    };
    (session, action)
}

fn evaluate(session: &Session) -> Action {
    match session.stage() {
        Stage::Unauthenticated => Action::ShowLogin,
        Stage::CodeReceived => Action::ExchangeCode(session.code.clone().unwrap_or_default()),
        Stage::Authenticated => {
            Action::FetchActivities(session.access_token.clone().unwrap_or_default())
        }
        Stage::Ready => Action::ShowActivities(ActivityTable::from_activities(
            session.activities.as_deref().unwrap_or_default(),
        )),
    }
}
