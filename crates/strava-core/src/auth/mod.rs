mod error;
mod oauth;
mod token;

pub use error::AuthError;
pub use oauth::{
    OAuthClient, OAuthConfig, OAuthEndpoints, APPROVAL_PROMPT, DEFAULT_SCOPE, RESPONSE_TYPE,
};
pub use token::TokenPair;
