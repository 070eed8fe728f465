use thiserror::Error;

/// Failures raised while fetching user data from the GitHub API.
///
/// Inside the fetcher the variants matter: any failure of the
/// organization-inclusive path triggers the one-shot fallback to the
/// user-only query, while a user that does not exist is fatal
/// immediately. The handler only ever reports the message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("{endpoint} API returned {status}")]
    Api { endpoint: &'static str, status: u16 },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Unexpected response shape: {0}")]
    MissingData(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
