use serde::Deserialize;
use std::env;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Optional bearer token for the GitHub API; absent means
    /// unauthenticated calls.
    pub github_token: Option<String>,
    pub api_base_url: String,
    pub graphql_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let api_base_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());
        let graphql_url = env::var("GITHUB_GRAPHQL_URL")
            .unwrap_or_else(|_| format!("{}/graphql", api_base_url));

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            api_base_url,
            graphql_url,
        })
    }
}
