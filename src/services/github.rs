use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::models::calendar::{ContributionCalendar, ContributionsCollection};
use crate::models::repo::Repository;
use crate::models::stats::UserStats;
use crate::services::aggregation::merge_calendars;
use crate::services::queries::{ContributionsQueryBuilder, ORGANIZATIONS_QUERY};
use crate::utils::config::Config;
use crate::utils::http_client::create_http_client;

/// Source of per-user contribution data. The handler depends on this
/// trait so tests can substitute a canned implementation.
#[async_trait]
pub trait ContributionSource: Send + Sync {
    async fn fetch_user_stats(&self, username: &str) -> Result<UserStats, FetchError>;
}

pub struct GitHubClient {
    client: reqwest::Client,
    api_base_url: String,
    graphql_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: create_http_client(),
            api_base_url: config.api_base_url.clone(),
            graphql_url: config.graphql_url.clone(),
            token: config.github_token.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Look up the account via the REST API. This is where a missing
    /// user is detected, before any GraphQL call is attempted.
    async fn fetch_created_at(&self, username: &str) -> Result<DateTime<Utc>, FetchError> {
        let request = self
            .client
            .get(format!("{}/users/{}", self.api_base_url, username));
        let response = self.authorize(request).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::UserNotFound(username.to_string()));
        }
        if !response.status().is_success() {
            return Err(FetchError::Api {
                endpoint: "User",
                status: response.status().as_u16(),
            });
        }

        let user: GitHubUser = response.json().await?;
        user.created_at
            .ok_or_else(|| FetchError::UserNotFound(username.to_string()))
    }

    async fn post_graphql(&self, query: &str, username: &str) -> Result<Value, FetchError> {
        let request = self.client.post(&self.graphql_url).json(&json!({
            "query": query,
            "variables": { "username": username },
        }));
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Api {
                endpoint: "GraphQL",
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;

        if let Some(message) = payload
            .get("errors")
            .and_then(|errors| errors.as_array())
            .and_then(|errors| errors.first())
            .and_then(|error| error.get("message"))
            .and_then(|message| message.as_str())
        {
            return Err(FetchError::GraphQl(message.to_string()));
        }

        Ok(payload)
    }

    async fn fetch_organizations(&self, username: &str) -> Result<Vec<Organization>, FetchError> {
        let payload = self.post_graphql(ORGANIZATIONS_QUERY, username).await?;

        let nodes = payload
            .pointer("/data/user/organizations/nodes")
            .cloned()
            .ok_or(FetchError::MissingData("organizations list"))?;

        let organizations: Vec<Organization> =
            serde_json::from_value(nodes).map_err(|_| FetchError::MissingData("organization node"))?;

        log::info!(
            "Found {} organizations for {}",
            organizations.len(),
            username
        );
        Ok(organizations)
    }

    /// The organization-inclusive path: one combined query carrying the
    /// personal calendar, an aliased calendar per organization, and the
    /// repository list. The calendars are merged into one.
    async fn fetch_with_org_contributions(
        &self,
        username: &str,
    ) -> Result<(ContributionCalendar, Vec<Repository>), FetchError> {
        let organizations = self.fetch_organizations(username).await?;

        let builder = ContributionsQueryBuilder::with_organizations(
            organizations.iter().map(|org| org.id.clone()),
        );
        let payload = self.post_graphql(&builder.build(), username).await?;

        let user = payload
            .pointer("/data/user")
            .filter(|user| !user.is_null())
            .ok_or_else(|| FetchError::UserNotFound(username.to_string()))?;

        let mut sources: Vec<ContributionsCollection> = Vec::new();
        sources.push(parse_collection(user.get("contributionsCollection"))
            .ok_or(FetchError::MissingData("personal contributions"))?);

        for (alias, organization) in builder.aliases().zip(&organizations) {
            match parse_collection(user.get(alias.as_str())) {
                Some(collection) => {
                    log::info!("Added contributions from org: {}", organization.login);
                    sources.push(collection);
                }
                None => log::warn!(
                    "Skipping malformed contributions section for org: {}",
                    organization.login
                ),
            }
        }

        let calendar = merge_calendars(&sources);
        log::info!(
            "Total contributions after merge: {}",
            calendar.total_contributions
        );

        let repositories = parse_repositories(user)?;
        Ok((calendar, repositories))
    }

    /// The fallback path: user-only query, calendar returned as-is with
    /// no merge applied.
    async fn fetch_user_only(
        &self,
        username: &str,
    ) -> Result<(ContributionCalendar, Vec<Repository>), FetchError> {
        let query = ContributionsQueryBuilder::new().build();
        let payload = self.post_graphql(&query, username).await?;

        let user = payload
            .pointer("/data/user")
            .filter(|user| !user.is_null())
            .ok_or_else(|| FetchError::UserNotFound(username.to_string()))?;

        let calendar_value = user
            .pointer("/contributionsCollection/contributionCalendar")
            .cloned()
            .ok_or(FetchError::MissingData("contribution calendar"))?;
        let calendar: ContributionCalendar = serde_json::from_value(calendar_value)
            .map_err(|_| FetchError::MissingData("contribution calendar"))?;

        let repositories = parse_repositories(user)?;
        Ok((calendar, repositories))
    }
}

#[async_trait]
impl ContributionSource for GitHubClient {
    async fn fetch_user_stats(&self, username: &str) -> Result<UserStats, FetchError> {
        let created_at = self.fetch_created_at(username).await?;

        let (calendar, repositories) = match self.fetch_with_org_contributions(username).await {
            Ok(result) => result,
            Err(error) => {
                log::warn!(
                    "Failed to fetch org contributions for {}: {}; falling back to user-only",
                    username,
                    error
                );
                self.fetch_user_only(username).await?
            }
        };

        Ok(UserStats {
            calendar,
            repositories,
            created_at,
        })
    }
}

fn parse_collection(value: Option<&Value>) -> Option<ContributionsCollection> {
    let collection: ContributionsCollection = serde_json::from_value(value?.clone()).ok()?;
    collection.contribution_calendar.as_ref()?;
    Some(collection)
}

fn parse_repositories(user: &Value) -> Result<Vec<Repository>, FetchError> {
    let nodes = user
        .pointer("/repositories/nodes")
        .cloned()
        .ok_or(FetchError::MissingData("repositories list"))?;
    serde_json::from_value(nodes).map_err(|_| FetchError::MissingData("repository node"))
}

// GitHub API response types

#[derive(Debug, Deserialize)]
struct GitHubUser {
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Organization {
    id: String,
    login: String,
}
