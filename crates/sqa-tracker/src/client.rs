use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use sqa_core::{Service, StageError};
use tracing::info;

use crate::response::{parse_search_response, SearchPage};

/// Minimal Jira Cloud REST client (basic auth with email + API token).
#[derive(Clone)]
pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    pub fn search_url(&self, jql: &str, start_at: Option<u32>) -> Result<Url, StageError> {
        let endpoint = format!("{}/rest/api/3/search", self.base_url.trim_end_matches('/'));
        let mut params = vec![("jql", jql.to_string()), ("fields", "summary".to_string())];
        if let Some(start) = start_at {
            params.push(("startAt", start.to_string()));
        }
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| StageError::Config(format!("invalid tracker url {endpoint}: {e}")))
    }

    /// Runs one search request and returns the decoded page.
    pub async fn search(&self, jql: &str, start_at: Option<u32>) -> Result<SearchPage, StageError> {
        let url = self.search_url(jql, start_at)?;
        info!("requesting {url}");

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status().as_u16();
        info!("status code: {status}");
        let body = resp.text().await.map_err(transport)?;
        parse_search_response(status, &body)
    }
}

fn transport(e: reqwest::Error) -> StageError {
    StageError::Transport {
        service: Service::Tracker,
        message: e.to_string(),
    }
}
