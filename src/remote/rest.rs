use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::RemoteSettings;
use crate::errors::RemoteServiceError;
use crate::remote::query::SelectQuery;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Table-level REST client for the hosted database
pub struct RestClient {
    client: Client,
    settings: RemoteSettings,
}

impl RestClient {
    pub fn new(settings: RemoteSettings) -> Result<Self> {
        let client = Self::build_client(&settings)?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    pub async fn get_rows(&self, query: &SelectQuery) -> Result<Vec<Value>, RemoteServiceError> {
        let url = format!(
            "{}?{}",
            self.settings.rest_url(query.table),
            query.to_query_string()
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept-Profile", self.settings.schema)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        match body {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(RemoteServiceError::decode(format!(
                "Expected a list of rows from {}, got {}",
                query.table,
                kind_of(&other)
            ))),
        }
    }

    pub async fn post_row(&self, table: &str, row: &Value) -> Result<Value, RemoteServiceError> {
        let url = self.settings.rest_url(table);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Content-Profile", self.settings.schema)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;

        Self::read_success(response).await
    }

    fn build_client(settings: &RemoteSettings) -> Result<Client> {
        Client::builder()
            .user_agent(settings.user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(Self::auth_headers(&settings.anon_key)?)
            .build()
            .context("Failed to build HTTP client")
    }

    fn auth_headers(anon_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key).context("Anon key is not a valid header value")?;
        let bearer = HeaderValue::from_str(&format!("Bearer {anon_key}"))
            .context("Anon key is not a valid header value")?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn read_success(response: Response) -> Result<Value, RemoteServiceError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RemoteServiceError::rejected(
                status.as_u16(),
                rejection_message(status, &text),
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Picks the human readable part of an error body
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        ["message", "error_description", "msg", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(str::to_string)
    });

    match message {
        Some(message) if !message.is_empty() => message,
        _ if body.trim().is_empty() => status.to_string(),
        _ => format!("{}: {}", status, body.trim()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
