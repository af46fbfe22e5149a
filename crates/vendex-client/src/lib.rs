// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;
use vendex_app::{CompanyNumber, ListPage, ListQuery, Record, RecordService, query};

const LIST_PATH: &str = "/api/account/list";
const ADD_PATH: &str = "/api/account/add";
const EDIT_PATH: &str = "/api/account/edit";
const DELETE_PATH: &str = "/api/account/delete";

/// Blocking client for the account record-storage service.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Option<Duration>,
    http: HttpClient,
}

impl Client {
    /// `timeout` bounds every request; `None` waits for the service as long
    /// as it takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("service.base_url must not be empty -- set it in the config file");
        }
        let parsed = Url::parse(&base_url).with_context(|| {
            format!("service.base_url {base_url:?} is not a valid URL -- use a form like http://localhost:8080")
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "service.base_url {base_url:?} must use http or https, got {:?}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `GET /api/account/list?{p,b,c}`.
    pub fn list_accounts(&self, list_query: &ListQuery) -> Result<ListPage> {
        let encoded = query::encode(list_query);
        let url = if encoded.is_empty() {
            self.endpoint(LIST_PATH)
        } else {
            format!("{}?{encoded}", self.endpoint(LIST_PATH))
        };
        debug!(%url, "listing accounts");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode account list response")
    }

    /// `POST /api/account/add` with the full record as the JSON body.
    pub fn create_account(&self, record: &Record) -> Result<()> {
        debug!(key = %record.company_number, "registering account");
        self.send(self.http.post(self.endpoint(ADD_PATH)).json(record))
    }

    /// `PUT /api/account/edit` with the full record as the JSON body.
    pub fn update_account(&self, record: &Record) -> Result<()> {
        debug!(key = %record.company_number, "updating account");
        self.send(self.http.put(self.endpoint(EDIT_PATH)).json(record))
    }

    /// `DELETE /api/account/delete` with `{"companyNumber": key}` as the body.
    pub fn delete_account(&self, key: &CompanyNumber) -> Result<()> {
        debug!(%key, "deleting account");
        let body = DeleteRequest {
            company_number: key.as_str(),
        };
        self.send(self.http.delete(self.endpoint(DELETE_PATH)).json(&body))
    }

    /// Confirms the service answers a first-page listing.
    pub fn ping(&self) -> Result<()> {
        self.list_accounts(&ListQuery::default()).map(|_| ())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> Result<()> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }
}

impl RecordService for Client {
    fn list(&mut self, list_query: &ListQuery) -> Result<ListPage> {
        self.list_accounts(list_query)
    }

    fn create(&mut self, record: &Record) -> Result<()> {
        self.create_account(record)
    }

    fn update(&mut self, record: &Record) -> Result<()> {
        self.update_account(record)
    }

    fn delete(&mut self, key: &CompanyNumber) -> Result<()> {
        self.delete_account(key)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    company_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "{} did not answer in time -- raise service.timeout or check the service ({})",
            base_url,
            error
        );
    }
    anyhow!(
        "cannot reach {} -- check that the account service is running ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message.or(parsed.error)
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}
