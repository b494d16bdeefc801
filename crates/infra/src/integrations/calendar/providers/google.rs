//! Google Calendar provider implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rallypoint_core::CalendarProvider;
use rallypoint_domain::{
    EventTime, ProviderConfig, RallypointError, RawCalendarEvent, Result, TokenRefresh,
};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::http::HttpClient;

/// Google Calendar v3 provider over the shared [`HttpClient`].
pub struct GoogleCalendarProvider {
    http: HttpClient,
    api_base_url: String,
    token_endpoint: String,
    client_id: String,
    client_secret: Option<String>,
    calendar_id: String,
}

impl GoogleCalendarProvider {
    pub fn new(http: HttpClient, config: &ProviderConfig) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url.clone(),
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    /// Build a provider with its own client, timed out after the configured
    /// fetch timeout.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.fetch_timeout()).build()?;
        Ok(Self::new(http, config))
    }

    fn events_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            RallypointError::Config(format!("invalid calendar API base '{}': {e}", self.api_base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                RallypointError::Config(format!(
                    "calendar API base '{}' cannot carry a path",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    #[instrument(skip(self, access_token), fields(calendar_id = %self.calendar_id))]
    async fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<RawCalendarEvent>> {
        let query = [
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", max_results.to_string()),
            ("timeMin", time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("timeMax", time_max.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];

        let request =
            self.http.request(Method::GET, self.events_url()?).bearer_auth(access_token).query(&query);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let message = describe_failure("Google Calendar API", response).await;
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RallypointError::Auth(message),
                _ => RallypointError::Network(message),
            });
        }

        let body: GoogleEventsResponse = response.json().await.map_err(|e| {
            RallypointError::Network(format!("failed to parse Google Calendar response: {e}"))
        })?;

        if body.next_page_token.is_some() {
            debug!(max_results, "more events available than requested; ignoring further pages");
        }

        Ok(body.items.into_iter().map(RawCalendarEvent::from).collect())
    }

    #[instrument(skip_all)]
    async fn refresh_token(&self, _access_token: &str, refresh_token: &str) -> Result<TokenRefresh> {
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = self.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let request = self.http.request(Method::POST, &self.token_endpoint).form(&form);
        let response = self.http.send(request).await.map_err(|e| {
            RallypointError::Auth(format!("token refresh request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(RallypointError::Auth(describe_failure("token refresh", response).await));
        }

        let body: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| RallypointError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_in = body.expires_in.filter(|secs| *secs > 0).ok_or_else(|| {
            RallypointError::Auth("token response did not include a positive expires_in".into())
        })?;

        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                RallypointError::Auth(format!("token response expires_in out of range: {expires_in}"))
            })?;

        Ok(TokenRefresh { access_token: body.access_token, expires_at })
    }
}

async fn describe_failure(context: &str, response: Response) -> String {
    let status = response.status();
    let detail = response.text().await.unwrap_or_else(|_| "no response body".to_string());
    warn!(%status, context, "provider returned an error status");

    format!("{context} failed ({status}): {}", detail.trim())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    status: Option<String>,
    transparency: Option<String>,
    #[serde(default)]
    start: EventTime,
    #[serde(default)]
    end: EventTime,
}

impl From<GoogleCalendarEvent> for RawCalendarEvent {
    fn from(event: GoogleCalendarEvent) -> Self {
        Self {
            id: event.id,
            title: event.summary,
            start: event.start,
            end: event.end,
            status: event.status,
            transparency: event.transparency,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}
