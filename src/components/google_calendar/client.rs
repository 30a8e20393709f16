use super::models::{CalendarEvent, EventsPage};
use super::store::{CalendarStore, ListEventsParams, ORDER_BY_START_TIME};
use crate::config::{Config, DEFAULT_API_URL};
use crate::error::{config_error, not_found, remote_error, CalendarResult};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Largest page the API hands out
const MAX_PAGE_SIZE: u32 = 2500;

/// Google Calendar v3 REST client authenticated with a bearer token
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Wrap an HTTP client and an already-issued access token
    pub fn new(client: Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a client from configuration
    pub fn from_config(config: &Config) -> CalendarResult<Self> {
        Url::parse(&config.api_base_url).map_err(|e| {
            config_error(&format!("Invalid API URL '{}': {}", config.api_base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(client, config.google_access_token.clone())
            .with_base_url(config.api_base_url.clone()))
    }

    /// URL of the events collection, or of one event in it
    fn events_url(&self, calendar_id: &str, event_id: Option<&str>) -> CalendarResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| config_error(&format!("Failed to parse URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| config_error(&format!("Cannot use {} as a base URL", self.base_url)))?;
            segments.pop_if_empty().push("calendars").push(calendar_id).push("events");
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }

        Ok(url)
    }

    /// Turn a non-success response into an error carrying status and body
    async fn check(response: Response, action: &str) -> CalendarResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(remote_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarStore for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.events_url(calendar_id, None)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("singleEvents", "true");
                query.append_pair("orderBy", ORDER_BY_START_TIME);
                if let Some(time_min) = params.time_min {
                    query.append_pair("timeMin", &time_min.to_rfc3339_opts(SecondsFormat::AutoSi, true));
                }
                if let Some(time_max) = params.time_max {
                    query.append_pair("timeMax", &time_max.to_rfc3339_opts(SecondsFormat::AutoSi, true));
                }
                if let Some(max_results) = params.max_results {
                    let remaining = max_results.saturating_sub(events.len() as u32);
                    query.append_pair("maxResults", &remaining.min(MAX_PAGE_SIZE).to_string());
                }
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            debug!("Listing events: {}", url);

            let response = self
                .client
                .get(url)
                .header("Authorization", format!("Bearer {}", self.access_token))
                .send()
                .await
                .map_err(|e| remote_error(&format!("Failed to fetch events: {}", e)))?;

            let response = Self::check(response, "fetch events").await?;

            let page: EventsPage = response
                .json()
                .await
                .map_err(|e| remote_error(&format!("Failed to parse events response: {}", e)))?;

            events.extend(page.items);

            if let Some(max_results) = params.max_results {
                if events.len() >= max_results as usize {
                    events.truncate(max_results as usize);
                    break;
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Fetched {} events from {}", events.len(), calendar_id);
        Ok(events)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> CalendarResult<()> {
        let url = self.events_url(calendar_id, Some(event_id))?;

        let response = self
            .client
            .delete(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to delete event: {}", e)))?;

        // Deleted events answer with 410 Gone
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(not_found(&format!("Event {} no longer exists", event_id)));
        }

        Self::check(response, "delete event").await?;
        Ok(())
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> CalendarResult<CalendarEvent> {
        let url = self.events_url(calendar_id, Some(&event.id))?;

        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to update event: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found(&format!("Event {} no longer exists", event.id)));
        }

        let response = Self::check(response, "update event").await?;
        response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse updated event: {}", e)))
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> CalendarResult<CalendarEvent> {
        let url = self.events_url(calendar_id, None)?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to insert event: {}", e)))?;

        let response = Self::check(response, "insert event").await?;
        response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse created event: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::{EventTime, Reminders};
    use crate::components::google_calendar::window::TimeWindow;
    use crate::error::Error;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::io::Read;
    use std::thread::JoinHandle;

    struct RecordedRequest {
        method: String,
        url: String,
        authorization: Option<String>,
        body: String,
    }

    impl RecordedRequest {
        fn path(&self) -> &str {
            self.url.split('?').next().unwrap_or_default()
        }

        fn query(&self, key: &str) -> Option<String> {
            let url = Url::parse(&format!("http://localhost{}", self.url)).unwrap();
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        }
    }

    /// Answer requests on a local port with the given responses, in order
    fn serve(responses: Vec<(u16, String)>) -> (GoogleCalendarClient, JoinHandle<Vec<RecordedRequest>>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();

        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let mut request = server.recv().unwrap();
                let mut request_body = String::new();
                request.as_reader().read_to_string(&mut request_body).unwrap();
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string());
                seen.push(RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    authorization,
                    body: request_body,
                });

                let content_type =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .unwrap();
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(tiny_http::StatusCode(status))
                    .with_header(content_type);
                request.respond(response).unwrap();
            }
            seen
        });

        let client = GoogleCalendarClient::new(Client::new(), "test-token")
            .with_base_url(format!("http://127.0.0.1:{}/calendar/v3", port));
        (client, handle)
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let (client, server) = serve(vec![
            (200, json!({ "items": [{ "id": "a" }], "nextPageToken": "p2" }).to_string()),
            (200, json!({ "items": [{ "id": "b" }] }).to_string()),
        ]);

        let events = client
            .list_events("primary", &ListEventsParams::default())
            .await
            .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.method, "GET");
            assert_eq!(request.path(), "/calendar/v3/calendars/primary/events");
            assert_eq!(request.authorization.as_deref(), Some("Bearer test-token"));
            assert_eq!(request.query("singleEvents").as_deref(), Some("true"));
            assert_eq!(request.query("orderBy").as_deref(), Some("startTime"));
            assert_eq!(request.query("maxResults"), None);
        }
        assert_eq!(requests[0].query("pageToken"), None);
        assert_eq!(requests[1].query("pageToken").as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn test_list_stops_at_max_results() {
        let (client, server) = serve(vec![
            (
                200,
                json!({ "items": [{ "id": "a" }, { "id": "b" }], "nextPageToken": "p2" }).to_string(),
            ),
            (
                200,
                json!({ "items": [{ "id": "c" }, { "id": "d" }], "nextPageToken": "p3" }).to_string(),
            ),
        ]);

        let params = ListEventsParams::default().with_max_results(3);
        let events = client.list_events("primary", &params).await.unwrap();
        assert_eq!(events.len(), 3);

        // The third page is never requested
        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query("maxResults").as_deref(), Some("3"));
        assert_eq!(requests[1].query("maxResults").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_list_caps_page_size() {
        let (client, server) = serve(vec![(200, json!({ "items": [] }).to_string())]);

        let params = ListEventsParams::default().with_max_results(10_000);
        assert!(client.list_events("primary", &params).await.unwrap().is_empty());

        let requests = server.join().unwrap();
        assert_eq!(requests[0].query("maxResults").as_deref(), Some("2500"));
    }

    #[tokio::test]
    async fn test_list_sends_window_bounds() {
        let (client, server) = serve(vec![(200, json!({ "items": [] }).to_string())]);

        let start = Utc.with_ymd_and_hms(2020, 7, 15, 9, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let end = Utc.with_ymd_and_hms(2020, 7, 16, 0, 0, 0).unwrap();
        let params = ListEventsParams::in_window(&TimeWindow::new(start, end).unwrap());
        client.list_events("primary", &params).await.unwrap();

        let requests = server.join().unwrap();
        assert_eq!(
            requests[0].query("timeMin").as_deref(),
            Some("2020-07-15T09:00:00.250Z")
        );
        assert_eq!(requests[0].query("timeMax").as_deref(), Some("2020-07-16T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_list_service_error() {
        let (client, server) = serve(vec![(503, "backend error".to_string())]);

        let result = client
            .list_events("primary", &ListEventsParams::default())
            .await;
        match result {
            Err(Error::RemoteUnavailable(message)) => {
                assert!(message.contains("503"), "{message}");
                assert!(message.contains("backend error"), "{message}");
            }
            other => panic!("expected RemoteUnavailable, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_delete_event() {
        let (client, server) = serve(vec![
            (410, String::new()),
            (404, String::new()),
            (500, "boom".to_string()),
            (204, String::new()),
        ]);

        assert!(matches!(
            client.delete_event("primary", "abc").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            client.delete_event("primary", "abc").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            client.delete_event("primary", "abc").await,
            Err(Error::RemoteUnavailable(_))
        ));
        client.delete_event("primary", "abc").await.unwrap();

        let requests = server.join().unwrap();
        for request in &requests {
            assert_eq!(request.method, "DELETE");
            assert_eq!(request.path(), "/calendar/v3/calendars/primary/events/abc");
        }
    }

    #[tokio::test]
    async fn test_update_sends_full_record() {
        let mut event: CalendarEvent = serde_json::from_value(json!({
            "id": "abc123",
            "etag": "\"3194\"",
            "summary": "testing",
            "start": { "date": "2020-07-15", "timeZone": "Europe/Helsinki" },
            "end": { "date": "2020-07-16" },
            "reminders": { "useDefault": true }
        }))
        .unwrap();
        event.reminders = Reminders::none();
        let stored = serde_json::to_string(&event).unwrap();

        let (client, server) = serve(vec![(200, stored), (404, String::new())]);

        let updated = client.update_event("primary", &event).await.unwrap();
        assert_eq!(updated, event);
        assert!(matches!(
            client.update_event("primary", &event).await,
            Err(Error::NotFound(_))
        ));

        let requests = server.join().unwrap();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path(), "/calendar/v3/calendars/primary/events/abc123");

        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["etag"], json!("\"3194\""));
        assert_eq!(body["summary"], json!("testing"));
        assert_eq!(body["start"]["timeZone"], json!("Europe/Helsinki"));
        assert_eq!(body["reminders"], json!({ "useDefault": false }));
    }

    #[tokio::test]
    async fn test_insert_posts_to_collection() {
        let (client, server) = serve(vec![(
            200,
            json!({ "id": "new1", "summary": "test1", "status": "confirmed" }).to_string(),
        )]);

        let start = Utc.with_ymd_and_hms(2020, 7, 15, 9, 0, 0).unwrap();
        let event = CalendarEvent::new(
            "test1",
            EventTime::at(start),
            EventTime::at(start + chrono::Duration::hours(2)),
        );
        let created = client.insert_event("primary", &event).await.unwrap();
        assert_eq!(created.id, "new1");

        let requests = server.join().unwrap();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path(), "/calendar/v3/calendars/primary/events");
        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["summary"], json!("test1"));
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_events_url() {
        let client = GoogleCalendarClient::new(Client::new(), "token");

        let url = client.events_url("primary", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/primary/events"
        );

        let url = client.events_url("team calendar", Some("abc123")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%20calendar/events/abc123"
        );
    }

    #[test]
    fn test_events_url_trailing_slash() {
        let client = GoogleCalendarClient::new(Client::new(), "token")
            .with_base_url("http://localhost:8080/calendar/v3/");
        let url = client.events_url("primary", None).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/calendar/v3/calendars/primary/events"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = GoogleCalendarClient::new(Client::new(), "token").with_base_url("not a url");
        assert!(client.events_url("primary", None).is_err());
    }
}
