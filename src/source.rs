//! Where the whereabouts come from
//!
//! Two endpoints exist: the weekly one answers `{"data": {"whereabouts": [...]}}`,
//! the status one answers `{"description": "..."}`. A local JSON file with the
//! weekly shape can stand in for the network when working off-site.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::schedule::RawDayRecord;

/// What a source hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Whereabouts {
    Week(Vec<RawDayRecord>),
    Description(String),
}

/// Anything that can be asked for the current whereabouts
pub trait LocationSource {
    fn fetch(&self) -> Result<Whereabouts>;
}

#[derive(Deserialize)]
struct WeekResponse {
    data: WeekData,
}

#[derive(Deserialize)]
struct WeekData {
    whereabouts: Vec<RawDayRecord>,
}

#[derive(Deserialize)]
struct StatusResponse {
    description: String,
}

/// Decode the body of the weekly endpoint
pub fn parse_week_body(body: &str) -> Result<Vec<RawDayRecord>> {
    let response: WeekResponse =
        serde_json::from_str(body).context("Malformed whereabouts response")?;
    Ok(response.data.whereabouts)
}

/// Decode the body of the status endpoint
pub fn parse_status_body(body: &str) -> Result<String> {
    let response: StatusResponse =
        serde_json::from_str(body).context("Malformed status response")?;
    Ok(response.description)
}

/// Shared HTTP agent with a bound on how long one request may take
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

/// Send a GET and return the body of a 200 response
fn get_body(request: ureq::Request) -> Result<String> {
    let url = request.url().to_string();
    log::debug!("GET {}", url);

    let response = match request.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => bail!("GET {} answered {}", url, code),
        Err(e) => bail!("GET {} failed: {}", url, e),
    };

    // ureq only reports 2xx as success, anything but 200 still means no data
    if response.status() != 200 {
        bail!("GET {} answered {}", url, response.status());
    }

    response
        .into_string()
        .with_context(|| format!("Reading body of {}", url))
}

/// Weekly whereabouts endpoint
pub struct WeekEndpoint {
    agent: ureq::Agent,
    url: String,
}

impl WeekEndpoint {
    pub fn new(agent: ureq::Agent, url: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
        }
    }
}

impl LocationSource for WeekEndpoint {
    fn fetch(&self) -> Result<Whereabouts> {
        let body = get_body(self.agent.get(&self.url))?;
        Ok(Whereabouts::Week(parse_week_body(&body)?))
    }
}

/// Single status description for one user, authenticated with a bearer token
pub struct StatusEndpoint {
    agent: ureq::Agent,
    url: String,
    token: String,
}

impl StatusEndpoint {
    pub fn new(agent: ureq::Agent, base_url: &str, user_id: &str, token: &str) -> Self {
        Self {
            agent,
            url: format!("{}/{}", base_url.trim_end_matches('/'), user_id),
            token: token.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LocationSource for StatusEndpoint {
    fn fetch(&self) -> Result<Whereabouts> {
        let request = self
            .agent
            .get(&self.url)
            .set("Authorization", &format!("Bearer {}", self.token));
        let body = get_body(request)?;
        Ok(Whereabouts::Description(parse_status_body(&body)?))
    }
}

/// Weekly whereabouts read from a file on disk
pub struct OfflineWeek {
    path: PathBuf,
}

impl OfflineWeek {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationSource for OfflineWeek {
    fn fetch(&self) -> Result<Whereabouts> {
        let body = fs::read_to_string(&self.path)
            .with_context(|| format!("Reading {}", self.path.display()))?;
        Ok(Whereabouts::Week(parse_week_body(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_BODY: &str = r#"{
        "data": {
            "whereabouts": [
                {"date": "2021-06-08 00:00:00", "locationAm": "Home"},
                {"date": "2021-06-07 00:00:00", "locationAm": "Portland House", "locationPm": "Home"}
            ]
        }
    }"#;

    #[test]
    fn week_body_keeps_source_order() {
        let records = parse_week_body(WEEK_BODY).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location_am, "Home");
        assert_eq!(records[1].date, "2021-06-07 00:00:00");
    }

    #[test]
    fn week_body_without_data_is_rejected() {
        assert!(parse_week_body(r#"{"whereabouts": []}"#).is_err());
    }

    #[test]
    fn status_body_yields_description() {
        let description = parse_status_body(r#"{"description": "In the lab"}"#).unwrap();
        assert_eq!(description, "In the lab");
    }

    #[test]
    fn status_url_joins_user_id() {
        let endpoint = StatusEndpoint::new(
            http_agent(Duration::from_secs(1)),
            "http://status.example/users/",
            "todd",
            "secret",
        );
        assert_eq!(endpoint.url(), "http://status.example/users/todd");
    }

    #[test]
    fn offline_week_reads_file() {
        let path = std::env::temp_dir().join(format!("whereis-offline-{}.json", std::process::id()));
        fs::write(&path, WEEK_BODY).unwrap();

        let fetched = OfflineWeek::new(&path).fetch().unwrap();
        fs::remove_file(&path).unwrap();

        match fetched {
            Whereabouts::Week(records) => assert_eq!(records.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn offline_week_missing_file_is_an_error() {
        let source = OfflineWeek::new("/nonexistent/whereis/example.json");
        assert!(source.fetch().is_err());
    }
}
