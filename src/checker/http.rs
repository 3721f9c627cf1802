// src/checker/http.rs
// =============================================================================
// Liveness probes for bookmark URLs.
//
// Key functionality:
// - Sends an HTTP HEAD request (no body download) with a per-request timeout
// - Follows redirects and reports the status of the final response
// - Turns transport faults into a tagged ProbeOutcome instead of an error
// - Classifies outcomes into the LinkStatus shown in reports
//
// Rust concepts:
// - Enums: ProbeOutcome and LinkStatus name every way a link can end up
// - Traits: LinkProbe hides the network so batches can be tested offline
// - impl Display / Serialize: The same text in reports, logs and JSON
// =============================================================================

use reqwest::Client;
use serde::{Serialize, Serializer};
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Longest fault description kept in an `Error: ...` status.
pub const MAX_ERROR_LEN: usize = 50;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Why a link counts as broken.
///
/// Displays as the text used in reports: `404`, `Timeout`, `Connection failed`
/// or `Error: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// The server answered with a 4xx/5xx status.
    Http(u16),
    /// No response within the timeout.
    Timeout,
    /// The connection could not be established.
    ConnectionFailed,
    /// Any other fault, description already truncated.
    Error(String),
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Http(code) => write!(f, "{}", code),
            LinkStatus::Timeout => write!(f, "Timeout"),
            LinkStatus::ConnectionFailed => write!(f, "Connection failed"),
            LinkStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

// Reports carry the status as the same text a person reads
impl Serialize for LinkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The raw result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with this status (after redirects).
    Responded(u16),
    TimedOut,
    ConnectFailed,
    /// Anything else: TLS problems, invalid URLs, redirect loops, ...
    Faulted(String),
}

impl ProbeOutcome {
    /// `None` for a live link, otherwise the status to report.
    ///
    /// Anything below 400 (2xx, and 3xx that was not followed) counts as live.
    pub fn into_failure(self) -> Option<LinkStatus> {
        match self {
            ProbeOutcome::Responded(code) if code < 400 => None,
            ProbeOutcome::Responded(code) => Some(LinkStatus::Http(code)),
            ProbeOutcome::TimedOut => Some(LinkStatus::Timeout),
            ProbeOutcome::ConnectFailed => Some(LinkStatus::ConnectionFailed),
            ProbeOutcome::Faulted(message) => Some(LinkStatus::Error(truncate(&message, MAX_ERROR_LEN))),
        }
    }
}

/// Something that can check whether a URL is reachable.
///
/// `HttpProbe` is the real thing; tests script outcomes with fakes.
pub trait LinkProbe {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeOutcome> + Send;
}

/// HEAD-request probe backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Builds a probe whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("raindrop-guardian/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpProbe { client })
    }
}

impl LinkProbe for HttpProbe {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeOutcome> + Send {
        let request = self.client.head(url);
        async move {
            match request.send().await {
                Ok(response) => ProbeOutcome::Responded(response.status().as_u16()),
                Err(e) => categorize_error(e),
            }
        }
    }
}

// Maps reqwest's error kinds onto the outcomes we report.
// Timeout is checked first: a connect that times out is still a timeout.
fn categorize_error(error: reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        ProbeOutcome::TimedOut
    } else if error.is_connect() {
        ProbeOutcome::ConnectFailed
    } else {
        ProbeOutcome::Faulted(error.to_string())
    }
}

// Char-based so multi-byte messages never split inside a character
fn truncate(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(LinkStatus::Http(404).to_string(), "404");
        assert_eq!(LinkStatus::Timeout.to_string(), "Timeout");
        assert_eq!(LinkStatus::ConnectionFailed.to_string(), "Connection failed");
        assert_eq!(LinkStatus::Error("boom".into()).to_string(), "Error: boom");
    }

    #[test]
    fn test_status_serializes_as_text() {
        let json = serde_json::to_string(&LinkStatus::Http(500)).unwrap();
        assert_eq!(json, "\"500\"");
    }

    #[test]
    fn test_classification() {
        assert_eq!(ProbeOutcome::Responded(200).into_failure(), None);
        assert_eq!(ProbeOutcome::Responded(304).into_failure(), None);
        assert_eq!(ProbeOutcome::Responded(399).into_failure(), None);
        assert_eq!(
            ProbeOutcome::Responded(400).into_failure(),
            Some(LinkStatus::Http(400))
        );
        assert_eq!(ProbeOutcome::TimedOut.into_failure(), Some(LinkStatus::Timeout));
        assert_eq!(
            ProbeOutcome::ConnectFailed.into_failure(),
            Some(LinkStatus::ConnectionFailed)
        );
    }

    #[test]
    fn test_fault_message_truncated_to_50_chars() {
        let long = "x".repeat(80);
        match ProbeOutcome::Faulted(long).into_failure() {
            Some(LinkStatus::Error(message)) => assert_eq!(message.chars().count(), 50),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééé", 3), "ééé");
    }

    #[tokio::test]
    async fn test_probe_statuses() {
        let mut server = mockito::Server::new_async().await;
        server.mock("HEAD", "/ok").with_status(200).create_async().await;
        server.mock("HEAD", "/missing").with_status(404).create_async().await;

        let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
        assert_eq!(
            probe.probe(&format!("{}/ok", server.url())).await,
            ProbeOutcome::Responded(200)
        );
        assert_eq!(
            probe.probe(&format!("{}/missing", server.url())).await,
            ProbeOutcome::Responded(404)
        );
    }

    #[tokio::test]
    async fn test_probe_follows_redirects() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/gone", server.url());
        server
            .mock("HEAD", "/moved")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        server.mock("HEAD", "/gone").with_status(410).create_async().await;

        let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
        let outcome = probe.probe(&format!("{}/moved", server.url())).await;
        assert_eq!(outcome, ProbeOutcome::Responded(410));
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        // Accept connections but never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let probe = HttpProbe::new(Duration::from_millis(200)).unwrap();
        let outcome = probe.probe(&format!("http://{}/slow", addr)).await;
        assert_eq!(outcome, ProbeOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        // Grab a free port, then close it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
        let outcome = probe.probe(&format!("http://{}/", addr)).await;
        assert_eq!(outcome, ProbeOutcome::ConnectFailed);
    }

    #[tokio::test]
    async fn test_probe_invalid_url_is_a_fault() {
        let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
        let outcome = probe.probe("not a url").await;
        assert!(matches!(outcome, ProbeOutcome::Faulted(_)));
    }
}
