use std::time::Duration;

use reqwest::Url;
use scraper::Html;

use super::sanitize::collapse_whitespace;
use super::types::PageFetcher;
use super::ExtractionError;
use crate::config::{BROWSER_USER_AGENT, URL_FETCH_TIMEOUT};

/// Elements whose text is page chrome, not content.
const BOILERPLATE_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

/// Validate a user-supplied URL: absolute, http or https.
pub fn parse_page_url(raw: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw.trim()).map_err(|e| ExtractionError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractionError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}

/// Blocking HTTP fetcher with a fixed timeout and a browser User-Agent.
pub struct HttpPageFetcher {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ExtractionError> {
        Self::from_builder(client_builder(timeout), timeout)
    }

    fn from_builder(
        builder: reqwest::blocking::ClientBuilder,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let client = builder.build().map_err(|e| ExtractionError::Fetch {
            url: String::new(),
            reason: format!("HTTP client setup failed: {e}"),
        })?;
        Ok(Self { client, timeout })
    }

    /// Fetcher with the standard 10-second timeout.
    pub fn with_default_timeout() -> Result<Self, ExtractionError> {
        Self::new(URL_FETCH_TIMEOUT)
    }
}

fn client_builder(timeout: Duration) -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        let parsed = parse_page_url(url)?;

        let response = self.client.get(parsed).send().map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request timed out after {}s", self.timeout.as_secs())
            } else if e.is_connect() {
                "could not connect to the server".to_string()
            } else {
                e.to_string()
            };
            ExtractionError::Fetch {
                url: url.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| ExtractionError::Fetch {
            url: url.to_string(),
            reason: format!("could not read response body: {e}"),
        })
    }
}

/// Visible text of an HTML document, boilerplate elements removed, joined
/// by single spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let fragments: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| BOILERPLATE_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                None
            } else {
                Some(&**text)
            }
        })
        .collect();

    collapse_whitespace(&fragments.join(" "))
}
