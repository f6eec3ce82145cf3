//! HTTP client for the public Sejm API.
//!
//! Provides [`SejmClient`], which fetches a representative's inquiries
//! ([`InquirySource`]) and answers the per-inquiry and per-person lookups the
//! reconciler needs ([`Directory`]). All calls are unauthenticated GETs.

pub mod normalize;

use std::time::Duration;

use interpel_core::{Directory, InquiryKey, InquiryKind, Snapshot};
use serde_json::Value;
use tracing::{debug, warn};

use self::normalize::{normalize_item, submission_date};

/// Page size for the list endpoints. A single page is fetched.
pub const LIST_LIMIT: &str = "500";

/// Timeout for the bulk list endpoints.
const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for single-record lookups.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(
    "interpel/",
    env!("CARGO_PKG_VERSION"),
    " (Sejm inquiry reply watcher)"
);

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Failure fetching a representative's inquiry list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("could not parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("expected a JSON array from {url}")]
    NotAList { url: String },
}

// ─── InquirySource ────────────────────────────────────────────────────────────

/// Fetches the current inquiries of one representative.
pub trait InquirySource {
    /// All interpellations and written questions submitted by `person_id`,
    /// interpellations first, each in source order.
    fn fetch_inquiries(&self, person_id: &str) -> Result<Snapshot, SourceError>;
}

// ─── SejmClient ───────────────────────────────────────────────────────────────

/// Client for one parliamentary term of the Sejm API.
pub struct SejmClient {
    base_url: String,
    term: String,
    list_agent: ureq::Agent,
    lookup_agent: ureq::Agent,
}

impl SejmClient {
    /// Create a client for `term` rooted at `base_url`
    /// (e.g. `https://api.sejm.gov.pl/sejm`).
    pub fn new(base_url: &str, term: &str) -> Self {
        SejmClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            term: term.to_string(),
            list_agent: agent_with_timeout(LIST_TIMEOUT),
            lookup_agent: agent_with_timeout(LOOKUP_TIMEOUT),
        }
    }

    /// `{base}/term{term}/{path}`
    fn endpoint(&self, path: &str) -> String {
        format!("{}/term{}/{}", self.base_url, self.term, path)
    }

    /// GET `{base}/term{term}/{collection}?limit=500&sort_by=num&from={person}`
    fn fetch_list(&self, kind: InquiryKind, person_id: &str) -> Result<Vec<Value>, SourceError> {
        let url = self.endpoint(kind.api_collection());
        debug!(%url, person = person_id, "fetching inquiry list");

        let response = self
            .list_agent
            .get(&url)
            .query("limit", LIST_LIMIT)
            .query("sort_by", "num")
            .query("from", person_id)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;

        let body: Value = response
            .into_body()
            .read_json()
            .map_err(|source| SourceError::Decode {
                url: url.clone(),
                source,
            })?;

        match body {
            Value::Array(items) => Ok(items),
            _ => Err(SourceError::NotAList { url }),
        }
    }

    /// Single-record GET with the short timeout.
    fn lookup(&self, path: &str) -> Result<Value, SourceError> {
        let url = self.endpoint(path);
        let response = self
            .lookup_agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;
        response
            .into_body()
            .read_json()
            .map_err(|source| SourceError::Decode { url, source })
    }
}

impl InquirySource for SejmClient {
    fn fetch_inquiries(&self, person_id: &str) -> Result<Snapshot, SourceError> {
        let mut inquiries = Vec::new();

        for kind in InquiryKind::ALL {
            let items = self.fetch_list(kind, person_id)?;
            for (position, item) in items.iter().enumerate() {
                match normalize_item(item, kind) {
                    Ok(record) => inquiries.push(record),
                    Err(e) => warn!(
                        person = person_id,
                        kind = %kind,
                        position,
                        error = %e,
                        "dropping malformed inquiry"
                    ),
                }
            }
        }

        Ok(inquiries)
    }
}

impl Directory for SejmClient {
    /// GET `{base}/term{term}/{collection}/{id}`
    fn submission_date(&self, key: &InquiryKey) -> Option<String> {
        let path = format!("{}/{}", key.kind.api_collection(), key.id);
        match self.lookup(&path) {
            Ok(detail) => submission_date(&detail),
            Err(e) => {
                warn!(inquiry = %key, error = %e, "submission date lookup failed");
                None
            }
        }
    }

    /// GET `{base}/term{term}/MP/{id}`
    fn person_name(&self, person_id: &str) -> Option<String> {
        match self.lookup(&format!("MP/{person_id}")) {
            Ok(mp) => mp
                .get("firstLastName")
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(e) => {
                warn!(person = person_id, error = %e, "name lookup failed");
                None
            }
        }
    }
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_term() {
        let client = SejmClient::new("https://api.sejm.gov.pl/sejm/", "10");
        assert_eq!(
            client.endpoint("interpellations"),
            "https://api.sejm.gov.pl/sejm/term10/interpellations"
        );
        assert_eq!(client.endpoint("MP/12"), "https://api.sejm.gov.pl/sejm/term10/MP/12");
    }

    #[test]
    fn user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("interpel/"));
    }

    #[test]
    fn unreachable_api_is_an_http_error() {
        // Port 9 (discard) is not expected to serve HTTP on the test host.
        let client = SejmClient::new("http://127.0.0.1:9/sejm", "10");
        let err = client.fetch_inquiries("1").unwrap_err();
        assert!(matches!(err, SourceError::Http { .. }), "{err}");
        assert_eq!(client.person_name("1"), None);
        assert_eq!(
            client.submission_date(&InquiryKey::new("1", InquiryKind::Interpellation)),
            None
        );
    }
}
