use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use koap_core::{Error, Result, ScrapeConfig};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use tokio::time::sleep;
use tracing::{info, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Mobile Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const BROWSER_ACCEPT_LANGUAGE: &str = "ru,en-US;q=0.9,en;q=0.8";

/// Status line and body of a single GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs one GET. Transport failures are errors; any status code,
    /// including 4xx and 5xx, is a successful response.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// The real transport: one `reqwest::Client` shared for the whole run.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .http1_only()
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        // Error pages are never parsed, no point in downloading them.
        let body = if status == 200 {
            response.text().await?
        } else {
            String::new()
        };
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Page(String),
    /// The server answered 404. Expected for most of the URL space.
    Missing,
}

/// GET with a fixed attempt budget and linear backoff.
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    max_attempts: u32,
    backoff_step: Duration,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &ScrapeConfig) -> Self {
        Self {
            transport,
            max_attempts: config.max_attempts.max(1),
            backoff_step: config.backoff_step,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_once(url).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_step * attempt;
                    warn!(
                        "Попытка {}/{} для {} не удалась: {}; повтор через {:.1} с",
                        attempt,
                        self.max_attempts,
                        url,
                        e,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    return Err(Error::FetchFailed {
                        url: url.to_string(),
                        attempts: attempt,
                        source: Box::new(e),
                    })
                }
            }
        }
    }

    async fn try_once(&self, url: &str) -> Result<FetchOutcome> {
        let response = self.transport.get(url).await?;
        match response.status {
            200 => Ok(FetchOutcome::Page(response.body)),
            404 => {
                info!("Статья не найдена: {}", url);
                Ok(FetchOutcome::Missing)
            }
            status => Err(Error::HttpStatus { url: url.to_string(), status }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeTransport, Reply};
    use super::*;

    const URL: &str = "https://www.zakonrf.info/koap/1.1/";

    fn fetcher(transport: Arc<FakeTransport>) -> Fetcher {
        Fetcher::new(transport, &ScrapeConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_ok_returns_body() {
        let transport = Arc::new(FakeTransport::new(Reply::Status(200, "<html></html>".into())));
        let outcome = fetcher(transport.clone()).fetch(URL).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Page("<html></html>".into()));
        assert_eq!(transport.urls(), vec![URL.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let transport = Arc::new(FakeTransport::new(Reply::Status(404, String::new())));
        let start = tokio::time::Instant::now();
        let outcome = fetcher(transport.clone()).fetch(URL).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Missing);
        assert_eq!(transport.urls().len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_failure_uses_three_attempts_with_linear_backoff() {
        let transport = Arc::new(FakeTransport::new(Reply::TransportError));
        let err = fetcher(transport.clone()).fetch(URL).await.unwrap_err();

        match err {
            Error::FetchFailed { attempts, ref url, .. } => {
                assert_eq!(attempts, 3);
                assert_eq!(url, URL);
            }
            other => panic!("unexpected error: {other}"),
        }

        let instants = transport.instants();
        assert_eq!(instants.len(), 3);
        assert_eq!(instants[1] - instants[0], Duration::from_millis(2000));
        assert_eq!(instants[2] - instants[1], Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_other_status_is_retried() {
        let transport = Arc::new(
            FakeTransport::new(Reply::Status(200, "ok".into()))
                .script(URL, vec![Reply::Status(403, String::new()), Reply::Status(503, String::new())]),
        );
        let outcome = fetcher(transport.clone()).fetch(URL).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Page("ok".into()));
        assert_eq!(transport.urls().len(), 3);
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "gzip");
        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), "ru,en-US;q=0.9,en;q=0.8");
        assert_eq!(headers.get(UPGRADE_INSECURE_REQUESTS).unwrap(), "1");
        assert!(headers.get(USER_AGENT).unwrap().to_str().unwrap().contains("Chrome/143.0.0.0"));
    }

    #[test]
    fn test_client_builds() {
        assert!(ReqwestTransport::new(&ScrapeConfig::default()).is_ok());
    }
}
