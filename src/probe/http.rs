//! HTTP(S) prober

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header, Client, Response};

use super::content::{assess, ContentVerdict};
use super::Prober;
use crate::error::{ProbeError, Result};
use crate::types::{ProbeConfig, ProbeReport};

/// Browser user agents, one picked at random per request
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
];

/// Probes a domain with a GET request per configured scheme
pub struct HttpProber {
    client: Client,
    config: ProbeConfig,
}

impl HttpProber {
    /// Create a new prober with custom configuration
    pub fn with_config(config: ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProbeError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    fn random_user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let user_agent = Self::random_user_agent();
        self.client
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| self.map_error(e))
    }

    fn map_error(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::timeout("HTTP request", self.config.timeout.as_secs())
        } else {
            err.into()
        }
    }

    /// Turn a response that arrived into a report
    async fn classify(&self, domain: &str, url: String, response: Response) -> ProbeReport {
        let status = response.status();
        if !status.is_success() {
            return ProbeReport::empty(domain, format!("HTTP {}", status.as_u16()))
                .with_url(url)
                .with_status(status.as_u16());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return ProbeReport::empty(domain, self.map_error(e).to_string())
                    .with_url(url)
                    .with_status(status.as_u16());
            }
        };

        match assess(&body, self.config.min_text_len, &self.config.parked_phrases) {
            ContentVerdict::Meaningful { text_len } => {
                ProbeReport::found(domain, url, status.as_u16(), text_len)
            }
            ContentVerdict::TooShort { text_len } => {
                ProbeReport::empty(domain, format!("only {} characters of text", text_len))
                    .with_url(url)
                    .with_status(status.as_u16())
                    .with_text_len(text_len)
            }
            ContentVerdict::Parked { phrase } => {
                ProbeReport::empty(domain, format!("parked page ('{}')", phrase))
                    .with_url(url)
                    .with_status(status.as_u16())
            }
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, domain: &str) -> ProbeReport {
        let start = Instant::now();
        let mut failure: Option<ProbeReport> = None;

        for scheme in &self.config.schemes {
            let url = scheme.url_for(domain);
            match self.send(&url).await {
                Ok(response) => {
                    let report = self.classify(domain, url, response).await;
                    tracing::debug!(
                        domain = %domain,
                        classification = %report.classification,
                        status = ?report.status_code,
                        duration_ms = %start.elapsed().as_millis(),
                        "Probe completed"
                    );
                    return report;
                }
                Err(e) if e.is_transport() => {
                    tracing::debug!(domain = %domain, url = %url, error = %e, "Request failed");
                    failure = Some(ProbeReport::empty(domain, e.to_string()).with_url(url));
                }
                Err(e) => {
                    tracing::warn!(domain = %domain, url = %url, error = %e, "Request could not be sent");
                    return ProbeReport::empty(domain, e.to_string()).with_url(url);
                }
            }
        }

        failure.unwrap_or_else(|| ProbeReport::empty(domain, "no schemes configured"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Classification, Scheme};
    use wiremock::{
        matchers::{header_exists, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn http_only(timeout: Duration) -> HttpProber {
        HttpProber::with_config(ProbeConfig {
            timeout,
            schemes: vec![Scheme::Http],
            ..Default::default()
        })
        .unwrap()
    }

    fn host_of(server: &MockServer) -> String {
        server.uri().trim_start_matches("http://").to_string()
    }

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_hello_page_is_found() {
        let server = serve(200, "<html><body>hello</body></html>").await;
        let prober = http_only(Duration::from_secs(5));

        let report = prober.probe(&host_of(&server)).await;
        assert_eq!(report.classification, Classification::Found);
        assert_eq!(report.status_code, Some(200));
        assert_eq!(report.text_len, Some(5));
    }

    #[tokio::test]
    async fn test_non_success_is_empty() {
        let server = serve(404, "<html><body>not here</body></html>").await;
        let prober = http_only(Duration::from_secs(5));

        let report = prober.probe(&host_of(&server)).await;
        assert_eq!(report.classification, Classification::Empty);
        assert_eq!(report.status_code, Some(404));
    }

    #[tokio::test]
    async fn test_blank_page_is_empty() {
        let server = serve(200, "<html><head><script>x()</script></head><body> </body></html>").await;
        let prober = http_only(Duration::from_secs(5));

        let report = prober.probe(&host_of(&server)).await;
        assert_eq!(report.classification, Classification::Empty);
        assert_eq!(report.text_len, Some(0));
    }

    #[tokio::test]
    async fn test_parked_page_is_empty() {
        let server = serve(200, "<html><body>Buy this domain today!</body></html>").await;
        let prober = http_only(Duration::from_secs(5));

        let report = prober.probe(&host_of(&server)).await;
        assert!(!report.is_found());
        assert!(report.detail.unwrap_or_default().contains("parked"));
    }

    #[tokio::test]
    async fn test_timeout_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>slow</body></html>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        let prober = http_only(Duration::from_millis(200));

        let report = prober.probe(&host_of(&server)).await;
        assert_eq!(report.classification, Classification::Empty);
        assert_eq!(report.status_code, None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_empty() {
        let server = MockServer::start().await;
        let host = host_of(&server);
        drop(server);
        let prober = http_only(Duration::from_secs(2));

        let report = prober.probe(&host).await;
        assert_eq!(report.classification, Classification::Empty);
        assert!(report.detail.is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_next_scheme() {
        let server = serve(200, "<html><body>plain http</body></html>").await;
        let prober = HttpProber::with_config(ProbeConfig {
            timeout: Duration::from_secs(2),
            schemes: vec![Scheme::Https, Scheme::Http],
            ..Default::default()
        })
        .unwrap();

        let report = prober.probe(&host_of(&server)).await;
        assert!(report.is_found());
        assert!(report.url.unwrap_or_default().starts_with("http://"));
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
        let prober = http_only(Duration::from_secs(2));

        assert!(prober.probe(&host_of(&server)).await.is_found());
    }
}
