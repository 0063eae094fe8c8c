use crate::config::VerifyConfig;
use crate::cookies::SessionCookie;
use crate::error::{GlazeError, Result};
use crate::probe::{self, Method, ProbeResult, ProbeTarget, TargetKind};
use crate::report::VerificationReport;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

/// Probes a running server, one request at a time.
///
/// Session cookies are seeded into the client's cookie jar for the base URL,
/// so cookies the server sets during the run are carried forward as well.
/// Failures are never retried.
pub struct Verifier {
    client: Client,
    base_url: String,
    page_timeout: Duration,
    api_timeout: Duration,
    throttle: Duration,
}

impl Verifier {
    pub fn new(cfg: &VerifyConfig, cookies: &[SessionCookie]) -> Result<Self> {
        let base_url = cfg.base_url.trim_end_matches('/').to_string();
        let url = Url::parse(&base_url).map_err(|e| GlazeError::InvalidBaseUrl {
            url: cfg.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GlazeError::InvalidBaseUrl {
                url: cfg.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let jar = Jar::default();
        for cookie in cookies {
            jar.add_cookie_str(&cookie.pair(), &url);
        }
        let client = Client::builder()
            .cookie_provider(Arc::new(jar))
            .build()?;

        Ok(Self {
            client,
            base_url,
            page_timeout: Duration::from_secs(cfg.page_timeout_seconds),
            api_timeout: Duration::from_secs(cfg.api_timeout_seconds),
            throttle: Duration::from_millis(cfg.throttle_ms),
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue one request and classify the response.
    pub fn probe(&self, target: &ProbeTarget) -> ProbeResult {
        let url = self.url_for(&target.path);
        let timeout = match target.kind {
            TargetKind::Page => self.page_timeout,
            TargetKind::Api => self.api_timeout,
        };
        let mut request = match target.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .timeout(timeout);
        if !target.query.is_empty() {
            request = request.query(&target.query);
        }
        if let Some(body) = &target.body {
            request = request.json(body);
        }

        let response = match request.send() {
            Ok(r) => r,
            Err(e) => return transport_failure(target, e),
        };
        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => probe::classify(target, status, &body),
            Err(e) => transport_failure(target, e),
        }
    }

    /// Probe every target in order, pausing between requests.
    pub fn run(&self, targets: &[ProbeTarget]) -> VerificationReport {
        tracing::info!(targets = targets.len(), base_url = %self.base_url, "verifying");
        let mut results = Vec::with_capacity(targets.len());
        for (i, target) in targets.iter().enumerate() {
            if i > 0 && !self.throttle.is_zero() {
                std::thread::sleep(self.throttle);
            }
            let result = self.probe(target);
            tracing::info!(
                path = %result.path,
                outcome = ?result.outcome,
                status = ?result.status,
                bytes = result.content_length,
                issues = result.issues.len(),
                "probed"
            );
            results.push(result);
        }
        VerificationReport::from_results(results)
    }
}

fn transport_failure(target: &ProbeTarget, e: reqwest::Error) -> ProbeResult {
    if e.is_timeout() {
        tracing::warn!(path = %target.path, "timed out");
        ProbeResult::timeout(target)
    } else {
        tracing::warn!(path = %target.path, error = %e, "request failed");
        ProbeResult::error(target, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ApiEntry, ProbeOutcome};
    use mockito::Matcher;

    const PAGE: &str = "<!DOCTYPE html><html><head><title>Fleet</title>\
<link rel=\"stylesheet\" href=\"/static/bootstrap.min.css\"></head><body>\
<nav class=\"navbar navbar-glass\"></nav><main><table><tr><td>Bus 12</td></tr></table>\
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure \
dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur.</p>\
</main><script src=\"/static/jquery-3.7.1.min.js\"></script></body></html>";

    fn settings(base_url: &str) -> VerifyConfig {
        VerifyConfig {
            base_url: base_url.to_string(),
            throttle_ms: 0,
            ..VerifyConfig::default()
        }
    }

    fn session() -> Vec<SessionCookie> {
        vec![SessionCookie {
            domain: "localhost".to_string(),
            path: "/".to_string(),
            secure: false,
            name: "session_id".to_string(),
            value: "abc123".to_string(),
        }]
    }

    #[test]
    fn page_probe_sends_the_session_cookie() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/fleet")
            .match_header("cookie", "session_id=abc123")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create();

        let cfg = settings(&server.url());
        let verifier = Verifier::new(&cfg, &session()).unwrap();
        let result = verifier.probe(&ProbeTarget::page("/fleet", &cfg));

        mock.assert();
        assert_eq!(result.outcome, ProbeOutcome::Ok, "{:?}", result.issues);
        assert_eq!(result.status, Some(200));
        assert_eq!(result.content_length, PAGE.len());
    }

    #[test]
    fn run_aggregates_working_and_failed() {
        let mut server = mockito::Server::new();
        let _fleet = server
            .mock("GET", "/fleet")
            .with_status(200)
            .with_body(PAGE)
            .create();
        let _students = server
            .mock("GET", "/students")
            .with_status(500)
            .with_body("internal error")
            .create();
        let search = server
            .mock("GET", "/api/search/students")
            .match_query(Matcher::UrlEncoded("q".into(), "test".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[{\"id\": 1}]")
            .create();

        let cfg = settings(&server.url());
        let targets = vec![
            ProbeTarget::page("/fleet", &cfg),
            ProbeTarget::page("/students", &cfg),
            ProbeTarget::api(&ApiEntry::Path("/api/search/students?q=test".into())),
        ];
        let verifier = Verifier::new(&cfg, &[]).unwrap();
        let report = verifier.run(&targets);

        search.assert();
        assert_eq!(report.total_tested, 3);
        assert_eq!(report.working, vec!["/fleet", "/api/search/students?q=test"]);
        assert_eq!(report.failed, vec!["/students"]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].page, "/students");
        assert_eq!(report.issues[0].issues[0], "HTTP 500 error");
    }

    #[test]
    fn post_targets_send_a_json_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/fleet/summary")
            .match_body(Matcher::Json(serde_json::json!({"range": "30d"})))
            .with_status(200)
            .with_body("{\"buses\": 42}")
            .create();

        let cfg = settings(&server.url());
        let entry = ApiEntry::Request {
            path: "/api/fleet/summary".to_string(),
            method: Method::Post,
            body: Some(serde_json::json!({"range": "30d"})),
        };
        let verifier = Verifier::new(&cfg, &[]).unwrap();
        let result = verifier.probe(&ProbeTarget::api(&entry));

        mock.assert();
        assert_eq!(result.outcome, ProbeOutcome::Ok);
    }

    #[test]
    fn unreachable_server_is_an_error_outcome() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let cfg = settings(&format!("http://127.0.0.1:{port}"));
        let verifier = Verifier::new(&cfg, &[]).unwrap();
        let report = verifier.run(&[ProbeTarget::page("/fleet", &cfg)]);
        assert_eq!(report.failed, vec!["/fleet"]);
        assert!(report.issues[0].issues[0].starts_with("Error: "));
        assert_eq!(report.results[0].outcome, ProbeOutcome::Error);
    }

    #[test]
    fn silent_server_times_out() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accept the connection and hold it open without answering.
        std::thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_secs(3));
        });

        let cfg = VerifyConfig {
            page_timeout_seconds: 1,
            ..settings(&format!("http://127.0.0.1:{port}"))
        };
        let verifier = Verifier::new(&cfg, &[]).unwrap();
        let result = verifier.probe(&ProbeTarget::page("/fleet", &cfg));

        assert_eq!(result.outcome, ProbeOutcome::Timeout);
        assert_eq!(result.status, None);
        assert_eq!(result.issues, vec!["Timeout - slow loading"]);
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(
            Verifier::new(&settings("ftp://localhost"), &[]),
            Err(GlazeError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Verifier::new(&settings("not a url"), &[]),
            Err(GlazeError::InvalidBaseUrl { .. })
        ));
    }
}
