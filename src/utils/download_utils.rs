use crate::config::ClientConfig;
use crate::error::{LookupError, Result};
use log::{debug, warn};
use reqwest::blocking::Client;
use std::borrow::Cow;
use std::time::Duration;

/// A fully drained HTTP response. The connection is already released when
/// one of these exists.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Transport used by the directory client.
///
/// Implementations return any reachable response regardless of its status
/// code and only fail on connection, timeout or stream errors. `timeout`
/// applies to connecting and to reading the whole response.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedResource>;

    fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        Ok(self.fetch(url, timeout)?.text().into_owned())
    }
}

/// Blocking `reqwest` transport.
///
/// A client is built once for the configured timeout. Calls with any other
/// timeout get a client of their own, since `reqwest` fixes the connect
/// timeout per client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
    default_timeout: Duration,
    client: Client,
}

fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(LookupError::Network)
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            user_agent: config.user_agent.clone(),
            default_timeout: config.timeout,
            client,
        })
    }

    fn client_for(&self, timeout: Duration) -> Result<Cow<'_, Client>> {
        if timeout == self.default_timeout {
            return Ok(Cow::Borrowed(&self.client));
        }
        debug!("Building client for timeout {} ms", timeout.as_millis());
        Ok(Cow::Owned(build_client(&self.user_agent, timeout)?))
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedResource> {
        debug!("Fetching {} (timeout {} ms)", url, timeout.as_millis());

        let client = self.client_for(timeout)?;
        let response = client.get(url).timeout(timeout).send().map_err(|e| {
            debug!("Request to {} failed: {:?}", url, e);
            LookupError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with status {}", url, status);
        }

        // `bytes` consumes the response, so the connection goes back to the
        // pool (or is closed) on both the success and the error path.
        let body = response.bytes().map_err(|e| {
            debug!("Reading body from {} failed: {:?}", url, e);
            LookupError::Network(e)
        })?;

        debug!("Received {} bytes with status {} from {}", body.len(), status, url);
        Ok(FetchedResource {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_multiline_body_is_kept_verbatim() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/lines");
            then.status(200).body("first line\nsecond line\r\nthird");
        });

        let text = fetcher()
            .fetch_text(&server.url("/lines"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(text, "first line\nsecond line\r\nthird");
    }

    #[test]
    fn test_binary_body_is_kept_verbatim() {
        let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, b'\n', 0x10];
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/render.png");
            then.status(200).body(payload.clone());
        });

        let resource = fetcher()
            .fetch(&server.url("/render.png"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(resource.body, payload);
    }

    #[test]
    fn test_error_status_is_returned_not_raised() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("{\"error\":\"Not Found\"}");
        });

        let resource = fetcher()
            .fetch(&server.url("/missing"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(resource.status, 404);
        assert_eq!(resource.text(), "{\"error\":\"Not Found\"}");
    }

    #[test]
    fn test_slow_response_times_out_as_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .body("{}")
                .delay(Duration::from_millis(1500));
        });

        let result = fetcher().fetch(&server.url("/slow"), Duration::from_millis(200));
        match result {
            Err(LookupError::Network(e)) => assert!(e.is_timeout()),
            other => panic!("expected a network timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_client_follows_requested_timeout() {
        let fetcher = HttpFetcher::new(&ClientConfig::new().with_timeout_millis(100)).unwrap();
        assert!(matches!(
            fetcher.client_for(Duration::from_millis(100)).unwrap(),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            fetcher.client_for(Duration::from_secs(3)).unwrap(),
            Cow::Owned(_)
        ));
    }

    #[test]
    fn test_longer_timeout_than_configured_is_honoured() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/patient");
            then.status(200)
                .body("{}")
                .delay(Duration::from_millis(500));
        });

        let fetcher = HttpFetcher::new(&ClientConfig::new().with_timeout_millis(100)).unwrap();
        let text = fetcher
            .fetch_text(&server.url("/patient"), Duration::from_secs(3))
            .unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_refused_connection_is_network_error() {
        let result = fetcher().fetch("http://127.0.0.1:1/", Duration::from_millis(500));
        assert!(matches!(result, Err(LookupError::Network(_))));
    }
}
