use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// HTTP client with exponential-backoff retries on transient failures.
    pub fn create_client() -> ClientWithMiddleware {
        Self::create_client_with(DEFAULT_MAX_RETRIES, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn create_client_with(max_retries: u32, timeout: Duration) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Appends percent-encoded query parameters to `base_url`.
///
/// reqwest-middleware does not expose `.query()`, so the query string is
/// built here.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return base_url.to_string();
    }

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k.as_ref()), encode_component(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base_url, separator, query_string)
}

fn encode_component(s: &str) -> String {
    s.bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            _ => format!("%{:02X}", byte),
        })
        .collect()
}
