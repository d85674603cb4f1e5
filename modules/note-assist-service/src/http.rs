use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Process-wide HTTP client for upstream provider calls.
///
/// No overall request timeout is set; an assist request runs until the
/// provider answers or the network stack gives up.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
});

pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
