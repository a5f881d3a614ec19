//! Quote of the hour
//!
//! A quote is fetched from a remote API and cached in storage together with
//! the time it was fetched. A cached quote younger than one hour is served
//! as-is; anything older (or missing) triggers a new fetch. A failed fetch
//! shows a fixed fallback quote and leaves the cache stale, so the next
//! scheduled check retries.

use crate::storage::{Storage, QUOTE_KEY};
use crate::types::Quote;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache lifetime: one hour
pub const CACHE_TTL_MS: i64 = 3_600_000;

pub const DEFAULT_ENDPOINT: &str = "https://zenquotes.io/api/random";

const FALLBACK_TEXT: &str = "Time is what we want most but use worst.";
const FALLBACK_AUTHOR: &str = "William Penn";

/// Quote shown when fetching fails
pub fn fallback_quote() -> Quote {
    Quote::new(FALLBACK_TEXT, FALLBACK_AUTHOR)
}

/// Quote record as persisted under `cachedQuote`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub quote: String,
    pub author: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl CachedQuote {
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < CACHE_TTL_MS
    }

    pub fn to_quote(&self) -> Quote {
        Quote::new(self.quote.clone(), self.author.clone())
    }
}

/// Cache validity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Fresh(CachedQuote),
    /// No entry, an undecodable entry, or one older than the TTL
    Stale,
}

/// Where the displayed quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOrigin {
    Cache,
    Network,
    Fallback,
}

impl QuoteOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteOrigin::Cache => "cached",
            QuoteOrigin::Network => "fresh",
            QuoteOrigin::Fallback => "offline",
        }
    }
}

/// Result of a quote check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteUpdate {
    pub quote: Quote,
    pub origin: QuoteOrigin,
}

/// Something that can produce a random quote
pub trait QuoteSource: Send + Sync {
    fn fetch(&self) -> Result<Quote>;
}

/// zenquotes.io-compatible HTTP source
pub struct ZenQuotes {
    endpoint: String,
    agent: ureq::Agent,
}

impl ZenQuotes {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("daybar/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build();

        Self { endpoint: endpoint.into(), agent }
    }
}

impl QuoteSource for ZenQuotes {
    fn fetch(&self) -> Result<Quote> {
        debug!(url = %self.endpoint, "requesting quote");

        let body = self
            .agent
            .get(&self.endpoint)
            .call()
            .with_context(|| format!("Request to {} failed", self.endpoint))?
            .into_string()
            .context("Failed to read quote response")?;

        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

/// Parse a `[{"q": ..., "a": ...}, ...]` body, taking the first element
pub fn parse_response(body: &str) -> Result<Quote> {
    let entries: Vec<ZenQuote> =
        serde_json::from_str(body).context("Malformed quote response")?;

    match entries.into_iter().next() {
        Some(entry) => Ok(Quote::new(entry.q, entry.a)),
        None => bail!("Quote response contained no quotes"),
    }
}

/// Read the cache and decide whether it is still usable
pub fn lookup(storage: &dyn Storage, now_ms: i64) -> CacheState {
    match read_cached(storage) {
        Some(cached) if cached.is_fresh(now_ms) => CacheState::Fresh(cached),
        _ => CacheState::Stale,
    }
}

/// Turn a fetch result into the quote to display, caching it on success
pub fn settle(storage: &mut dyn Storage, fetched: Result<Quote>, now_ms: i64) -> QuoteUpdate {
    match fetched {
        Ok(quote) => {
            if let Err(e) = store(storage, &quote, now_ms) {
                warn!(error = %format!("{:#}", e), "failed to cache quote");
            }
            info!(author = %quote.author, "fetched new quote");
            QuoteUpdate { quote, origin: QuoteOrigin::Network }
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "error fetching quote, showing fallback");
            QuoteUpdate { quote: fallback_quote(), origin: QuoteOrigin::Fallback }
        }
    }
}

/// Serve from cache or fetch synchronously
pub fn refresh(storage: &mut dyn Storage, source: &dyn QuoteSource, now_ms: i64) -> QuoteUpdate {
    match lookup(storage, now_ms) {
        CacheState::Fresh(cached) => QuoteUpdate {
            quote: cached.to_quote(),
            origin: QuoteOrigin::Cache,
        },
        CacheState::Stale => settle(storage, source.fetch(), now_ms),
    }
}

/// Persist a freshly fetched quote. Timestamps never move backwards.
pub fn store(storage: &mut dyn Storage, quote: &Quote, now_ms: i64) -> Result<()> {
    let timestamp = match read_cached(storage) {
        Some(previous) => now_ms.max(previous.timestamp),
        None => now_ms,
    };

    let record = CachedQuote {
        quote: quote.text.clone(),
        author: quote.author.clone(),
        timestamp,
    };

    let encoded = serde_json::to_string(&record).context("Failed to serialize quote")?;
    storage.set(QUOTE_KEY, &encoded)
}

fn read_cached(storage: &dyn Storage) -> Option<CachedQuote> {
    let raw = storage.get(QUOTE_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(cached) => Some(cached),
        Err(e) => {
            warn!(error = %e, "ignoring undecodable cached quote");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    const NOW: i64 = 1_704_067_200_000;

    /// Source that counts calls and returns a canned result
    struct StubSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubSource {
        fn ok() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl QuoteSource for StubSource {
        fn fetch(&self) -> Result<Quote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                bail!("network unreachable");
            }
            Ok(Quote::new("Well begun is half done.", "Aristotle"))
        }
    }

    fn seed(storage: &mut MemoryStorage, timestamp: i64) {
        let record = CachedQuote {
            quote: "Cached words.".into(),
            author: "Someone".into(),
            timestamp,
        };
        storage.set(QUOTE_KEY, &serde_json::to_string(&record).unwrap()).unwrap();
    }

    /// Answer a single HTTP request with a canned response
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}/api/random", addr)
    }

    #[test]
    fn test_zenquotes_fetches_over_http() {
        let url = serve_once("200 OK", r#"[{"q":"Do it now.","a":"Anonymous","h":""}]"#);
        let source = ZenQuotes::new(url, Duration::from_secs(5));

        let quote = source.fetch().unwrap();
        assert_eq!(quote, Quote::new("Do it now.", "Anonymous"));
    }

    #[test]
    fn test_zenquotes_server_error_falls_back() {
        let url = serve_once("503 Service Unavailable", "[]");
        let source = ZenQuotes::new(url, Duration::from_secs(5));
        let mut storage = MemoryStorage::new();

        let update = refresh(&mut storage, &source, NOW);
        assert_eq!(update.origin, QuoteOrigin::Fallback);
        assert_eq!(storage.get(QUOTE_KEY), None);
    }

    #[test]
    fn test_zenquotes_malformed_body_is_an_error() {
        let url = serve_once("200 OK", r#"{"error":"Too many requests"}"#);
        let source = ZenQuotes::new(url, Duration::from_secs(5));

        assert!(source.fetch().is_err());
    }

    #[test]
    fn test_freshness_boundary() {
        let cached = CachedQuote { quote: String::new(), author: String::new(), timestamp: NOW };
        assert!(cached.is_fresh(NOW));
        assert!(cached.is_fresh(NOW + CACHE_TTL_MS - 1));
        assert!(!cached.is_fresh(NOW + CACHE_TTL_MS));
    }

    #[test]
    fn test_lookup_absent_is_stale() {
        let storage = MemoryStorage::new();
        assert_eq!(lookup(&storage, NOW), CacheState::Stale);
    }

    #[test]
    fn test_lookup_garbage_is_stale() {
        let mut storage = MemoryStorage::new();
        storage.set(QUOTE_KEY, "{not json").unwrap();
        assert_eq!(lookup(&storage, NOW), CacheState::Stale);
    }

    #[test]
    fn test_fresh_cache_skips_network() {
        let mut storage = MemoryStorage::new();
        seed(&mut storage, NOW - 30 * 60 * 1000);
        let source = StubSource::ok();

        let update = refresh(&mut storage, &source, NOW);
        assert_eq!(update.origin, QuoteOrigin::Cache);
        assert_eq!(update.quote.text_line(), "\"Cached words.\"");
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_stale_cache_fetches_and_persists() {
        let mut storage = MemoryStorage::new();
        seed(&mut storage, NOW - 2 * CACHE_TTL_MS);
        let source = StubSource::ok();

        let update = refresh(&mut storage, &source, NOW);
        assert_eq!(update.origin, QuoteOrigin::Network);
        assert_eq!(update.quote.author, "Aristotle");
        assert_eq!(source.calls(), 1);

        match lookup(&storage, NOW) {
            CacheState::Fresh(cached) => {
                assert_eq!(cached.author, "Aristotle");
                assert_eq!(cached.timestamp, NOW);
            }
            CacheState::Stale => panic!("quote should have been cached"),
        }
    }

    #[test]
    fn test_fetch_failure_shows_fallback_without_caching() {
        let mut storage = MemoryStorage::new();
        let source = StubSource::failing();

        let update = refresh(&mut storage, &source, NOW);
        assert_eq!(update.origin, QuoteOrigin::Fallback);
        assert_eq!(update.quote.text_line(), "\"Time is what we want most but use worst.\"");
        assert_eq!(update.quote.author_line(), "— William Penn");
        assert_eq!(storage.get(QUOTE_KEY), None);

        // still stale, so the next check tries again
        refresh(&mut storage, &source, NOW + 1);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_store_never_moves_timestamp_back() {
        let mut storage = MemoryStorage::new();
        seed(&mut storage, NOW);

        store(&mut storage, &Quote::new("later", "me"), NOW - 5_000).unwrap();
        match lookup(&storage, NOW) {
            CacheState::Fresh(cached) => assert_eq!(cached.timestamp, NOW),
            CacheState::Stale => panic!("quote should be fresh"),
        }
    }

    #[test]
    fn test_parse_response() {
        let body = r#"[{"q":"Act as if.","a":"William James","h":"<blockquote/>"}]"#;
        let quote = parse_response(body).unwrap();
        assert_eq!(quote, Quote::new("Act as if.", "William James"));
    }

    #[test]
    fn test_parse_response_rejects_malformed() {
        assert!(parse_response("[]").is_err());
        assert!(parse_response(r#"{"q":"x","a":"y"}"#).is_err());
        assert!(parse_response("<html>rate limited</html>").is_err());
    }
}
