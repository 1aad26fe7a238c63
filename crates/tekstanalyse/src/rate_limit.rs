use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

const DROP_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Token-bucket rate limiting keyed by the proxy-reported client address.
/// Requests without a client header pass through unlimited (direct local
/// traffic and the test harness).
#[derive(Clone)]
pub struct RateLimitLayer {
    rate_per_sec: f64,
    burst: f64,
}

impl RateLimitLayer {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        Self {
            rate_per_sec: f64::from(rate_per_sec),
            burst: f64::from(burst),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit {
            inner,
            buckets: Arc::new(DashMap::new()),
            drops: Arc::new(DropCounter::new()),
            rate_per_sec: self.rate_per_sec,
            burst: self.burst,
        }
    }
}

#[derive(Clone)]
pub struct RateLimit<S> {
    inner: S,
    buckets: Arc<DashMap<String, Bucket>>,
    drops: Arc<DropCounter>,
    rate_per_sec: f64,
    burst: f64,
}

struct Bucket {
    tokens: f64,
    refilled: Instant,
}

impl<S, ReqBody> Service<axum::http::Request<ReqBody>> for RateLimit<S>
where
    S: Service<axum::http::Request<ReqBody>, Response = axum::http::Response<axum::body::Body>>
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: axum::http::Request<ReqBody>) -> Self::Future {
        if let Some(client) = client_addr(&req)
            && !self.take_token(&client)
        {
            self.drops.record();
            return Box::pin(async move {
                Ok(axum::http::Response::builder()
                    .status(axum::http::StatusCode::TOO_MANY_REQUESTS)
                    .body(axum::body::Body::from("rate limited"))
                    .unwrap())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(fut)
    }
}

impl<S> RateLimit<S> {
    fn take_token(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| Bucket {
                tokens: self.burst,
                refilled: now,
            });
        let elapsed = now.saturating_duration_since(bucket.refilled).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
        bucket.refilled = now;
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

fn client_addr<B>(req: &axum::http::Request<B>) -> Option<String> {
    let forwarded = req.headers().get("x-forwarded-for")?.to_str().ok()?;
    // First hop in the list is the original client.
    let client = forwarded.split(',').next()?.trim();
    if client.is_empty() {
        None
    } else {
        Some(client.to_string())
    }
}

/// Counts rejected requests and logs the total at most once per interval.
struct DropCounter {
    dropped: AtomicU64,
    window_start: std::sync::Mutex<Instant>,
}

impl DropCounter {
    fn new() -> Self {
        Self {
            dropped: AtomicU64::new(0),
            window_start: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn record(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        let mut start = self.window_start.lock().unwrap();
        if now.saturating_duration_since(*start) >= DROP_LOG_INTERVAL {
            let dropped = self.dropped.swap(0, Ordering::Relaxed);
            if dropped > 0 {
                warn!("rate limiter rejected {dropped} requests in the last minute");
            }
            *start = now;
        }
    }
}
