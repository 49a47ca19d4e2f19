use std::time::Duration;

use rand::Rng;

/// HTTP statuses a source may answer with while it is briefly unavailable or throttling.
pub const TRANSIENT_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// How long the coordinator waits before fetching a payload again.
#[derive(Clone, Debug)]
pub enum Backoff {
    /// The same pause before every retry.
    Fixed(Duration),
    /// `base * factor^attempt`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        /// Scale each pause by a random factor in `0.5..1.5` (still capped at `max`), so that
        /// updates failing together do not retry in lockstep.
        jitter: bool,
    },
}

impl Backoff {
    /// The delay to wait before retry number `attempt` (zero-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
                let raw = base.as_secs_f64() * factor.powi(exp);
                let mut secs = raw.min(max.as_secs_f64());
                if *jitter {
                    secs *= rand::thread_rng().gen_range(0.5..1.5);
                }
                Duration::from_secs_f64(secs.clamp(0.0, max.as_secs_f64()))
            }
        }
    }
}

/// Retry policy for the payload fetch step of an update.
///
/// Only the fetch is retried; normalization, validation and store writes run once. The
/// default allows four retries with jittered exponential backoff from 200ms up to 3s, and
/// retries [`TRANSIENT_STATUSES`], timeouts and connection failures.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// When `false`, every fetch gets exactly one attempt.
    pub enabled: bool,
    /// Retries after the first attempt, so a payload is requested at most `max_retries + 1`
    /// times per update.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Source response statuses worth another attempt.
    pub retry_on_status: Vec<u16>,
    /// Retry when a fetch exceeds the coordinator's fetch timeout or the HTTP client's timeout.
    pub retry_on_timeout: bool,
    /// Retry when the source cannot be connected to at all.
    pub retry_on_connect: bool,
}

impl RetryConfig {
    /// A policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(3),
            jitter: true,
        };
        Self {
            enabled: true,
            max_retries: 4,
            backoff,
            retry_on_status: TRANSIENT_STATUSES.to_vec(),
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}
