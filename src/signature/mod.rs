mod timestamp;
mod utils;

pub use self::timestamp::{Clock, FixedClock, SystemClock, Timestamp};
use self::utils::hash;
use chrono::{DateTime, Utc};

// Rovi request signing, as documented by the provider:
// sig = md5_hex(apikey + shared secret + unix seconds)

pub(crate) fn calc_signature(apikey: &str, secret: &str, timestamp: &Timestamp) -> String {
    hash(&format!("{}{}{}", apikey, secret, timestamp.epoch_seconds()))
}

/// Computes the `sig` query parameter for `apikey`/`secret` at `timestamp`,
/// or at the current instant when no timestamp is given.
///
/// The result is 32 lowercase hex characters. It only depends on the whole
/// seconds of the instant, so every call within the same second yields the
/// same signature. Credentials are not validated here.
pub fn compute_signature(apikey: &str, secret: &str, timestamp: Option<DateTime<Utc>>) -> String {
    calc_signature(apikey, secret, &Timestamp::from(timestamp))
}
