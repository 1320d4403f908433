//! Request signing and URL composition for the Rovi song info API.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rovisig::{compose_song_info_url, LookupParameters, ResponseFormat};
//!
//! let url = compose_song_info_url(
//!     "k",
//!     "s",
//!     &LookupParameters::default().track("Imagine"),
//!     &ResponseFormat::default(),
//!     Some(Utc.timestamp_opt(0, 0).unwrap()),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     url,
//!     "http://api.rovicorp.com/data/v1/song/info?apikey=k&sig=f21239102d3423c9e582a2c14966256a\
//!      &country=US&language=en&format=json&track=Imagine"
//! );
//! ```

mod rovi;
mod signature;
mod types;

pub use rovi::{compose_song_info_url, QueryEscaping, RoviClient, SONG_INFO_ENDPOINT};
pub use signature::{compute_signature, Clock, FixedClock, SystemClock};
pub use types::{
    Credentials, LookupParameters, ResponseFormat, RoviError, RoviResult, API_KEY_VAR,
    SHARED_SECRET_VAR,
};
