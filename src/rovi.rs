use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    signature::{calc_signature, Clock, SystemClock, Timestamp},
    types::{Credentials, LookupParameters, ResponseFormat, RoviError, RoviResult},
};

pub const SONG_INFO_ENDPOINT: &str = "http://api.rovicorp.com/data/v1/song/info?";

/// Characters that change the meaning of a query string when embedded as-is.
fn needs_escaping(value: &str) -> bool {
    value.contains(['&', '=', '#', '?', ' ', '+', '%'])
}

/// How lookup and format values are written into the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryEscaping {
    /// Values are embedded exactly as given, like the provider's reference
    /// clients do. Callers must pass URL-safe values.
    #[default]
    Verbatim,
    /// Values are percent-encoded, RFC 3986 unreserved characters excepted.
    Percent,
}

struct SongInfoQuery<'a> {
    escaping: QueryEscaping,
    query: Vec<(&'static str, String)>,
    lookup: &'a LookupParameters,
    format: &'a ResponseFormat,
}

impl<'a> SongInfoQuery<'a> {
    fn add_query(&mut self, k: &'static str, v: String) {
        self.query.push((k, v));
    }

    fn value(&self, name: &str, value: &str) -> String {
        match self.escaping {
            QueryEscaping::Percent => urlencoding::encode(value).into_owned(),
            QueryEscaping::Verbatim => {
                if needs_escaping(value) {
                    warn!(field = name, "value is embedded unescaped into the query string");
                }
                value.to_string()
            }
        }
    }

    fn build(mut self, apikey: &str, sig: String) -> String {
        self.add_query("apikey", apikey.to_string());
        self.add_query("sig", sig);

        let (format, lookup) = (self.format, self.lookup);
        for (name, value) in format.fields() {
            let v = self.value(name, value);
            self.add_query(name, v);
        }
        for (name, value) in lookup.present() {
            let v = self.value(name, value);
            self.add_query(name, v);
        }

        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        format!("{}{}", SONG_INFO_ENDPOINT, pairs.join("&"))
    }
}

fn song_info_url(
    credentials: &Credentials,
    lookup: &LookupParameters,
    format: &ResponseFormat,
    timestamp: &Timestamp,
    escaping: QueryEscaping,
) -> RoviResult<String> {
    credentials.validate()?;
    if lookup.is_empty() {
        return Err(RoviError::InsufficientParameters);
    }

    let fields: Vec<&str> = lookup.present().map(|(name, _)| name).collect();
    debug!(?fields, "composing song info url");

    let sig = calc_signature(&credentials.apikey, &credentials.secret, timestamp);
    let query = SongInfoQuery {
        escaping,
        query: Vec::new(),
        lookup,
        format,
    };

    Ok(query.build(&credentials.apikey, sig))
}

/// Composes the song info request URL, signed for `timestamp` or for the
/// current instant when none is given.
///
/// Validation stops at the first failure: empty `apikey`, then empty
/// `secret`, then a lookup without any field set. Values are embedded
/// verbatim, without URL-encoding.
pub fn compose_song_info_url(
    apikey: &str,
    secret: &str,
    lookup: &LookupParameters,
    format: &ResponseFormat,
    timestamp: Option<DateTime<Utc>>,
) -> RoviResult<String> {
    song_info_url(
        &Credentials::new(apikey, secret),
        lookup,
        format,
        &Timestamp::from(timestamp),
        QueryEscaping::Verbatim,
    )
}

/// Signs requests for one set of credentials against an injectable clock.
#[derive(Debug, Clone)]
pub struct RoviClient {
    profile: Credentials,
    clock: Arc<dyn Clock>,
    escaping: QueryEscaping,
}

impl RoviClient {
    pub fn new(profile: &Credentials) -> RoviClient {
        RoviClient {
            profile: profile.clone(),
            clock: Arc::new(SystemClock),
            escaping: QueryEscaping::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> RoviClient {
        self.clock = clock;
        self
    }

    pub fn with_escaping(mut self, escaping: QueryEscaping) -> RoviClient {
        self.escaping = escaping;
        self
    }

    pub fn signature(&self) -> String {
        calc_signature(
            &self.profile.apikey,
            &self.profile.secret,
            &Timestamp::from_clock(self.clock.as_ref()),
        )
    }

    pub fn song_info_url(
        &self,
        lookup: &LookupParameters,
        format: &ResponseFormat,
    ) -> RoviResult<String> {
        song_info_url(
            &self.profile,
            lookup,
            format,
            &Timestamp::from_clock(self.clock.as_ref()),
            self.escaping,
        )
    }

    pub fn song_info_url_at(
        &self,
        lookup: &LookupParameters,
        format: &ResponseFormat,
        at: DateTime<Utc>,
    ) -> RoviResult<String> {
        song_info_url(&self.profile, lookup, format, &Timestamp::at(at), self.escaping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{compute_signature, FixedClock};
    use chrono::TimeZone;

    fn epoch(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn imagine_by_title() {
        let url = compose_song_info_url(
            "k",
            "s",
            &LookupParameters::default().track("Imagine"),
            &ResponseFormat::default(),
            Some(epoch(0)),
        )
        .unwrap();

        assert_eq!(
            url,
            "http://api.rovicorp.com/data/v1/song/info?apikey=k\
             &sig=f21239102d3423c9e582a2c14966256a\
             &country=US&language=en&format=json&track=Imagine"
        );
    }

    #[test]
    fn empty_apikey_wins_over_everything() {
        let err = compose_song_info_url(
            "",
            "",
            &LookupParameters::default(),
            &ResponseFormat::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, RoviError::MissingCredential("apikey"));
    }

    #[test]
    fn empty_secret() {
        let err = compose_song_info_url(
            "k",
            "",
            &LookupParameters::default().track("Imagine"),
            &ResponseFormat::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, RoviError::MissingCredential("secret"));
    }

    #[test]
    fn no_lookup_fields() {
        let err = compose_song_info_url(
            "k",
            "s",
            &LookupParameters::default(),
            &ResponseFormat::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, RoviError::InsufficientParameters);
        assert_eq!(err.to_string(), "at least one lookup parameter required");
    }

    #[test]
    fn all_lookup_fields_in_order() {
        let lookup = LookupParameters::default()
            .include("appearances,review")
            .amg_classical_track_id("Y000000001")
            .amg_pop_track_id("T000000002")
            .muze_id("12345")
            .isrc_id("GBAYE0601498")
            .track_id("MT0009472348")
            .track("Imagine");

        let url = compose_song_info_url("k", "s", &lookup, &ResponseFormat::default(), Some(epoch(0)))
            .unwrap();
        let (_, query) = url.split_once('?').unwrap();
        let names: Vec<&str> = query
            .split('&')
            .map(|pair| pair.split_once('=').unwrap().0)
            .collect();

        assert_eq!(
            names,
            [
                "apikey",
                "sig",
                "country",
                "language",
                "format",
                "track",
                "trackid",
                "isrcid",
                "muzeid",
                "amgpoptrackid",
                "amgclassicaltrackid",
                "include",
            ]
        );
    }

    #[test]
    fn detects_unsafe_values() {
        assert!(needs_escaping("Rock & Roll"));
        assert!(needs_escaping("a=b"));
        assert!(needs_escaping("C++"));
        assert!(needs_escaping("100%"));
        assert!(!needs_escaping("appearances,review"));
        assert!(!needs_escaping("MT0009472348"));
    }

    #[test]
    fn verbatim_values_are_not_encoded() {
        let url = compose_song_info_url(
            "k",
            "s",
            &LookupParameters::default().track("Rock & Roll"),
            &ResponseFormat::default(),
            Some(epoch(0)),
        )
        .unwrap();
        assert!(url.ends_with("&track=Rock & Roll"));
    }

    #[test]
    fn client_uses_its_clock() {
        let client = RoviClient::new(&Credentials::new("key123", "secretXYZ"))
            .with_clock(Arc::new(FixedClock(epoch(10))));

        assert_eq!(client.signature(), "dfe9558d1b8266d3dc9fac36cb5145c8");

        let url = client
            .song_info_url(
                &LookupParameters::default().track_id("MT0009472348"),
                &ResponseFormat::default(),
            )
            .unwrap();
        assert!(url.contains("&sig=dfe9558d1b8266d3dc9fac36cb5145c8&"));
    }

    #[test]
    fn client_explicit_instant_overrides_clock() {
        let client = RoviClient::new(&Credentials::new("k", "s"))
            .with_clock(Arc::new(FixedClock(epoch(10))));
        let url = client
            .song_info_url_at(
                &LookupParameters::default().track("Imagine"),
                &ResponseFormat::default(),
                epoch(0),
            )
            .unwrap();
        assert!(url.contains(&format!("&sig={}&", compute_signature("k", "s", Some(epoch(0))))));
    }

    #[test]
    fn client_validates_credentials() {
        let client = RoviClient::new(&Credentials::new("", "s"));
        assert_eq!(
            client.song_info_url(
                &LookupParameters::default().track("Imagine"),
                &ResponseFormat::default()
            ),
            Err(RoviError::MissingCredential("apikey"))
        );
    }

    #[test]
    fn percent_escaping_applies_to_values_only() {
        let client = RoviClient::new(&Credentials::new("k", "s"))
            .with_clock(Arc::new(FixedClock(epoch(0))))
            .with_escaping(QueryEscaping::Percent);
        let url = client
            .song_info_url(
                &LookupParameters::default()
                    .track("Rock & Roll")
                    .includes(["moods", "styles"]),
                &ResponseFormat::default(),
            )
            .unwrap();

        assert_eq!(
            url,
            "http://api.rovicorp.com/data/v1/song/info?apikey=k\
             &sig=f21239102d3423c9e582a2c14966256a\
             &country=US&language=en&format=json\
             &track=Rock%20%26%20Roll&include=moods%2Cstyles"
        );
    }
}
