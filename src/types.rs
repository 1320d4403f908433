use serde::{Deserialize, Serialize};
use std::{env, fmt};
use thiserror::Error;

pub const API_KEY_VAR: &str = "ROVI_API_KEY";
pub const SHARED_SECRET_VAR: &str = "ROVI_SHARED_SECRET";

pub type RoviResult<T> = Result<T, RoviError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoviError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("at least one lookup parameter required")]
    InsufficientParameters,

    #[error("can't find env variable: {0}")]
    MissingEnvVar(String),
}

/// API key and shared secret issued for a Rovi application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub apikey: String,
    pub secret: String,
}

fn env_var(key: &str) -> RoviResult<String> {
    env::var(key).map_err(|_| RoviError::MissingEnvVar(key.to_string()))
}

impl Credentials {
    pub fn new(apikey: impl Into<String>, secret: impl Into<String>) -> Self {
        Credentials {
            apikey: apikey.into(),
            secret: secret.into(),
        }
    }

    pub fn from_env() -> RoviResult<Credentials> {
        let apikey = env_var(API_KEY_VAR)?;
        let secret = env_var(SHARED_SECRET_VAR)?;

        Ok(Credentials { apikey, secret })
    }

    /// Fails on the first empty field, apikey before secret.
    pub fn validate(&self) -> RoviResult<()> {
        if self.apikey.is_empty() {
            return Err(RoviError::MissingCredential("apikey"));
        }
        if self.secret.is_empty() {
            return Err(RoviError::MissingCredential("secret"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("apikey", &self.apikey)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Alternative ways of identifying a song. The song info endpoint needs at
/// least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupParameters {
    /// Song title.
    pub track: Option<String>,
    /// Rovi music ID, `MT` followed by ten digits, e.g. `MT0009472348`.
    pub track_id: Option<String>,
    /// International Standard Recording Code.
    pub isrc_id: Option<String>,
    /// Legacy Muze database ID.
    pub muze_id: Option<String>,
    /// AMG ID of a track on a popular music album (`T` + 9 digits).
    pub amg_pop_track_id: Option<String>,
    /// AMG ID of a track on a classical album (`Y` + 9 digits).
    pub amg_classical_track_id: Option<String>,
    /// Other song requests to bundle, comma separated: `appearances,review,moods`.
    pub include: Option<String>,
}

impl LookupParameters {
    pub fn track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    pub fn isrc_id(mut self, isrc_id: impl Into<String>) -> Self {
        self.isrc_id = Some(isrc_id.into());
        self
    }

    pub fn muze_id(mut self, muze_id: impl Into<String>) -> Self {
        self.muze_id = Some(muze_id.into());
        self
    }

    pub fn amg_pop_track_id(mut self, id: impl Into<String>) -> Self {
        self.amg_pop_track_id = Some(id.into());
        self
    }

    pub fn amg_classical_track_id(mut self, id: impl Into<String>) -> Self {
        self.amg_classical_track_id = Some(id.into());
        self
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    pub fn includes<I, S>(self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = includes
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.include(joined)
    }

    /// Query parameter name and value of every field, in the order the
    /// provider expects them. Absent fields are `None`.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("track", self.track.as_deref()),
            ("trackid", self.track_id.as_deref()),
            ("isrcid", self.isrc_id.as_deref()),
            ("muzeid", self.muze_id.as_deref()),
            ("amgpoptrackid", self.amg_pop_track_id.as_deref()),
            ("amgclassicaltrackid", self.amg_classical_track_id.as_deref()),
            ("include", self.include.as_deref()),
        ]
    }

    pub fn present(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

/// Country, language and output format of the response. Always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseFormat {
    /// Only `US` is served by the current API release.
    pub country: String,
    /// Only `en` is served by the song info request.
    pub language: String,
    /// `json` or `xml`.
    pub format: String,
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat {
            country: "US".to_string(),
            language: "en".to_string(),
            format: "json".to_string(),
        }
    }
}

impl ResponseFormat {
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("country", self.country.as_str()),
            ("language", self.language.as_str()),
            ("format", self.format.as_str()),
        ]
    }
}
