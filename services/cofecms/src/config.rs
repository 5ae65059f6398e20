use std::fmt::{Debug, Formatter};

use cofecms_core::{utils::Redact, Context, Error, Result};
use log::warn;

use super::constants::*;
use super::credential::Credential;

/// Config carries all the configuration for the CMS client.
#[derive(Clone, Default)]
pub struct Config {
    /// `api_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COFECMS_API_ID`]
    pub api_id: Option<String>,
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COFECMS_API_KEY`]
    pub api_key: Option<String>,
    /// Default `diocese_id` for calls that don't pass one, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COFECMS_DIOCESE_ID`]
    pub diocese_id: Option<u64>,
    /// Base url of the API, defaults to [`DEFAULT_ENDPOINT`]. Loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COFECMS_ENDPOINT`]
    pub endpoint: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set api_id
    pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
        self.api_id = Some(api_id.into());
        self
    }

    /// Set api_key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set diocese_id
    pub fn with_diocese_id(mut self, diocese_id: u64) -> Self {
        self.diocese_id = Some(diocese_id);
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load config from env.
    ///
    /// Values already set on this config are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(COFECMS_API_ID) {
            self.api_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(COFECMS_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(COFECMS_DIOCESE_ID) {
            match v.trim().parse::<u64>() {
                Ok(id) => {
                    self.diocese_id.get_or_insert(id);
                }
                Err(_) => warn!("{COFECMS_DIOCESE_ID} is not an integer, ignored: {v}"),
            }
        }
        if let Some(v) = ctx.env_var(COFECMS_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }

        self
    }

    /// Build the credential out of this config.
    pub fn credential(&self) -> Result<Credential> {
        match (&self.api_id, &self.api_key) {
            (Some(id), Some(key)) => Ok(Credential::new(id, key)),
            (None, _) => Err(Error::config_invalid("api_id is not set")),
            (_, None) => Err(Error::config_invalid("api_key is not set")),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_id", &self.api_id.as_ref().map(Redact::from))
            .field("api_key", &self.api_key.as_ref().map(Redact::from))
            .field("diocese_id", &self.diocese_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
