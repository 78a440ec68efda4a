//! Client configuration.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// Public server used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "https://fmd.nulide.de:1008/";

/// Server resources, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Salt,
    RequestAccess,
    Key,
    LocationDataSize,
    Location,
    Command,
    PictureSize,
    Picture,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Salt => "salt",
            Self::RequestAccess => "requestAccess",
            Self::Key => "key",
            Self::LocationDataSize => "locationDataSize",
            Self::Location => "location",
            Self::Command => "command",
            Self::PictureSize => "pictureSize",
            Self::Picture => "picture",
        }
    }

    /// True when the server answers with a bare string body instead of a
    /// JSON [`DataPackage`](crate::DataPackage).
    pub const fn has_raw_reply(self) -> bool {
        matches!(self, Self::Picture)
    }
}

/// Connection settings for one device account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the FMD server.
    pub server_url: String,

    /// Device id the account was registered under.
    pub device_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            device_id: String::new(),
        }
    }
}

impl ClientConfig {
    /// Config for `device_id` on the default server.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Rejects an empty device id and non-HTTP(S) server URLs.
    pub fn validate(&self) -> ClientResult<()> {
        if self.device_id.trim().is_empty() {
            return Err(ClientError::Config("device id is empty".into()));
        }

        let host = self
            .server_url
            .strip_prefix("https://")
            .or_else(|| self.server_url.strip_prefix("http://"))
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "server url must start with http:// or https://, got {:?}",
                    self.server_url
                ))
            })?;
        if host.trim_matches('/').is_empty() {
            return Err(ClientError::Config("server url has no host".into()));
        }
        Ok(())
    }

    /// Full URL of `endpoint`, with exactly one slash between base and path.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), endpoint.path())
    }
}
