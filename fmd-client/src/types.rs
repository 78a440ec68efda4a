//! Wire and domain types exchanged with the server.

use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request and response body of every endpoint.
///
/// `identifier` carries the device id before login and the access token
/// after it. The signature fields are only set on command requests.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPackage {
    #[serde(rename = "IDT")]
    pub identifier: String,

    #[serde(rename = "Data")]
    pub data: String,

    #[serde(rename = "UnixTime", default, skip_serializing_if = "Option::is_none")]
    pub unix_time: Option<u64>,

    #[serde(rename = "CmdSig", default, skip_serializing_if = "Option::is_none")]
    pub command_signature: Option<String>,
}

impl DataPackage {
    pub fn new(identifier: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            data: data.into(),
            unix_time: None,
            command_signature: None,
        }
    }
}

// Identifier and data may hold tokens or credentials.
impl fmt::Debug for DataPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPackage")
            .field("identifier", &format_args!("<{} bytes>", self.identifier.len()))
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("unix_time", &self.unix_time)
            .field("command_signature", &self.command_signature.is_some())
            .finish()
    }
}

/// Source of a location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationProvider {
    Fused,
    Gps,
    Network,
    OpenCell,
}

/// A decrypted location record as uploaded by the device.
///
/// Coordinates and battery level arrive as strings and are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub provider: LocationProvider,

    /// Capture time in Unix milliseconds.
    pub date: i64,

    /// Battery level in percent.
    pub bat: String,

    pub lon: String,
    pub lat: String,

    /// Capture time as formatted by the device.
    pub time: String,
}

impl Location {
    pub fn latitude(&self) -> Option<f64> {
        self.lat.trim().parse().ok()
    }

    pub fn longitude(&self) -> Option<f64> {
        self.lon.trim().parse().ok()
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.bat.trim().parse().ok()
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }
}

/// Which stored location to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationIndex {
    /// The most recent upload.
    #[default]
    Latest,
    /// Zero-based position, oldest first.
    At(u64),
}

/// Commands the device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Locate,
    LocateGps,
    LocateCell,
    LocateLast,
    Ring,
    Lock,
    CameraFront,
    CameraBack,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Self::Locate,
        Self::LocateGps,
        Self::LocateCell,
        Self::LocateLast,
        Self::Ring,
        Self::Lock,
        Self::CameraFront,
        Self::CameraBack,
    ];

    /// The string the device matches on.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locate => "locate",
            Self::LocateGps => "locate gps",
            Self::LocateCell => "locate cell",
            Self::LocateLast => "locate last",
            Self::Ring => "ring",
            Self::Lock => "lock",
            Self::CameraFront => "camera front",
            Self::CameraBack => "camera back",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ClientError::UnknownCommand(s.to_string()))
    }
}

/// A command bound to its signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCommand {
    pub command: String,
    pub unix_time_millis: u64,
    pub signature_base64: String,
}

impl SignedCommand {
    /// Request body for the command endpoint.
    pub fn to_package(&self, access_token: &str) -> DataPackage {
        DataPackage {
            identifier: access_token.to_string(),
            data: self.command.clone(),
            unix_time: Some(self.unix_time_millis),
            command_signature: Some(self.signature_base64.clone()),
        }
    }
}
