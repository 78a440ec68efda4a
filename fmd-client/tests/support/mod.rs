//! In-memory FMD server for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fmd_client::{
    ClientConfig, ClientError, ClientResult, DataPackage, Endpoint, ServerApi, decode_reply,
};
use std::sync::Mutex;

pub const DEVICE_ID: &str = "device-42";
pub const PASSWORD: &str = "hunter2";
pub const ACCESS_TOKEN: &str = "access-token-1";

/// Sixteen zero bytes.
pub const LOGIN_SALT: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

/// Login credential for `PASSWORD` over `LOGIN_SALT`.
pub const LOGIN_CREDENTIAL: &str = "$argon2id$v=19$m=131072,t=1,p=4$AAAAAAAAAAAAAAAAAAAAAA$IeZUpet8m6D2d8xpUQdHaMxHOZwALVzpwgOFyf0vEQ8";

pub const WRAPPED_KEY: &str =
    include_str!("../../../fmd-crypto/tests/fixtures/wrapped_key_hunter2.b64");
pub const LOCATION_PACKET: &str =
    include_str!("../../../fmd-crypto/tests/fixtures/location_packet.b64");
pub const PICTURE_PACKET: &str =
    include_str!("../../../fmd-crypto/tests/fixtures/picture_packet.b64");
pub const PICTURE_BYTES: [u8; 16] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
];

pub fn config() -> ClientConfig {
    ClientConfig::new(DEVICE_ID).with_server_url("https://fmd.test/")
}

/// Server state for one device account.
pub struct MockServer {
    pub locations: Vec<String>,
    pub pictures: Vec<String>,
    /// Accept any login credential, to reach the key unwrap with a bad password.
    pub accept_any_credential: bool,
    /// Overrides the location count reply verbatim.
    pub location_count_reply: Option<String>,
    pub requests: Mutex<Vec<(Endpoint, DataPackage)>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self {
            locations: vec![LOCATION_PACKET.trim().to_string()],
            pictures: vec![PICTURE_PACKET.trim().to_string()],
            accept_any_credential: false,
            location_count_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.requests.lock().unwrap().iter().map(|(e, _)| *e).collect()
    }

    pub fn last_request(&self, endpoint: Endpoint) -> Option<DataPackage> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, p)| p.clone())
    }

    fn authorize(&self, request: &DataPackage) -> ClientResult<()> {
        if request.identifier == ACCESS_TOKEN {
            Ok(())
        } else {
            Err(ClientError::Transport("401 unauthorized".into()))
        }
    }

    fn indexed(items: &[String], request: &DataPackage) -> ClientResult<String> {
        let index: usize = request
            .data
            .parse()
            .map_err(|_| ClientError::Transport("400 bad index".into()))?;
        items
            .get(index)
            .cloned()
            .ok_or_else(|| ClientError::Transport("404 not found".into()))
    }

    /// Response body exactly as the real server writes it.
    pub fn respond(&self, endpoint: Endpoint, request: &DataPackage) -> ClientResult<String> {
        let package = |identifier: &str, data: String| -> ClientResult<String> {
            Ok(serde_json::to_string(&DataPackage::new(identifier, data))?)
        };

        match endpoint {
            Endpoint::Salt => {
                if request.identifier != DEVICE_ID {
                    return Err(ClientError::Transport("404 unknown device".into()));
                }
                package(DEVICE_ID, LOGIN_SALT.into())
            }
            Endpoint::RequestAccess => {
                if !self.accept_any_credential && request.data != LOGIN_CREDENTIAL {
                    return Err(ClientError::Transport("403 access denied".into()));
                }
                package(DEVICE_ID, ACCESS_TOKEN.into())
            }
            Endpoint::Key => {
                self.authorize(request)?;
                package(ACCESS_TOKEN, WRAPPED_KEY.into())
            }
            Endpoint::LocationDataSize => {
                self.authorize(request)?;
                let count = self
                    .location_count_reply
                    .clone()
                    .unwrap_or_else(|| self.locations.len().to_string());
                package(ACCESS_TOKEN, count)
            }
            Endpoint::Location => {
                self.authorize(request)?;
                package(ACCESS_TOKEN, Self::indexed(&self.locations, request)?)
            }
            Endpoint::PictureSize => {
                self.authorize(request)?;
                package(ACCESS_TOKEN, self.pictures.len().to_string())
            }
            // Bare packet, no JSON envelope.
            Endpoint::Picture => {
                self.authorize(request)?;
                Self::indexed(&self.pictures, request)
            }
            Endpoint::Command => {
                self.authorize(request)?;
                Ok(String::new())
            }
        }
    }
}

#[async_trait]
impl ServerApi for MockServer {
    async fn exchange(&self, endpoint: Endpoint, request: DataPackage) -> ClientResult<DataPackage> {
        self.requests.lock().unwrap().push((endpoint, request.clone()));
        let body = self.respond(endpoint, &request)?;
        decode_reply(endpoint, &body)
    }
}
