//! Transport seam between the session and an FMD server.

use crate::config::Endpoint;
use crate::error::{ClientError, ClientResult};
use crate::types::{DataPackage, SignedCommand};
use async_trait::async_trait;

/// Placeholder the server expects in requests without a payload.
pub const UNUSED_DATA: &str = "unused";

/// Server operations used by [`Session`](crate::Session).
///
/// Implementors provide [`exchange`](Self::exchange), typically one HTTP
/// `PUT` (or `POST` for [`Endpoint::Command`]) of a JSON [`DataPackage`],
/// with the response body handed to [`decode_reply`]. The typed methods
/// build requests the way the server expects and parse the replies;
/// override them only if a server deviates.
#[async_trait]
pub trait ServerApi: Send + Sync {
    /// Sends `request` to `endpoint` and returns the reply.
    ///
    /// Most endpoints answer with a JSON `{"IDT", "Data"}` body.
    /// [`Endpoint::Picture`] answers with the bare base64 packet, which must
    /// land in `data` unparsed (see [`Endpoint::has_raw_reply`]). Endpoints
    /// with no reply body answer with an empty package.
    async fn exchange(&self, endpoint: Endpoint, request: DataPackage) -> ClientResult<DataPackage>;

    /// Base64 Argon2 salt registered for `device_id`.
    async fn login_salt(&self, device_id: &str) -> ClientResult<String> {
        let reply = self
            .exchange(Endpoint::Salt, DataPackage::new(device_id, UNUSED_DATA))
            .await?;
        Ok(reply.data)
    }

    /// Trades the login credential for an access token.
    async fn request_access(&self, device_id: &str, credential: &str) -> ClientResult<String> {
        let reply = self
            .exchange(Endpoint::RequestAccess, DataPackage::new(device_id, credential))
            .await?;
        if reply.data.is_empty() {
            return Err(ClientError::InvalidResponse("empty access token".into()));
        }
        Ok(reply.data)
    }

    /// Base64 wrapped private key blob.
    async fn wrapped_key(&self, access_token: &str) -> ClientResult<String> {
        let reply = self
            .exchange(Endpoint::Key, DataPackage::new(access_token, UNUSED_DATA))
            .await?;
        Ok(reply.data)
    }

    async fn location_count(&self, access_token: &str) -> ClientResult<u64> {
        let reply = self
            .exchange(Endpoint::LocationDataSize, DataPackage::new(access_token, UNUSED_DATA))
            .await?;
        parse_count("location", &reply.data)
    }

    /// Base64 hybrid packet holding the location at `index`.
    async fn location(&self, access_token: &str, index: u64) -> ClientResult<String> {
        let reply = self
            .exchange(Endpoint::Location, DataPackage::new(access_token, index.to_string()))
            .await?;
        Ok(reply.data)
    }

    async fn picture_count(&self, access_token: &str) -> ClientResult<u64> {
        let reply = self
            .exchange(Endpoint::PictureSize, DataPackage::new(access_token, ""))
            .await?;
        parse_count("picture", &reply.data)
    }

    /// Base64 hybrid packet holding the picture at `index`.
    async fn picture(&self, access_token: &str, index: u64) -> ClientResult<String> {
        let reply = self
            .exchange(Endpoint::Picture, DataPackage::new(access_token, index.to_string()))
            .await?;
        Ok(reply.data)
    }

    async fn post_command(&self, access_token: &str, command: &SignedCommand) -> ClientResult<()> {
        self.exchange(Endpoint::Command, command.to_package(access_token))
            .await?;
        Ok(())
    }
}

/// Turns a raw response body into the reply package for `endpoint`.
pub fn decode_reply(endpoint: Endpoint, body: &str) -> ClientResult<DataPackage> {
    if endpoint.has_raw_reply() {
        return Ok(DataPackage::new("", body.trim()));
    }
    if body.trim().is_empty() {
        return Ok(DataPackage::default());
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_count(what: &str, raw: &str) -> ClientResult<u64> {
    raw.trim().parse().map_err(|_| {
        ClientError::InvalidResponse(format!("{what} count is not a number: {raw:?}"))
    })
}
