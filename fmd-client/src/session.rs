//! Authenticated session against one device account.
//!
//! Login runs two Argon2id derivations (128 MiB each). Both run on tokio's
//! blocking pool so the async executor is never stalled.

use crate::api::ServerApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{Command, Location, LocationIndex, SignedCommand};
use chrono::Utc;
use fmd_crypto::{
    CryptoResult, SessionKeypair, decode_base64, decrypt_packet_to_string, hash_password_for_login,
    sign_command, unwrap_private_key,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// A logged-in session: the server access token plus the unwrapped keypair.
///
/// The password and the wrapped key blob are dropped once login completes.
pub struct Session {
    access_token: String,
    keypair: SessionKeypair,
}

impl Session {
    /// Logs in to the server and unwraps the account's private key.
    pub async fn login<A>(api: &A, config: &ClientConfig, password: &str) -> ClientResult<Self>
    where
        A: ServerApi + ?Sized,
    {
        config.validate()?;
        let device_id = config.device_id.as_str();
        let password = Arc::new(Zeroizing::new(password.to_owned()));

        let salt = api.login_salt(device_id).await?;
        let credential = {
            let password = Arc::clone(&password);
            run_blocking(move || hash_password_for_login(&password, &salt)).await?
        };
        debug!("login credential derived for device {device_id}");

        let access_token = api.request_access(device_id, &credential).await?;
        let wrapped_key = api.wrapped_key(&access_token).await?;
        let keypair = run_blocking(move || unwrap_private_key(&password, &wrapped_key)).await?;

        info!("logged in to device {device_id}");
        Ok(Self {
            access_token,
            keypair,
        })
    }

    /// Token sent as `IDT` on authenticated requests.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn keypair(&self) -> &SessionKeypair {
        &self.keypair
    }

    /// Fetches and decrypts a stored location.
    ///
    /// [`LocationIndex::Latest`] asks the server for the count first and
    /// fails with [`ClientError::NoLocations`] when nothing is stored.
    pub async fn locate<A>(&self, api: &A, index: LocationIndex) -> ClientResult<Location>
    where
        A: ServerApi + ?Sized,
    {
        let index = match index {
            LocationIndex::At(i) => i,
            LocationIndex::Latest => {
                let count = api.location_count(&self.access_token).await?;
                count.checked_sub(1).ok_or(ClientError::NoLocations)?
            }
        };

        let packet = api.location(&self.access_token, index).await?;
        let json = decrypt_packet_to_string(self.keypair.decrypt_key(), &packet)?;
        let location = serde_json::from_str(&json)?;
        debug!("decrypted location {index}");
        Ok(location)
    }

    pub async fn picture_count<A>(&self, api: &A) -> ClientResult<u64>
    where
        A: ServerApi + ?Sized,
    {
        api.picture_count(&self.access_token).await
    }

    /// Fetches and decrypts the picture at `index`, returning raw image bytes.
    pub async fn picture<A>(&self, api: &A, index: u64) -> ClientResult<Vec<u8>>
    where
        A: ServerApi + ?Sized,
    {
        let packet = api.picture(&self.access_token, index).await?;
        let encoded = decrypt_packet_to_string(self.keypair.decrypt_key(), &packet)?;
        let image = decode_base64(&encoded).map_err(|e| {
            ClientError::InvalidResponse(format!("picture {index} is not base64: {e}"))
        })?;
        debug!("decrypted picture {index} ({} bytes)", image.len());
        Ok(image)
    }

    /// Signs `command` with the current time and posts it.
    pub async fn send_command<A>(&self, api: &A, command: Command) -> ClientResult<SignedCommand>
    where
        A: ServerApi + ?Sized,
    {
        let signed = self.sign_command(command, unix_time_millis())?;
        api.post_command(&self.access_token, &signed).await?;
        info!("sent command {command:?}");
        Ok(signed)
    }

    /// Signs `command` at `unix_time_millis` without sending it.
    pub fn sign_command(&self, command: Command, unix_time_millis: u64) -> ClientResult<SignedCommand> {
        let signature_base64 = sign_command(self.keypair.sign_key(), command.as_str(), unix_time_millis)?;
        Ok(SignedCommand {
            command: command.as_str().to_string(),
            unix_time_millis,
            signature_base64,
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("keypair", &self.keypair)
            .finish()
    }
}

/// Runs a CPU-bound crypto step on the blocking pool.
async fn run_blocking<T, F>(f: F) -> ClientResult<T>
where
    F: FnOnce() -> CryptoResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ClientError::Worker(e.to_string()))?
        .map_err(ClientError::from)
}

/// A clock before 1970 yields 0; the server rejects the stale signature.
fn unix_time_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
