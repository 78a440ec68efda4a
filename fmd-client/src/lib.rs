//! FMD client session layer.
//!
//! Drives the login handshake, fetches and decrypts locations and pictures,
//! and signs device commands. All cryptography lives in [`fmd_crypto`]; all
//! network I/O lives behind the [`ServerApi`] trait.
//!
//! ```no_run
//! # async fn demo(api: &dyn fmd_client::ServerApi) -> fmd_client::ClientResult<()> {
//! use fmd_client::{ClientConfig, Command, LocationIndex, Session};
//!
//! let config = ClientConfig::new("my-device-id");
//! let session = Session::login(api, &config, "password").await?;
//! let location = session.locate(api, LocationIndex::Latest).await?;
//! println!("{} {}", location.lat, location.lon);
//! session.send_command(api, Command::Ring).await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod error;
mod session;
mod types;

pub use api::{ServerApi, UNUSED_DATA, decode_reply};
pub use config::{ClientConfig, DEFAULT_SERVER_URL, Endpoint};
pub use error::{ClientError, ClientResult};
pub use session::Session;
pub use types::{Command, DataPackage, Location, LocationIndex, LocationProvider, SignedCommand};

pub use fmd_crypto;
