//! Carte Hook
//!
//! Glue between a workflow orchestrator and the Carte client.
//!
//! A hook resolves a named connection once, through a [`ConnectionProvider`],
//! and hands out a single lazily-built [`CarteClient`] for it.
//!
//! # Example
//!
//! ```no_run
//! use carte_hook::{CarteHook, EnvConnectionProvider};
//!
//! # fn example() -> Result<(), carte_hook::HookError> {
//! // CARTE_CONN_PDI_DEFAULT='{"host":"carte.local","port":8081,"login":"admin",
//! //   "password":"admin","extra":{"rep":"etl","carte_username":"cluster",
//! //   "carte_password":"cluster"}}'
//! let hook = CarteHook::with_default_connection(&EnvConnectionProvider::new())?;
//! let client = hook.get_conn();
//! println!("talking to {}", client.base_url());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod hook;
pub mod provider;

pub use carte_client::CarteClient;
pub use connection::Connection;
pub use error::{HookError, Result};
pub use hook::{CarteHook, DEFAULT_CONN_ID};
pub use provider::{ConnectionProvider, EnvConnectionProvider, StaticConnectionProvider};
