//! OpenSky Network REST API access.
//!
//! # Architecture
//!
//! ```text
//! LiveFeed / DetailFetcher
//!     │
//!     └── FlightDataApi trait → OpenSkyClient
//!             │
//!             └── ApiGateway (anonymous, then each credential on 429/401/403)
//!                     │
//!                     └── HttpTransport trait → ReqwestTransport
//! ```
//!
//! Both traits exist so tests can script responses without a network.

mod client;
mod config;
mod error;
mod gateway;
mod transport;

pub use client::{FlightDataApi, OpenSkyClient, StatesResponse, TimeWindow};
pub use config::{
    Credential, OpenSkyConfig, DEFAULT_HISTORY_WINDOW_SECS, DEFAULT_OPENSKY_BASE_URL,
    DEFAULT_OPENSKY_TIMEOUT_SECS,
};
pub use error::{ApiError, TransportError};
pub use gateway::ApiGateway;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
