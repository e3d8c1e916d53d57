//! RD Station Lead API Client
//!
//! This library registers new leads with RD Station, updates lead attributes,
//! moves leads through the sales funnel and marks them as won or lost.
//!
//! # Modules
//!
//! - `config`: Client configuration and environment loading.
//! - `endpoints`: Endpoint URL resolution per operation and API version.
//! - `errors`: Error handling types.
//! - `lead_client`: The `LeadClient` and its four operations.
//! - `models`: Lead payloads, lead references, statuses and tracking cookies.
//! - `transport`: JSON request dispatch over HTTP.

pub mod config;
pub mod endpoints;
pub mod errors;
pub mod lead_client;
pub mod models;
pub mod transport;

pub use config::ClientConfig;
pub use endpoints::EndpointKind;
pub use errors::LeadError;
pub use lead_client::LeadClient;
pub use models::{LeadData, LeadRef, LeadStatus, LifecycleStage, TrackingContext};
pub use transport::Delivery;
