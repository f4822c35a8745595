//! # Strata HTTP
//!
//! Configuration-driven HTTP client facade for Strata.
//!
//! This crate provides:
//! - [`StrataClient`], where every verb funnels into one merge-dispatch pipeline
//! - A pluggable [`Transport`] with a `reqwest`-backed default
//! - The timeout race, failure classification, and the timed response envelope
//!
//! ## Example
//!
//! ```ignore
//! use strata_http::{ClientConfig, StrataClient};
//! use strata_core::RequestConfig;
//! use serde_json::json;
//!
//! let client = StrataClient::new(ClientConfig {
//!     host: "https://api.example.com".to_string(),
//!     api_path: "/v2".to_string(),
//!     default_config: RequestConfig::new().header("Accept", "application/json"),
//!     ..ClientConfig::default()
//! });
//!
//! // GET folds data into the query string: /v2/users?page=2
//! let res = client.get("/users", Some(json!({"page": 2}).into()), vec![]).await;
//! if res.is_success() {
//!     println!("{:?}", res.json());
//! }
//! ```

mod client;
mod error;
mod invoke;
pub mod logging;
mod transport;

pub use client::{ClientConfig, RequestInterceptor, ResponseInterceptor, StrataClient};
pub use error::TransportError;
pub use invoke::{dispatch, unwrap_response};
pub use transport::{ReqwestTransport, RequestFn, RequestFuture, Transport, TransportResponse};
