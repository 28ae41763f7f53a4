//! # Cascade Test
//!
//! In-memory test client for Cascade applications: requests run through
//! the full middleware pipeline without a network listener.
//!
//! ## Example
//!
//! ```rust
//! use cascade::prelude::*;
//! use cascade_test::TestClient;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> CascadeResult<()> {
//! let mut routes = RouteTable::new();
//! routes.get(
//!     "/ping",
//!     MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
//!         Box::pin(async { Ok(Outcome::from("pong")) })
//!     }),
//! );
//! let app = App::builder().routes(routes).build()?;
//!
//! let client = TestClient::new(app);
//! let response = client.get("/ping").send().await;
//! response.assert_status_code(200).assert_body_eq("pong");
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/cascade-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
