//! `resilient-get` fetches JSON over HTTP GET with bounded, fixed-delay retries.
//!
//! The core is [`RequestExecutor::execute`]: up to `max_attempts` sequential
//! attempts, each failure classified as a connection failure, timeout, HTTP
//! error or other transport failure, returned as a [`FetchOutcome`].
//!
//! The [`apis`] module builds small typed clients for public demo APIs on top
//! of the executor.

mod error;
mod executor;
mod options;
mod outcome;

pub mod apis;
pub mod json;
pub mod transport;

pub use error::FetchError;
pub use executor::RequestExecutor;
pub use options::{ExecutorOptions, RequestDescriptor};
pub use outcome::FetchOutcome;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

pub type Result<T> = std::result::Result<T, FetchError>;
