//! The engine method dispatcher: the capability trait an embedder implements
//! against its own execution backend, the wire-agnostic request/response
//! envelope, the payload response cache, and canonical error mapping.

mod cache;
mod capability;
mod dispatcher;
mod envelope;
mod error;
mod metrics;

pub use cache::PayloadCache;
pub use capability::{exchange_capabilities, ClientVersion, EngineBackend, SUPPORTED_CAPABILITIES};
pub use dispatcher::EngineApiDispatcher;
pub use envelope::{EngineRequest, EngineResponse, RequestId};
pub use error::{to_error_object, EngineApiResult};
