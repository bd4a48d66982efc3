//! The payload build pipeline: deterministic payload ids, transaction ordering
//! and selection under gas/blob-gas budgets, and the actor-style service that
//! owns in-flight build jobs and serves `getPayload*` lookups.

mod error;
mod job;
mod metrics;
mod payload;
mod service;

pub use error::PayloadBuilderError;
pub use job::{CandidateTransaction, SelectionBudget, SelectionOutcome, select_transactions};
pub use payload::{BuiltPayload, PayloadBuilderAttributes};
pub use service::{
    PayloadBuilderHandle, PayloadBuilderService, PayloadJob, PayloadJobGenerator, PayloadStore,
};
