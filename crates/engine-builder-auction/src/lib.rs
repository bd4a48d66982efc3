//! Builder registration and the per-slot sealed-bid, second-price auction used
//! to select which builder's payload is revealed for a given slot.

mod auction;
mod error;
mod registry;
mod signature;

pub use auction::{validate_bid_payload, AuctionResult, SlotAuction};
pub use error::{BidError, BuilderPubkey, RegistryError, RevealError};
pub use registry::{BuilderRegistry, RegistrationMessage, MIN_BUILDER_STAKE};
pub use signature::{
    register_signed, submit_bid_signed, BlsVerifier, SignedBid, SignedRegistrationMessage,
};
