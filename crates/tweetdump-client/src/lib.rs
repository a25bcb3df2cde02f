pub mod client;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod types;

pub use client::{TimelineHarvest, XClient};
pub use error::ClientError;
pub use normalize::normalize_page;
pub use rate_limit::RateLimitPolicy;
pub use types::{RawPage, RawPost};
