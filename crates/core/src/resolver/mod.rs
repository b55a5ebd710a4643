//! Media availability resolution.
//!
//! This module decides, in a fixed priority order, whether a title is
//! already served by the library, watchable on a subscribed streaming
//! provider, or already requested — short-circuiting on the first
//! positive signal.

mod cascade;
mod keywords;

pub use cascade::AvailabilityResolver;
pub use keywords::matching_providers;
