//! Friend request handling: rate limiting, approval tokens and the
//! admin-mediated request workflow.

mod ledger;
mod token;
mod workflow;

pub use ledger::{Clock, RateLimitLedger, SystemClock};
pub use token::{ApprovalAction, ApprovalToken, TokenError};
pub use workflow::{DecisionOutcome, FriendRequestWorkflow, RequestReception};
