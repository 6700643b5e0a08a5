//! Output routing: deliver an agent result through the configured or
//! auto-inferred mode, with the interactive review flow behind a channel
//! seam.

pub mod review;
pub mod router;

pub use review::{ChannelReview, ReviewDecision, ReviewHandler, ReviewRequest};
pub use router::{Desktop, OutputRouter, SystemDesktop};
