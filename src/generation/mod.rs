pub mod poll;
mod service;

pub use poll::{PollSettings, poll_until};
pub use service::{GenerationRequest, GenerationService, IMAGE_REQUIRED};
