pub mod keyboard;
pub mod swipe;

pub use keyboard::{handle_key_event, KeyAction};
pub use swipe::SwipeDetector;
