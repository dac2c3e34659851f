pub mod now_playing;

pub use now_playing::{render_now_playing, NowPlayingState};
