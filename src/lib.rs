//! Now-playing remote control: mirrors a remote player's state, simulates
//! progress locally between polls, and sends transport commands back.

pub mod app;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod progress;
pub mod remote;
pub mod ui;

pub use app::{Engine, EngineHandle, NowPlayingView};
pub use config::Config;
