pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod widgets;

pub use app::router;
pub use client::{ClientError, Suggestion, WarblerApi, WarblerClient};
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, persist_data};
pub use widgets::{Autocomplete, Element, LikeHandler, StatGroup, StatMode};
