//! Notification Adapters
//!
//! Concrete `NotificationSink` implementations:
//! - `DiscordSink`: webhook embeds, any number of webhook URLs
//! - `LogSink`: alert line through tracing only

pub mod discord;
pub mod log_sink;

pub use discord::DiscordSink;
pub use log_sink::LogSink;
