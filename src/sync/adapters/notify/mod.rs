//! Notifier adapters.

mod formatter;
mod logging;
mod slack;

pub use formatter::{BlockKitFormatter, Member, MemberDirectory, MessageFormatter, TemplateFormatter};
pub use logging::LoggingNotifier;
pub use slack::SlackNotifier;
