// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod caret;
pub mod clock;
pub mod config;
pub mod error;
pub mod keymap;
pub mod language;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod text_source;
pub mod tracker;

pub use error::{SessionError, TextSourceError, WordListError};
pub use session::{InputOutcome, Session, SessionState};
