//! Session store: extracted images and the selection

pub mod record;
pub mod state;

pub use record::ImageRecord;
pub use state::{PendingExtraction, SelectionSet, SessionState, SessionStore};
