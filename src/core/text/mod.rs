//! Plain-text tools: case conversion, whitespace cleanup, email
//! extraction, and the counters shown alongside them.

mod case;
mod email;
mod spaces;
mod stats;

pub use case::{convert_case, CaseMode};
pub use email::{extract_emails, EmailExtraction, EmailOptions, Separator};
pub use spaces::{remove_spaces, SpaceOptions, SpaceResult};
pub use stats::{text_stats, TextStats};
