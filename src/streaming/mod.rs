pub mod delta;
pub mod extract;
pub mod merge;
pub mod sse;

pub use delta::compute_delta;
pub use extract::extract_text;
pub use merge::{StreamEvent, StreamState, merge_stream};
