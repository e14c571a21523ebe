mod count;
mod envelope;
mod error;
mod matcher;
mod reader;

pub use count::count;
pub use envelope::{EVENT_KIND, Envelope, Payload};
pub use error::Error;
pub use matcher::Matcher;
pub use reader::{CancelToken, ReaderHandle, StreamStats, spawn_reader, stream_events};
