//! Network Module
//!
//! Sessions over a byte stream.
//!
//! ## Model
//! - One session owns one stream
//! - One outstanding request at a time: write a sentence, read through `!done`
//! - No retries; a failed stream ends the session

mod login;
mod session;
mod transport;

pub use login::challenge_response;
pub use session::{SentenceReader, SentenceWriter, Session};
pub use transport::Transport;
