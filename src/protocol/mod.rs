//! Protocol Module
//!
//! Defines the RouterOS API wire protocol.
//!
//! ## Words
//! ```text
//! ┌──────────────────┬─────────────────────────────┐
//! │ Len (1-5 bytes)  │       Payload (Len bytes)   │
//! └──────────────────┴─────────────────────────────┘
//! ```
//!
//! ## Sentences
//! ```text
//! ┌────────┬────────┬─────┬────────┬──────────────┐
//! │ Word 1 │ Word 2 │ ... │ Word n │ 0x00 (empty) │
//! └────────┴────────┴─────┴────────┴──────────────┘
//! ```
//!
//! The first word of a request is the command path (`/interface/print`).
//! The first word of a reply is its tag:
//! - `!re`    - one record
//! - `!done`  - last sentence of the reply group
//! - `!trap`  - command error, still followed by `!done`
//! - `!fatal` - connection-level error, the router hangs up
//!
//! Remaining words are attributes, `=key=value`.

mod codec;
mod command;
mod records;
mod reply;
mod sentence;
mod trace;

pub use codec::{
    decode_length, decode_word, encode_length, encode_word, prefix_size, put_length,
    read_length, read_word, write_word, MAX_ENCODABLE_LEN, MAX_PREFIX_SIZE,
};
pub use command::Command;
pub use records::{Progress, RecordCollector};
pub use reply::{Attributes, Reply, ReplyTag};
pub use sentence::{
    encode_sentence, parse_attributes, read_sentence, read_sentence_raw, split_attribute,
    write_sentence,
};
pub use trace::{tracing_hook, Direction, WordHook};
