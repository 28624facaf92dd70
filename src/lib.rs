//! # apiros
//!
//! Client for the RouterOS API wire protocol:
//! - Variable-width length prefixed words
//! - Sentences terminated by an empty word
//! - Request/reply correlation through `!done`
//! - Legacy MD5 challenge-response login
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller / CLI                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ connect / login / talk / execute / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Session                             │
//! │         (sentence framing, reply groups, login)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Word Codec                            │
//! │              (length prefix + raw bytes)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │  Transport  │
//!                │ (TcpStream) │
//!                └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use apiros::{Config, Session};
//!
//! let config = Config::builder().host("192.168.88.1").build();
//! let mut session = Session::open(config)?;
//! session.login("admin", "")?;
//! for record in session.execute(["/interface/print"])? {
//!     println!("{:?}", record.get("name"));
//! }
//! session.close()?;
//! # Ok::<(), apiros::ApiError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ApiError, Result};
pub use config::{Config, LoginMethod};
pub use network::Session;
pub use protocol::{Attributes, Command, Reply, ReplyTag};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of apiros
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
