//! Login handshake
//!
//! ```text
//!  client                               router
//!    │  /login                            │
//!    │ ─────────────────────────────────► │
//!    │  !done =ret=<hex challenge>        │
//!    │ ◄───────────────────────────────── │
//!    │  /login =name=<user>               │
//!    │         =response=00<md5 hex>      │
//!    │ ─────────────────────────────────► │
//!    │  !done            (or !trap)       │
//!    │ ◄───────────────────────────────── │
//! ```
//!
//! The digest is MD5 over `0x00 ‖ password ‖ challenge`.

use md5::{Digest, Md5};

use crate::config::LoginMethod;
use crate::error::{ApiError, Result};
use crate::protocol::Reply;
use super::session::Session;
use super::transport::Transport;

/// Compute the `response` attribute for a challenge
///
/// Returns `00` followed by the lowercase hex MD5 digest.
pub fn challenge_response(password: &str, challenge: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.update(challenge);
    format!("00{}", hex::encode(hasher.finalize()))
}

/// Challenge carried by the last reply that has a `ret`
fn find_challenge(replies: &[Reply]) -> Option<&str> {
    replies.iter().rev().find_map(|r| r.get("ret"))
}

impl<S: Transport> Session<S> {
    /// Authenticate the session
    ///
    /// Returns the replies of the final round-trip. A rejected login is not
    /// an `Err`: it shows up as a `!trap` (or `!fatal`) entry, and the
    /// caller decides what to do. No retries.
    pub fn login(&mut self, user: &str, password: &str) -> Result<Vec<Reply>> {
        let method = self.config().login_method;
        tracing::debug!("Logging in to {} as {} ({:?})", self.peer(), user, method);

        let first = match method {
            LoginMethod::Challenge => self.talk(["/login"])?,
            LoginMethod::Plain => self.talk([
                "/login".to_string(),
                format!("=name={}", user),
                format!("=password={}", password),
            ])?,
        };

        if first.iter().any(Reply::is_error) {
            tracing::warn!("Login as {} rejected by {}", user, self.peer());
            return Ok(first);
        }

        let challenge = match find_challenge(&first) {
            Some(ret) => hex::decode(ret)
                .map_err(|e| ApiError::Login(format!("Invalid challenge {:?}: {}", ret, e)))?,
            None if method == LoginMethod::Plain => {
                tracing::info!("Logged in to {} as {}", self.peer(), user);
                return Ok(first);
            }
            None => {
                return Err(ApiError::Login(
                    "Challenge reply carried no ret attribute".to_string(),
                ))
            }
        };

        let response = challenge_response(password, &challenge);
        let replies = self.talk([
            "/login".to_string(),
            format!("=name={}", user),
            format!("=response={}", response),
        ])?;

        if replies.iter().any(Reply::is_error) {
            tracing::warn!("Login as {} rejected by {}", user, self.peer());
        } else {
            tracing::info!("Logged in to {} as {}", self.peer(), user);
        }

        Ok(replies)
    }
}
