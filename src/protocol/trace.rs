//! Word tracing
//!
//! Optional per-word observer used as a debug side channel. It never
//! influences what goes over the wire.

use std::fmt;
use std::sync::Arc;

/// Which way a word travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written to the router
    Outgoing,

    /// Read from the router
    Incoming,
}

impl Direction {
    /// Conventional console marker for the direction
    pub fn marker(self) -> &'static str {
        match self {
            Direction::Outgoing => "<<<",
            Direction::Incoming => ">>>",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Callback invoked once per word, including zero-length terminators
pub type WordHook = Arc<dyn Fn(Direction, &[u8]) + Send + Sync>;

/// Hook that logs each word through `tracing` on target `apiros::wire`
pub fn tracing_hook() -> WordHook {
    Arc::new(|direction: Direction, word: &[u8]| {
        tracing::debug!(
            target: "apiros::wire",
            "{} {}",
            direction.marker(),
            String::from_utf8_lossy(word)
        );
    })
}

/// Invoke `hook` if one is installed
#[inline]
pub(crate) fn observe(hook: Option<&WordHook>, direction: Direction, word: &[u8]) {
    if let Some(hook) = hook {
        hook(direction, word);
    }
}
