//! Reply definitions
//!
//! Represents sentences received from the router.

use std::collections::BTreeMap;
use std::fmt;

use super::sentence::parse_attributes;

/// Attribute key to value, unique keys per sentence
pub type Attributes = BTreeMap<String, String>;

/// Reply tag (first word of a received sentence)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTag {
    /// `!re` - one data record
    Re,

    /// `!done` - end of the reply group
    Done,

    /// `!trap` - the command failed
    Trap,

    /// `!fatal` - the router is closing the connection
    Fatal,

    /// Anything else, kept verbatim
    Other(String),
}

impl ReplyTag {
    /// Parse a tag word
    pub fn parse(word: &str) -> Self {
        match word {
            "!re" => ReplyTag::Re,
            "!done" => ReplyTag::Done,
            "!trap" => ReplyTag::Trap,
            "!fatal" => ReplyTag::Fatal,
            other => ReplyTag::Other(other.to_string()),
        }
    }

    /// Wire form of the tag
    pub fn as_str(&self) -> &str {
        match self {
            ReplyTag::Re => "!re",
            ReplyTag::Done => "!done",
            ReplyTag::Trap => "!trap",
            ReplyTag::Fatal => "!fatal",
            ReplyTag::Other(word) => word,
        }
    }

    /// `!trap` or `!fatal`
    pub fn is_error(&self) -> bool {
        matches!(self, ReplyTag::Trap | ReplyTag::Fatal)
    }
}

impl fmt::Display for ReplyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One received sentence: tag plus attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply tag
    pub tag: ReplyTag,

    /// Attributes carried after the tag
    pub attributes: Attributes,
}

impl Reply {
    /// Build a reply from a non-empty sentence
    ///
    /// Returns `None` for an empty sentence.
    pub fn from_words(words: &[String]) -> Option<Self> {
        let (tag, rest) = words.split_first()?;
        Some(Self {
            tag: ReplyTag::parse(tag),
            attributes: parse_attributes(rest),
        })
    }

    /// Look up an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// `!trap` or `!fatal`
    pub fn is_error(&self) -> bool {
        self.tag.is_error()
    }

    /// `!done`
    pub fn is_done(&self) -> bool {
        self.tag == ReplyTag::Done
    }

    /// Error message carried by a `!trap`/`!fatal`
    ///
    /// `!fatal` sends its reason as a bare word, which parses as a key with
    /// an empty value.
    pub fn message(&self) -> Option<String> {
        if let Some(message) = self.get("message") {
            return Some(message.to_string());
        }
        match self.tag {
            ReplyTag::Fatal => self.attributes.keys().next().cloned(),
            _ => None,
        }
    }
}
