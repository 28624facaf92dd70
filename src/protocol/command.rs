//! Command definitions
//!
//! Builds request sentences. The command path and attributes are opaque to
//! the protocol layer; this only gets the word shapes right.

/// A request sentence under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    words: Vec<String>,
}

impl Command {
    /// Start a command with its path, e.g. `/interface/print`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            words: vec![path.into()],
        }
    }

    /// Add `=key=value`
    pub fn attribute(mut self, key: &str, value: &str) -> Self {
        self.words.push(format!("={}={}", key, value));
        self
    }

    /// Add a flag-only attribute, `=key=`
    pub fn flag(mut self, key: &str) -> Self {
        self.words.push(format!("={}=", key));
        self
    }

    /// Add a query word; the leading `?` is added when missing
    pub fn query(mut self, query: &str) -> Self {
        if query.starts_with('?') {
            self.words.push(query.to_string());
        } else {
            self.words.push(format!("?{}", query));
        }
        self
    }

    /// Restrict returned properties, `=.proplist=a,b,c`
    pub fn proplist(self, properties: &[&str]) -> Self {
        let joined = properties.join(",");
        self.attribute(".proplist", &joined)
    }

    /// Attach an API tag, `.tag=n`
    pub fn tag(mut self, tag: u32) -> Self {
        self.words.push(format!(".tag={}", tag));
        self
    }

    /// Append a raw word unchanged
    pub fn word(mut self, word: impl Into<String>) -> Self {
        self.words.push(word.into());
        self
    }

    /// The command path
    pub fn path(&self) -> &str {
        &self.words[0]
    }

    /// Words in wire order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Consume into words in wire order
    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

impl IntoIterator for Command {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a> IntoIterator for &'a Command {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
