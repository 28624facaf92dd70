//! Record flattening
//!
//! Turns the sentences of one reply group into a list of attribute maps,
//! one per `!re`, as used by `Session::execute`.

use super::reply::{Attributes, Reply, ReplyTag};

/// What the collector wants after a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Keep reading sentences
    Continue,

    /// `!done` seen; the reply group is complete
    Done,

    /// `!fatal` seen; nothing more will arrive
    Fatal(Reply),
}

/// Accumulates `!re` records until `!done`
#[derive(Debug, Default)]
pub struct RecordCollector {
    /// Record being filled by the latest `!re`
    current: Attributes,

    /// Finished records
    records: Vec<Attributes>,

    /// First `!trap` of the group, if any
    trap: Option<Reply>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one reply sentence
    ///
    /// `!re` closes the pending record (when non-empty) and starts a new one.
    /// `!done` closes the pending record even when empty. Attributes carried
    /// by `!done` itself (such as `ret`) are not part of any record.
    pub fn feed(&mut self, reply: Reply) -> Progress {
        match reply.tag {
            ReplyTag::Re => {
                self.flush_current(false);
                self.current = reply.attributes;
                Progress::Continue
            }
            ReplyTag::Done => {
                self.flush_current(true);
                Progress::Done
            }
            ReplyTag::Trap => {
                if self.trap.is_none() {
                    self.trap = Some(reply);
                }
                Progress::Continue
            }
            ReplyTag::Fatal => Progress::Fatal(reply),
            ReplyTag::Other(ref tag) => {
                tracing::debug!("Ignoring sentence with unexpected tag {}", tag);
                Progress::Continue
            }
        }
    }

    fn flush_current(&mut self, keep_empty: bool) {
        if keep_empty || !self.current.is_empty() {
            self.records.push(std::mem::take(&mut self.current));
        }
    }

    /// The trap seen in this group, if any
    pub fn trap(&self) -> Option<&Reply> {
        self.trap.as_ref()
    }

    /// Records collected so far
    pub fn records(&self) -> &[Attributes] {
        &self.records
    }

    /// Consume into the collected records and the trap, if any
    pub fn finish(self) -> (Vec<Attributes>, Option<Reply>) {
        (self.records, self.trap)
    }
}
