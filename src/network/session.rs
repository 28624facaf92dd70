//! Session
//!
//! Owns one stream and runs the request/reply cycle over it.

use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::protocol::{
    read_sentence, tracing_hook, write_sentence, Attributes, Progress, RecordCollector, Reply,
    ReplyTag, WordHook,
};
use super::transport::Transport;

/// Connection state of a session
enum State<S> {
    /// `connect` not called yet
    Unconnected,

    /// Live stream; reads are buffered, writes go straight to the stream
    Connected(BufReader<S>),

    /// `close` called; the session cannot be reused
    Closed,
}

/// A client session
///
/// Strictly one request at a time: each `talk`/`execute` writes a sentence
/// and reads the whole reply group before returning.
pub struct Session<S: Transport = TcpStream> {
    /// Session configuration
    config: Config,

    /// Stream state
    state: State<S>,

    /// Per-word observer (debug side channel)
    hook: Option<WordHook>,

    /// Reserved tag counter, not used for multiplexing
    current_tag: u32,

    /// Peer address for logging
    peer: String,
}

impl Session<TcpStream> {
    /// Create an unconnected session
    pub fn new(config: Config) -> Self {
        let hook = config.debug.then(tracing_hook);
        Self {
            config,
            state: State::Unconnected,
            hook,
            current_tag: 0,
            peer: String::new(),
        }
    }

    /// Create a session and connect to the configured host and port
    pub fn open(config: Config) -> Result<Self> {
        if config.host.is_empty() {
            return Err(ApiError::Config("Host must not be empty".to_string()));
        }

        let host = config.host.clone();
        let port = config.port;
        let mut session = Self::new(config);
        session.connect(&host, port)?;
        Ok(session)
    }

    /// Open a TCP connection to `host:port`
    ///
    /// Every resolved address is tried in order; the last failure is reported.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        match self.state {
            State::Unconnected => {}
            State::Connected(_) => return Err(ApiError::AlreadyConnected),
            State::Closed => return Err(ApiError::SessionClosed),
        }

        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| ApiError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(ApiError::Resolve {
                host: host.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"),
            });
        }

        let mut last_error = None;
        for addr in addrs {
            tracing::debug!("Connecting to {}", addr);

            let attempt = if self.config.connect_timeout_ms > 0 {
                let timeout = Duration::from_millis(self.config.connect_timeout_ms);
                TcpStream::connect_timeout(&addr, timeout)
            } else {
                TcpStream::connect(addr)
            };

            match attempt {
                Ok(stream) => {
                    self.configure_stream(&stream)?;
                    self.attach(stream);
                    tracing::info!("Connected to {}", self.peer);
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!("Connection to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(ApiError::Connect {
            addr: format!("{}:{}", host, port),
            source: last_error
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no address tried")),
        })
    }

    /// Apply socket options from the config
    fn configure_stream(&self, stream: &TcpStream) -> Result<()> {
        // Sentences are written in one go; do not wait to coalesce them
        stream.set_nodelay(true)?;

        if self.config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.config.read_timeout_ms)))?;
        }
        if self.config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(self.config.write_timeout_ms)))?;
        }

        Ok(())
    }
}

impl<S: Transport> Session<S> {
    /// Wrap an already open stream
    pub fn from_stream(stream: S, config: Config) -> Self {
        let hook = config.debug.then(tracing_hook);
        let mut session = Self {
            config,
            state: State::Unconnected,
            hook,
            current_tag: 0,
            peer: String::new(),
        };
        session.attach(stream);
        session
    }

    fn attach(&mut self, stream: S) {
        self.peer = stream.peer_label();
        self.state = State::Connected(BufReader::new(stream));
    }

    /// Install or remove the per-word observer
    pub fn set_word_hook(&mut self, hook: Option<WordHook>) {
        self.hook = hook;
    }

    /// Builder-style [`Session::set_word_hook`]
    pub fn with_word_hook(mut self, hook: WordHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Stream and hook, borrowed together
    fn io(&mut self) -> Result<(&mut BufReader<S>, Option<&WordHook>)> {
        let hook = self.hook.as_ref();
        match &mut self.state {
            State::Connected(stream) => Ok((stream, hook)),
            State::Unconnected => Err(ApiError::NotConnected),
            State::Closed => Err(ApiError::SessionClosed),
        }
    }

    // =========================================================================
    // Sentence Framing
    // =========================================================================

    /// Write one sentence
    ///
    /// Returns the number of words written. An empty sentence is not sent
    /// and returns 0.
    pub fn write_sentence<I>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let words: Vec<I::Item> = words.into_iter().collect();
        let (stream, hook) = self.io()?;
        write_sentence(
            stream.get_mut(),
            words.iter().map(|w| AsRef::<str>::as_ref(w).as_bytes()),
            hook,
        )
    }

    /// Read one sentence, terminator excluded
    ///
    /// May return an empty sentence.
    pub fn read_sentence(&mut self) -> Result<Vec<String>> {
        let max_word_len = self.config.max_word_len;
        let (stream, hook) = self.io()?;
        read_sentence(stream, max_word_len, hook)
    }

    /// Read the next non-empty sentence as a reply
    fn next_reply(&mut self) -> Result<Reply> {
        loop {
            let words = self.read_sentence()?;
            if let Some(reply) = Reply::from_words(&words) {
                return Ok(reply);
            }
            tracing::trace!("Skipping empty sentence from {}", self.peer);
        }
    }

    // =========================================================================
    // Request / Reply
    // =========================================================================

    /// Send a request and collect its reply group
    ///
    /// Returns one entry per sentence received, ending with the `!done`.
    /// `!trap` and `!fatal` are returned like any other entry. The router
    /// hangs up after `!fatal`, so a disconnect that follows one ends the
    /// group with the `!fatal` as its last entry. An empty request sends
    /// nothing and returns no entries.
    pub fn talk<I>(&mut self, words: I) -> Result<Vec<Reply>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.write_sentence(words)? == 0 {
            return Ok(Vec::new());
        }

        let mut replies: Vec<Reply> = Vec::new();
        loop {
            let fatal_seen = replies.iter().any(|r| r.tag == ReplyTag::Fatal);
            let reply = match self.next_reply() {
                Ok(reply) => reply,
                Err(e) if fatal_seen && e.is_disconnect() => {
                    tracing::warn!("{} closed the connection after !fatal", self.peer);
                    return Ok(replies);
                }
                Err(e) => return Err(e),
            };
            let done = reply.is_done();
            replies.push(reply);

            if done {
                tracing::debug!("Reply group of {} sentences from {}", replies.len(), self.peer);
                return Ok(replies);
            }
        }
    }

    /// Send a request and flatten its `!re` records
    ///
    /// Blocks until `!done`. A `!trap` in the group is returned as
    /// [`ApiError::Trap`] once the group is complete; `!fatal` is returned
    /// as [`ApiError::Fatal`] straight away.
    pub fn execute<I>(&mut self, words: I) -> Result<Vec<Attributes>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.write_sentence(words)? == 0 {
            return Ok(Vec::new());
        }

        let mut collector = RecordCollector::new();
        loop {
            match collector.feed(self.next_reply()?) {
                Progress::Continue => {}
                Progress::Done => break,
                Progress::Fatal(reply) => {
                    let message = reply.message().unwrap_or_default();
                    tracing::warn!("Fatal reply from {}: {}", self.peer, message);
                    return Err(ApiError::Fatal(message));
                }
            }
        }

        let (records, trap) = collector.finish();
        if let Some(trap) = trap {
            return Err(ApiError::Trap {
                category: trap.get("category").map(str::to_string),
                message: trap.message().unwrap_or_default(),
            });
        }

        Ok(records)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the stream; the session cannot be used afterwards
    pub fn close(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, State::Closed);
        if let State::Connected(stream) = state {
            if let Err(e) = stream.get_ref().shutdown() {
                // The peer may already be gone
                if e.kind() != io::ErrorKind::NotConnected {
                    return Err(ApiError::Io(e));
                }
            }
            tracing::debug!("Closed session to {}", self.peer);
        }
        Ok(())
    }

    /// Split into independent reader and writer halves
    ///
    /// Buffered input carries over to the reader.
    pub fn into_split(self) -> Result<(SentenceReader<S>, SentenceWriter<S>)> {
        let stream = match self.state {
            State::Connected(stream) => stream,
            State::Unconnected => return Err(ApiError::NotConnected),
            State::Closed => return Err(ApiError::SessionClosed),
        };

        let writer = stream.get_ref().try_clone()?;
        Ok((
            SentenceReader {
                inner: stream,
                max_word_len: self.config.max_word_len,
                hook: self.hook.clone(),
            },
            SentenceWriter {
                inner: writer,
                hook: self.hook,
            },
        ))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether a stream is attached
    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    /// Peer address, empty before connecting
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// The configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current value of the tag counter
    pub fn current_tag(&self) -> u32 {
        self.current_tag
    }

    /// Advance the tag counter and return the new value
    pub fn next_tag(&mut self) -> u32 {
        self.current_tag = self.current_tag.wrapping_add(1);
        self.current_tag
    }
}

/// Reading half of a split session
pub struct SentenceReader<S> {
    inner: BufReader<S>,
    max_word_len: u32,
    hook: Option<WordHook>,
}

impl<S: Transport> SentenceReader<S> {
    /// Read one sentence, terminator excluded
    pub fn read_sentence(&mut self) -> Result<Vec<String>> {
        read_sentence(&mut self.inner, self.max_word_len, self.hook.as_ref())
    }
}

/// Writing half of a split session
pub struct SentenceWriter<S> {
    inner: S,
    hook: Option<WordHook>,
}

impl<S: Transport> SentenceWriter<S> {
    /// Write one sentence; an empty one is not sent
    pub fn write_sentence<I>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let words: Vec<I::Item> = words.into_iter().collect();
        write_sentence(
            &mut self.inner,
            words.iter().map(|w| AsRef::<str>::as_ref(w).as_bytes()),
            self.hook.as_ref(),
        )
    }

    /// Close the underlying stream in both directions
    pub fn shutdown(&self) -> Result<()> {
        self.inner.shutdown()?;
        Ok(())
    }
}
