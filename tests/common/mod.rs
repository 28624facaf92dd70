//! Shared test helpers
//!
//! - `MemoryStream`: in-memory transport with scripted input
//! - `spawn_router`: scripted router on a loopback TCP port

#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use apiros::network::Transport;
use apiros::protocol::{encode_sentence, read_sentence, write_sentence};
use apiros::{Config, Session};

// =============================================================================
// In-memory transport
// =============================================================================

/// Transport reading from a fixed buffer and recording everything written
#[derive(Clone)]
pub struct MemoryStream {
    input: Arc<Mutex<Cursor<Vec<u8>>>>,
    output: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Arc::new(Mutex::new(Cursor::new(input))),
            output: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stream whose input is the given reply sentences
    pub fn with_replies(sentences: &[&[&str]]) -> Self {
        Self::new(encode_sentences(sentences))
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    /// Everything written so far, decoded into sentences
    pub fn written_sentences(&self) -> Vec<Vec<String>> {
        decode_sentences(&self.written())
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.lock().unwrap().read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MemoryStream {
    fn try_clone(&self) -> io::Result<Self> {
        Ok(self.clone())
    }

    fn shutdown(&self) -> io::Result<()> {
        Ok(())
    }

    fn peer_label(&self) -> String {
        "memory".to_string()
    }
}

/// Session over a `MemoryStream` scripted with `sentences`
pub fn memory_session(sentences: &[&[&str]]) -> (Session<MemoryStream>, MemoryStream) {
    let stream = MemoryStream::with_replies(sentences);
    let session = Session::from_stream(stream.clone(), Config::default());
    (session, stream)
}

// =============================================================================
// Encoding helpers
// =============================================================================

/// Encode sentences back to back
pub fn encode_sentences(sentences: &[&[&str]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for sentence in sentences {
        if sentence.is_empty() {
            // Bare terminator
            bytes.push(0);
            continue;
        }
        let (buf, _) = encode_sentence(sentence.iter(), None).unwrap();
        bytes.extend_from_slice(&buf);
    }
    bytes
}

/// Decode every complete sentence in `bytes`
pub fn decode_sentences(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut cursor = Cursor::new(bytes);
    let mut sentences = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        sentences.push(read_sentence(&mut cursor, u32::MAX, None).unwrap());
    }
    sentences
}

// =============================================================================
// Scripted TCP router
// =============================================================================

/// Read one request sentence from the client
pub fn recv(stream: &mut TcpStream) -> Vec<String> {
    read_sentence(stream, u32::MAX, None).unwrap()
}

/// Send one reply sentence to the client
pub fn send(stream: &mut TcpStream, words: &[&str]) {
    write_sentence(stream, words.iter(), None).unwrap();
}

/// Accept one client on a loopback port and run `script` against it
pub fn spawn_router<F, T>(script: F) -> (SocketAddr, JoinHandle<T>)
where
    F: FnOnce(TcpStream) -> T + Send + 'static,
    T: Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        script(stream)
    });
    (addr, handle)
}

/// Config pointing at a scripted router
pub fn router_config(addr: SocketAddr) -> Config {
    Config::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .build()
}
