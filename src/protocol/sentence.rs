//! Sentence framing
//!
//! A sentence is a run of words closed by a zero-length word. The
//! terminator is never part of the returned sentence.

use std::io::{Read, Write};

use bytes::BytesMut;

use crate::error::{ApiError, Result};
use super::codec::{encode_word, read_word};
use super::reply::Attributes;
use super::trace::{observe, Direction, WordHook};

/// Encode a whole sentence, terminator included, into one buffer
///
/// Returns the buffer and the number of words encoded. An empty word list
/// encodes to nothing at all.
pub fn encode_sentence<I>(words: I, hook: Option<&WordHook>) -> Result<(BytesMut, usize)>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut buf = BytesMut::new();
    let mut count = 0;

    for word in words {
        let word = word.as_ref();
        observe(hook, Direction::Outgoing, word);
        encode_word(&mut buf, word)?;
        count += 1;
    }

    if count > 0 {
        observe(hook, Direction::Outgoing, &[]);
        encode_word(&mut buf, &[])?;
    }

    Ok((buf, count))
}

/// Write a sentence to a stream
///
/// Returns the number of words written, not counting the terminator.
/// Zero words means nothing was sent.
pub fn write_sentence<W, I>(writer: &mut W, words: I, hook: Option<&WordHook>) -> Result<usize>
where
    W: Write,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let (buf, count) = encode_sentence(words, hook)?;
    if count == 0 {
        return Ok(0);
    }

    writer.write_all(&buf).map_err(ApiError::from_stream)?;
    writer.flush().map_err(ApiError::from_stream)?;
    Ok(count)
}

/// Read a sentence as raw words
pub fn read_sentence_raw<R: Read>(
    reader: &mut R,
    max_word_len: u32,
    hook: Option<&WordHook>,
) -> Result<Vec<Vec<u8>>> {
    let mut words = Vec::new();
    loop {
        let word = read_word(reader, max_word_len)?;
        observe(hook, Direction::Incoming, &word);
        if word.is_empty() {
            return Ok(words);
        }
        words.push(word);
    }
}

/// Read a sentence as text words
///
/// An empty result means the terminator came first; callers skip such
/// sentences.
pub fn read_sentence<R: Read>(
    reader: &mut R,
    max_word_len: u32,
    hook: Option<&WordHook>,
) -> Result<Vec<String>> {
    let words = read_sentence_raw(reader, max_word_len, hook)?;
    Ok(words
        .into_iter()
        .map(|w| String::from_utf8_lossy(&w).into_owned())
        .collect())
}

// =============================================================================
// Attribute Words
// =============================================================================

/// Split an attribute word into key and value
///
/// The split happens at the first `=` after position 0. A leading `=` is not
/// part of the key, so `=name=ether1` gives `("name", "ether1")` while
/// `.tag=3` gives `(".tag", "3")`. Without a further `=` the value is empty.
pub fn split_attribute(word: &str) -> (String, String) {
    let split_at = word
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '=')
        .map(|(i, _)| i);

    match split_at {
        Some(i) => {
            let key = &word[..i];
            let key = key.strip_prefix('=').unwrap_or(key);
            (key.to_string(), word[i + 1..].to_string())
        }
        None => {
            let key = word.strip_prefix('=').unwrap_or(word);
            (key.to_string(), String::new())
        }
    }
}

/// Build an attribute map from attribute words (tag excluded)
pub fn parse_attributes<I>(words: I) -> Attributes
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| split_attribute(w.as_ref()))
        .collect()
}
