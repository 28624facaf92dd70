//! Sentence Tests
//!
//! Tests for sentence framing, attribute parsing, replies and commands.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use apiros::protocol::{
    parse_attributes, read_sentence, read_sentence_raw, split_attribute, write_sentence,
    Command, Direction, Reply, ReplyTag, WordHook,
};
use apiros::ApiError;

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_write_read_sentence() {
    let words = ["/ip/address/add", "=address=10.0.0.1/24", "=interface=ether1"];

    let mut wire = Vec::new();
    let written = write_sentence(&mut wire, words.iter(), None).unwrap();
    assert_eq!(written, 3);

    let mut cursor = Cursor::new(wire);
    let read = read_sentence(&mut cursor, u32::MAX, None).unwrap();
    assert_eq!(read, words);

    // Terminator consumed, nothing left
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

#[test]
fn test_sentence_ends_with_terminator() {
    let mut wire = Vec::new();
    write_sentence(&mut wire, ["/login"], None).unwrap();

    assert_eq!(wire, b"\x06/login\x00");
}

#[test]
fn test_empty_sentence_writes_nothing() {
    let mut wire = Vec::new();
    let written = write_sentence(&mut wire, Vec::<String>::new(), None).unwrap();

    assert_eq!(written, 0);
    assert!(wire.is_empty());
}

#[test]
fn test_read_consecutive_sentences() {
    let mut wire = Vec::new();
    write_sentence(&mut wire, ["!re", "=name=ether1"], None).unwrap();
    write_sentence(&mut wire, ["!done"], None).unwrap();

    let mut cursor = Cursor::new(wire);
    assert_eq!(
        read_sentence(&mut cursor, u32::MAX, None).unwrap(),
        ["!re", "=name=ether1"]
    );
    assert_eq!(read_sentence(&mut cursor, u32::MAX, None).unwrap(), ["!done"]);
}

#[test]
fn test_read_empty_sentence() {
    let mut cursor = Cursor::new(vec![0x00]);
    let sentence = read_sentence(&mut cursor, u32::MAX, None).unwrap();

    assert!(sentence.is_empty());
}

#[test]
fn test_read_sentence_raw_keeps_bytes() {
    let mut wire = Vec::new();
    write_sentence(&mut wire, [vec![0xFFu8, 0xFE], vec![0x01]], None).unwrap();

    let words = read_sentence_raw(&mut Cursor::new(wire), u32::MAX, None).unwrap();
    assert_eq!(words, vec![vec![0xFF, 0xFE], vec![0x01]]);
}

#[test]
fn test_read_sentence_without_terminator() {
    let mut wire = Vec::new();
    write_sentence(&mut wire, ["!re"], None).unwrap();
    wire.pop();

    let result = read_sentence(&mut Cursor::new(wire), u32::MAX, None);
    assert!(matches!(result, Err(ApiError::ConnectionClosed)));
}

#[test]
fn test_word_hook_sees_every_word() {
    let seen: Arc<Mutex<Vec<(Direction, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let hook: WordHook = Arc::new(move |direction: Direction, word: &[u8]| {
        sink.lock().unwrap().push((direction, word.to_vec()));
    });

    let mut wire = Vec::new();
    write_sentence(&mut wire, ["/login"], Some(&hook)).unwrap();
    read_sentence(&mut Cursor::new(wire), u32::MAX, Some(&hook)).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (Direction::Outgoing, b"/login".to_vec()),
            (Direction::Outgoing, Vec::new()),
            (Direction::Incoming, b"/login".to_vec()),
            (Direction::Incoming, Vec::new()),
        ]
    );
}

#[test]
fn test_direction_markers() {
    assert_eq!(Direction::Outgoing.to_string(), "<<<");
    assert_eq!(Direction::Incoming.to_string(), ">>>");
}

// =============================================================================
// Attribute Tests
// =============================================================================

#[test]
fn test_split_attribute() {
    let cases = [
        ("=name=ether1", ("name", "ether1")),
        ("=comment=a=b", ("comment", "a=b")),
        ("=ret=", ("ret", "")),
        ("=disabled", ("disabled", "")),
        (".tag=3", (".tag", "3")),
        ("?type=ether", ("?type", "ether")),
        ("=", ("", "")),
    ];

    for (word, (key, value)) in cases {
        assert_eq!(
            split_attribute(word),
            (key.to_string(), value.to_string()),
            "word {:?}",
            word
        );
    }
}

#[test]
fn test_parse_attributes_last_key_wins() {
    let attributes = parse_attributes(["=name=a", "=mtu=1500", "=name=b"]);

    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes["name"], "b");
    assert_eq!(attributes["mtu"], "1500");
}

// =============================================================================
// Reply Tests
// =============================================================================

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_reply_tags() {
    assert_eq!(ReplyTag::parse("!re"), ReplyTag::Re);
    assert_eq!(ReplyTag::parse("!done"), ReplyTag::Done);
    assert_eq!(ReplyTag::parse("!trap"), ReplyTag::Trap);
    assert_eq!(ReplyTag::parse("!fatal"), ReplyTag::Fatal);
    assert_eq!(ReplyTag::parse("!empty"), ReplyTag::Other("!empty".to_string()));
    assert_eq!(ReplyTag::Other("!empty".to_string()).as_str(), "!empty");
    assert!(ReplyTag::Trap.is_error());
    assert!(ReplyTag::Fatal.is_error());
    assert!(!ReplyTag::Done.is_error());
}

#[test]
fn test_reply_from_words() {
    let reply = Reply::from_words(&words(&["!done", "=ret=abc"])).unwrap();

    assert!(reply.is_done());
    assert_eq!(reply.get("ret"), Some("abc"));
    assert_eq!(reply.get("missing"), None);
}

#[test]
fn test_reply_from_empty_sentence() {
    assert!(Reply::from_words(&[]).is_none());
}

#[test]
fn test_reply_messages() {
    let trap = Reply::from_words(&words(&["!trap", "=category=2", "=message=no such item"]))
        .unwrap();
    assert!(trap.is_error());
    assert_eq!(trap.message().as_deref(), Some("no such item"));

    let fatal = Reply::from_words(&words(&["!fatal", "session terminated on request"])).unwrap();
    assert_eq!(fatal.message().as_deref(), Some("session terminated on request"));

    let done = Reply::from_words(&words(&["!done"])).unwrap();
    assert_eq!(done.message(), None);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_command_builder() {
    let command = Command::new("/ip/firewall/nat/add")
        .attribute("chain", "dstnat")
        .attribute("to-ports", "80")
        .flag("disabled")
        .tag(7);

    assert_eq!(command.path(), "/ip/firewall/nat/add");
    assert_eq!(
        command.into_words(),
        [
            "/ip/firewall/nat/add",
            "=chain=dstnat",
            "=to-ports=80",
            "=disabled=",
            ".tag=7",
        ]
    );
}

#[test]
fn test_command_queries_and_proplist() {
    let command = Command::new("/interface/print")
        .proplist(&["name", "type"])
        .query("type=ether")
        .query("?running=true")
        .word("?#|");

    assert_eq!(
        command.words(),
        [
            "/interface/print",
            "=.proplist=name,type",
            "?type=ether",
            "?running=true",
            "?#|",
        ]
    );
}

#[test]
fn test_command_writes_as_sentence() {
    let command = Command::new("/system/resource/print");

    let mut wire = Vec::new();
    assert_eq!(write_sentence(&mut wire, &command, None).unwrap(), 1);

    let read = read_sentence(&mut Cursor::new(wire), u32::MAX, None).unwrap();
    assert_eq!(read, command.words());
}
