//! Length codec tests
//!
//! Covers all five framing forms, the round-trip law at every form
//! boundary, and exact wire bytes for a full sentence.

use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use ros_api::protocol::codec::{decode_length, encode_length};
use ros_api::transport::SentenceTransport;
use ros_api::{ApiError, Sentence, VerboseLog};

// =============================================================================
// Encoding Forms
// =============================================================================

#[test]
fn test_encode_one_byte_form() {
    assert_eq!(encode_length(0).unwrap(), vec![0x00]);
    assert_eq!(encode_length(0x42).unwrap(), vec![0x42]);
    assert_eq!(encode_length(0x7F).unwrap(), vec![0x7F]);
}

#[test]
fn test_encode_two_byte_form() {
    assert_eq!(encode_length(0x80).unwrap(), vec![0x80, 0x80]);
    assert_eq!(encode_length(0x3FFF).unwrap(), vec![0xBF, 0xFF]);
}

#[test]
fn test_encode_three_byte_form() {
    assert_eq!(encode_length(0x4000).unwrap(), vec![0xC0, 0x40, 0x00]);
    assert_eq!(encode_length(0x1F_FFFF).unwrap(), vec![0xDF, 0xFF, 0xFF]);
}

#[test]
fn test_encode_four_byte_form() {
    assert_eq!(
        encode_length(0x20_0000).unwrap(),
        vec![0xE0, 0x20, 0x00, 0x00]
    );
    assert_eq!(
        encode_length(0xFFF_FFFF).unwrap(),
        vec![0xEF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn test_encode_extended_form() {
    assert_eq!(
        encode_length(0x1000_0000).unwrap(),
        vec![0xF0, 0x10, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        encode_length(0xFFFF_FFFF).unwrap(),
        vec![0xF0, 0xFF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn test_encode_rejects_word_too_long() {
    assert!(matches!(
        encode_length(0x1_0000_0000),
        Err(ApiError::WordTooLong(0x1_0000_0000))
    ));
    assert!(matches!(
        encode_length(u64::MAX),
        Err(ApiError::WordTooLong(_))
    ));
}

// =============================================================================
// Round-Trip Law
// =============================================================================

#[test]
fn test_round_trip_at_form_boundaries() {
    let boundaries: &[u64] = &[
        0,
        1,
        0x7F,
        0x80,
        0x81,
        0x3FFF,
        0x4000,
        0x4001,
        0x1F_FFFF,
        0x20_0000,
        0x20_0001,
        0xFFF_FFFF,
        0x1000_0000,
        0x1000_0001,
        0xDEAD_BEEF,
        0xFFFF_FFFE,
        0xFFFF_FFFF,
    ];
    for &n in boundaries {
        let encoded = encode_length(n).unwrap();
        let decoded = decode_length(&mut Cursor::new(&encoded)).unwrap();
        assert_eq!(decoded, n, "round-trip failed for {n:#x}");
    }
}

#[test]
fn test_round_trip_dense_sweep_of_small_lengths() {
    for n in 0..0x4100u64 {
        let encoded = encode_length(n).unwrap();
        let decoded = decode_length(&mut Cursor::new(&encoded)).unwrap();
        assert_eq!(decoded, n);
    }
}

// =============================================================================
// Decoding Edge Cases
// =============================================================================

#[test]
fn test_decode_rejects_reserved_control_bytes() {
    for first in [0xF1u8, 0xF7, 0xFF] {
        let result = decode_length(&mut Cursor::new(vec![first, 0, 0, 0, 0]));
        assert!(matches!(result, Err(ApiError::InvalidLength(b)) if b == first));
    }
}

#[test]
fn test_decode_extended_form_is_verbatim() {
    // 0xF0 followed by four bytes: no offset subtraction
    let mut cursor = Cursor::new(vec![0xF0, 0x00, 0x00, 0x00, 0x05]);
    assert_eq!(decode_length(&mut cursor).unwrap(), 5);
}

#[test]
fn test_decode_truncated_prefix_is_connection_broken() {
    // Two-byte form with the continuation byte missing
    let result = decode_length(&mut Cursor::new(vec![0x80]));
    assert!(matches!(result, Err(ApiError::ConnectionBroken)));
}

// =============================================================================
// Sentence Wire Bytes
// =============================================================================

/// In-memory stream: reads from a canned buffer, records writes
struct MemStream {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl MemStream {
    fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            output: Vec::new(),
        }
    }
}

impl Read for MemStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MemStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_login_sentence_exact_bytes() {
    let words = ["/login", "=name=admin", "=password=x"];
    let mut transport =
        SentenceTransport::new(MemStream::new(Vec::new()), Arc::new(VerboseLog::disabled()));
    transport
        .send_sentence(&Sentence::from_words(words))
        .unwrap();

    let mut expected = Vec::new();
    for word in words {
        expected.push(word.len() as u8);
        expected.extend_from_slice(word.as_bytes());
    }
    expected.push(0x00);

    assert_eq!(transport.into_inner().output, expected);
}

#[test]
fn test_read_sentence_assembles_words_until_zero_marker() {
    let mut input = Vec::new();
    for word in ["!re", "=name=ether1"] {
        input.push(word.len() as u8);
        input.extend_from_slice(word.as_bytes());
    }
    input.push(0x00);

    let mut transport =
        SentenceTransport::new(MemStream::new(input), Arc::new(VerboseLog::disabled()));
    let sentence = transport.read_sentence().unwrap();
    assert_eq!(sentence.words(), ["!re", "=name=ether1"]);
}

#[test]
fn test_read_sentence_replaces_invalid_utf8() {
    let mut input = vec![0x03, 0xFF, 0xFE, 0x41];
    input.push(0x00);

    let mut transport =
        SentenceTransport::new(MemStream::new(input), Arc::new(VerboseLog::disabled()));
    let sentence = transport.read_sentence().unwrap();
    assert_eq!(sentence.len(), 1);
    assert!(sentence.words()[0].ends_with('A'));
    assert!(sentence.words()[0].contains('\u{FFFD}'));
}

#[test]
fn test_read_sentence_peer_close_mid_word_is_connection_broken() {
    // Length prefix promises five bytes, only two arrive
    let input = vec![0x05, b'a', b'b'];
    let mut transport =
        SentenceTransport::new(MemStream::new(input), Arc::new(VerboseLog::disabled()));
    assert!(matches!(
        transport.read_sentence(),
        Err(ApiError::ConnectionBroken)
    ));
}
