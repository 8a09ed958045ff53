//! Protocol type tests
//!
//! Sentence classification, reply-record mapping, and the tagged
//! command variants.

use ros_api::protocol::trap_message;
use ros_api::{Command, Paragraph, ReplyRecord, Sentence};

// =============================================================================
// Sentence Classification
// =============================================================================

#[test]
fn test_done_and_trap_markers() {
    assert!(Sentence::from_words(["!done"]).is_done());
    assert!(!Sentence::from_words(["!re", "=name=x"]).is_done());
    assert!(Sentence::from_words(["!trap", "=message=bad"]).is_trap());
    assert!(Sentence::from_words(["!fatal", "session closed"]).is_trap());
    assert!(!Sentence::new().is_done());
}

#[test]
fn test_challenge_detection() {
    let legacy = Sentence::from_words(["!done", "=ret=00112233445566778899aabbccddeeff"]);
    assert_eq!(
        legacy.challenge(),
        Some("00112233445566778899aabbccddeeff")
    );

    // Wrong word count or missing prefix: no challenge
    assert_eq!(Sentence::from_words(["!done"]).challenge(), None);
    assert_eq!(
        Sentence::from_words(["!done", "=ret=aa", "extra"]).challenge(),
        None
    );
    assert_eq!(
        Sentence::from_words(["!done", "=res=aa"]).challenge(),
        None
    );
}

// =============================================================================
// Reply Records
// =============================================================================

#[test]
fn test_record_splits_on_first_equals_after_marker() {
    let sentence = Sentence::from_words([
        "!re",
        "=name=ether1",
        "=comment=uplink=primary",
        "=.id=*1",
    ]);
    let record = ReplyRecord::from_sentence(&sentence);

    assert_eq!(record.get("name"), Some("ether1"));
    // Only the first `=` separates key from value
    assert_eq!(record.get("comment"), Some("uplink=primary"));
    assert_eq!(record.get(".id"), Some("*1"));
    assert_eq!(record.len(), 3);
}

#[test]
fn test_record_ignores_words_without_separator() {
    let sentence = Sentence::from_words(["!re", "=name=lo", "garbage"]);
    let record = ReplyRecord::from_sentence(&sentence);
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("name"), Some("lo"));
}

#[test]
fn test_paragraph_maps_all_but_terminal_sentence() {
    let mut paragraph = Paragraph::new();
    paragraph.push(Sentence::from_words(["!re", "=name=ether1"]));
    paragraph.push(Sentence::from_words(["!re", "=name=ether2"]));
    paragraph.push(Sentence::from_words(["!done"]));

    let records = paragraph.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some("ether1"));
    assert_eq!(records[1].get("name"), Some("ether2"));
}

#[test]
fn test_empty_paragraph_yields_no_records() {
    assert!(Paragraph::new().records().is_empty());
}

#[test]
fn test_trap_message_extraction() {
    let trap = Sentence::from_words(["!trap", "=category=1", "=message=no such command"]);
    assert_eq!(trap_message(&trap), Some("no such command"));

    let bare = Sentence::from_words(["!trap"]);
    assert_eq!(trap_message(&bare), None);
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_raw_command_splits_on_whitespace() {
    let sentence = Command::Raw("/ip/address/add =address=10.0.0.1/24 =interface=ether1".into())
        .into_sentence();
    assert_eq!(
        sentence.words(),
        [
            "/ip/address/add",
            "=address=10.0.0.1/24",
            "=interface=ether1"
        ]
    );
}

#[test]
fn test_word_command_is_sent_verbatim() {
    // Pre-tokenized words may contain spaces; no re-splitting
    let words = vec!["/system/note/set".to_string(), "=note=hello world".to_string()];
    let sentence = Command::Words(words.clone()).into_sentence();
    assert_eq!(sentence.words(), words.as_slice());
}
