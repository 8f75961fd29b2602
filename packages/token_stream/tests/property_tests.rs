use proptest::prelude::*;

use token_stream::{Frame, FrameOutcome, ReplyAssembler, TurnRejected, TurnStatus};

// Plain words: never start with '[' so they cannot collide with a sentinel.
fn arb_word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.,!?']{1,12}"
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_word(), 0..32)
}

// Any frame the backend might send, sentinels included.
fn arb_frame() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_word(),
        1 => Just("[END]".to_string()),
        1 => "[a-z ]{0,16}".prop_map(|m| format!("[ERROR] {m}")),
        1 => Just(String::new()),
    ]
}

fn started(text: &str) -> ReplyAssembler {
    let mut assembler = ReplyAssembler::new();
    assembler.begin_turn(text).unwrap();
    assembler
}

// --- Token folding ---

proptest! {
    #[test]
    fn tokens_join_with_single_spaces(words in arb_words()) {
        let mut assembler = started("question");
        for word in &words {
            prop_assert_eq!(assembler.ingest(word), FrameOutcome::Appended);
        }
        prop_assert_eq!(assembler.reply_text(), words.join(" "));
        prop_assert!(assembler.is_awaiting());
    }

    #[test]
    fn end_freezes_reply(words in arb_words(), late in prop::collection::vec(arb_frame(), 0..8)) {
        let mut assembler = started("question");
        for word in &words {
            assembler.ingest(word);
        }
        prop_assert_eq!(assembler.ingest("[END]"), FrameOutcome::Completed);
        let frozen = assembler.reply_text().to_string();

        for frame in &late {
            prop_assert_eq!(assembler.ingest(frame), FrameOutcome::Ignored);
        }
        prop_assert_eq!(assembler.reply_text(), frozen.as_str());
        prop_assert_eq!(assembler.turn().status(), TurnStatus::Complete);
    }

    #[test]
    fn error_anywhere_wins(
        words in arb_words(),
        cut in any::<prop::sample::Index>(),
        reason in "[a-z]{1,10}( [a-z]{1,10}){0,3}",
    ) {
        let mut assembler = started("question");
        let at = cut.index(words.len() + 1);
        for word in &words[..at] {
            assembler.ingest(word);
        }
        prop_assert_eq!(
            assembler.ingest(&format!("[ERROR]  {reason}  ")),
            FrameOutcome::Errored
        );
        for word in &words[at..] {
            assembler.ingest(word);
        }
        prop_assert_eq!(assembler.turn().status(), TurnStatus::Errored);
        prop_assert_eq!(assembler.error_text(), reason.as_str());
        prop_assert_eq!(assembler.reply_text(), "");
    }
}

// --- Turn lifecycle ---

proptest! {
    #[test]
    fn blank_submissions_never_start_a_turn(blank in "[ \t\r\n]{0,8}") {
        let mut assembler = ReplyAssembler::new();
        prop_assert_eq!(assembler.begin_turn(&blank).unwrap_err(), TurnRejected::EmptyMessage);
        prop_assert_eq!(assembler.turn().status(), TurnStatus::Idle);
        prop_assert_eq!(assembler.turn().sequence(), 0);
    }

    #[test]
    fn new_turn_always_resets(frames in prop::collection::vec(arb_frame(), 0..16)) {
        let mut assembler = started("first");
        for frame in &frames {
            assembler.ingest(frame);
        }
        if assembler.is_awaiting() {
            assembler.cancel("gave up");
        }

        assembler.begin_turn("second").unwrap();
        prop_assert_eq!(assembler.reply_text(), "");
        prop_assert_eq!(assembler.error_text(), "");
        prop_assert_eq!(assembler.turn().sequence(), 2);
        prop_assert!(assembler.is_awaiting());
    }

    #[test]
    fn at_most_one_turn_in_flight(frames in prop::collection::vec(arb_frame(), 0..16)) {
        let mut assembler = started("first");
        for frame in &frames {
            let was_awaiting = assembler.is_awaiting();
            let result = assembler.begin_turn("again");
            if was_awaiting {
                prop_assert_eq!(result.unwrap_err(), TurnRejected::TurnInFlight);
            } else {
                prop_assert!(result.is_ok());
            }
            assembler.ingest(frame);
        }
    }

    #[test]
    fn outcome_matches_classification(frame in arb_frame()) {
        let mut assembler = started("question");
        let expected = match Frame::classify(&frame) {
            Frame::End => FrameOutcome::Completed,
            Frame::Error(_) => FrameOutcome::Errored,
            Frame::Token(_) => FrameOutcome::Appended,
        };
        prop_assert_eq!(assembler.ingest(&frame), expected);
    }
}
