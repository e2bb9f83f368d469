/// Terminal choice provider: shows each pair of tasks and reads "1" or "2".
///
/// Questions go to stderr so that stdout carries nothing but the final
/// ranking. When the answer stream ends the chooser signals `hangup` and never
/// resolves; the host is expected to drop the session at that point.
use std::future::pending;
use std::io::Write;
use std::sync::Arc;

use taskrank_core::{Choice, ChoiceProvider, Matchup};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::Notify;
use tracing::{debug, warn};

pub const DEFAULT_QUESTION: &str = "Which task is more important?";

/// Build the text shown for one matchup.
pub fn build_prompt(question: &str, matchup: &Matchup<'_>) -> String {
    format!(
        "\n[{}/{}] {question}\n  1) {}\n  2) {}\n> ",
        matchup.position,
        matchup.total,
        matchup.first.label(),
        matchup.second.label(),
    )
}

/// Parse an answer line. Only "1" and "2" (surrounding whitespace ignored) count.
pub fn parse_answer(line: &str) -> Option<Choice> {
    match line.trim() {
        "1" => Some(Choice::First),
        "2" => Some(Choice::Second),
        _ => None,
    }
}

pub struct TerminalChooser<R> {
    answers: Lines<R>,
    question: String,
    hangup: Arc<Notify>,
}

impl<R: AsyncBufRead + Unpin> TerminalChooser<R> {
    pub fn new(reader: R, question: impl Into<String>, hangup: Arc<Notify>) -> Self {
        TerminalChooser {
            answers: reader.lines(),
            question: question.into(),
            hangup,
        }
    }

    async fn next_answer(&mut self) -> Option<String> {
        let _ = std::io::stderr().flush();
        match self.answers.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read answer");
                None
            }
        }
    }
}

impl<R: AsyncBufRead + Unpin> ChoiceProvider for TerminalChooser<R> {
    async fn choose(&mut self, matchup: Matchup<'_>) -> Choice {
        eprint!("{}", build_prompt(&self.question, &matchup));

        loop {
            let Some(line) = self.next_answer().await else {
                debug!(position = matchup.position, "answer stream closed");
                self.hangup.notify_one();
                return pending().await;
            };

            if let Some(choice) = parse_answer(&line) {
                return choice;
            }
            eprint!("Please answer 1 or 2.\n> ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use taskrank_core::{ItemId, RatingStore};

    fn store() -> RatingStore {
        RatingStore::initialize(["Pay rent", "Water plants"]).unwrap()
    }

    fn matchup(store: &RatingStore) -> Matchup<'_> {
        Matchup {
            first: store.get(ItemId::from(0)).unwrap(),
            second: store.get(ItemId::from(1)).unwrap(),
            position: 1,
            total: 1,
        }
    }

    #[test]
    fn test_build_prompt_contains_all_parts() {
        let store = store();
        let prompt = build_prompt(DEFAULT_QUESTION, &matchup(&store));
        assert!(prompt.contains("[1/1] Which task is more important?"));
        assert!(prompt.contains("1) Pay rent"));
        assert!(prompt.contains("2) Water plants"));
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("1"), Some(Choice::First));
        assert_eq!(parse_answer("  2 \r"), Some(Choice::Second));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("3"), None);
        assert_eq!(parse_answer("Pay rent"), None);
    }

    #[tokio::test]
    async fn test_invalid_answers_are_asked_again() {
        let store = store();
        let hangup = Arc::new(Notify::new());
        let mut chooser = TerminalChooser::new(b"maybe\n\n2\n1\n".as_slice(), DEFAULT_QUESTION, hangup);

        assert_eq!(chooser.choose(matchup(&store)).await, Choice::Second);
        assert_eq!(chooser.choose(matchup(&store)).await, Choice::First);
    }

    #[tokio::test]
    async fn test_closed_stream_signals_hangup() {
        let store = store();
        let hangup = Arc::new(Notify::new());
        let mut chooser = TerminalChooser::new(b"nope\n".as_slice(), DEFAULT_QUESTION, hangup.clone());

        tokio::select! {
            choice = chooser.choose(matchup(&store)) => panic!("closed stream produced {choice:?}"),
            _ = hangup.notified() => {}
            _ = tokio::time::sleep(Duration::from_secs(5)) => panic!("hangup was never signalled"),
        }
    }
}
