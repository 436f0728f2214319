//! Turns per-window classifications back into message tokens

use crate::matcher::Classification;
use crate::message::Token;

/// Collapse runs of identical consecutive items to a single item
///
/// One encoded token spans several analysis windows, so it arrives as a run of
/// identical classifications. Applying this twice changes nothing.
pub fn collapse_runs<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut collapsed = items;
    collapsed.dedup();
    collapsed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InsideContent,
}

/// Rebuild tokens from a classification sequence
///
/// Runs are collapsed first, then consecutive characters are gathered into one
/// `Content` token, and the resulting tokens are collapsed again. `Silence`
/// entries are ignored.
pub fn assemble(classifications: Vec<Classification>) -> Vec<Token> {
    let classifications = collapse_runs(
        classifications
            .into_iter()
            .filter(|c| *c != Classification::Silence)
            .collect(),
    );

    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut state = State::Outside;

    for classification in classifications {
        let token = match classification {
            Classification::Char(ch) => {
                buffer.push(ch);
                state = State::InsideContent;
                continue;
            }
            Classification::Symbol(symbol) => Token::Symbol(symbol),
            Classification::Unknown(frequency) => Token::Unknown(frequency),
            Classification::Silence => continue,
        };

        if state == State::InsideContent {
            tokens.push(Token::Content(std::mem::take(&mut buffer)));
            state = State::Outside;
        }
        tokens.push(token);
    }

    if state == State::InsideContent {
        tokens.push(Token::Content(buffer));
    }

    collapse_runs(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Classification {
        Classification::Symbol(name.to_string())
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapse_runs(vec![1, 1, 2, 2, 2, 1, 3, 3]), vec![1, 2, 1, 3]);
        assert_eq!(collapse_runs(Vec::<u8>::new()), Vec::<u8>::new());
    }

    #[test]
    fn test_collapse_runs_idempotent() {
        let once = collapse_runs(vec!['a', 'a', 'b', 'a', 'a', 'a', 'c']);
        let twice = collapse_runs(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, vec!['a', 'b', 'a', 'c']);
    }

    #[test]
    fn test_symbols_only() {
        let tokens = assemble(vec![
            sym("REQ"),
            sym("REQ"),
            Classification::Silence,
            sym("ACT"),
            sym("ACT"),
        ]);
        assert_eq!(
            tokens,
            vec![Token::Symbol("REQ".into()), Token::Symbol("ACT".into())]
        );
    }

    #[test]
    fn test_content_between_symbols() {
        let tokens = assemble(vec![
            sym("REQ"),
            Classification::Char('h'),
            Classification::Char('h'),
            Classification::Char('i'),
            sym("ACT"),
        ]);
        assert_eq!(
            tokens,
            vec![
                Token::Symbol("REQ".into()),
                Token::Content("hi".into()),
                Token::Symbol("ACT".into()),
            ]
        );
    }

    #[test]
    fn test_content_flushed_at_end() {
        let tokens = assemble(vec![Classification::Char('o'), Classification::Char('k')]);
        assert_eq!(tokens, vec![Token::Content("ok".into())]);
    }

    #[test]
    fn test_unknown_flushes_content() {
        let tokens = assemble(vec![
            Classification::Char('a'),
            Classification::Unknown(6500),
            Classification::Char('b'),
        ]);
        assert_eq!(
            tokens,
            vec![
                Token::Content("a".into()),
                Token::Unknown(6500),
                Token::Content("b".into()),
            ]
        );
    }

    #[test]
    fn test_silence_only_is_empty() {
        let tokens = assemble(vec![Classification::Silence; 10]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_repeat_separated_by_silence_collapses() {
        // Silence is dropped before run collapsing, so a repeated symbol merges
        let tokens = assemble(vec![sym("REQ"), Classification::Silence, sym("REQ")]);
        assert_eq!(tokens, vec![Token::Symbol("REQ".into())]);
    }
}
