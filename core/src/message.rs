use crate::error::{AelError, Result};
use crate::{CONTENT_PREFIX, CONTENT_QUOTE, MAX_CHAR_CODE, MIN_CHAR_CODE, TOKEN_DELIMITER};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Vocabulary symbol name
    Symbol(String),
    /// Free text, printable ASCII only
    Content(String),
    /// Decoded frequency that matched nothing
    Unknown(u32),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(name) => f.write_str(name),
            Token::Content(text) => write!(f, "{}{}{}", CONTENT_PREFIX, text, CONTENT_QUOTE),
            Token::Unknown(frequency) => write!(f, "UNKNOWN({})", frequency),
        }
    }
}

/// Ordered token sequence; `|`-separated in text form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    tokens: Vec<Token>,
}

impl Message {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Parse the `|`-separated text form
    ///
    /// A token beginning with `CONTENT"` runs to the first `"` that is followed
    /// by `|` or the end of input, so the text may contain `"` and `|` as long
    /// as it never contains `"|`. Empty segments are ignored.
    ///
    /// # Errors
    ///
    /// `UnterminatedContent` when a content literal has no closing quote,
    /// `InvalidContentChar` when its text is not printable ASCII.
    pub fn parse(input: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];

            if let Some(body) = rest.strip_prefix(CONTENT_PREFIX) {
                let body_start = pos + CONTENT_PREFIX.len();
                let end = find_content_end(body)
                    .ok_or(AelError::UnterminatedContent { position: pos })?;
                let text = &body[..end];

                if let Some((offset, ch)) = text
                    .char_indices()
                    .find(|&(_, ch)| !is_printable_ascii(ch))
                {
                    return Err(AelError::InvalidContentChar {
                        ch,
                        position: body_start + offset,
                    });
                }

                tokens.push(Token::Content(text.to_string()));
                // Skip closing quote and the delimiter after it, if any
                pos = body_start + end + CONTENT_QUOTE.len_utf8() + TOKEN_DELIMITER.len_utf8();
                continue;
            }

            let end = rest.find(TOKEN_DELIMITER).unwrap_or(rest.len());
            let name = &rest[..end];
            if !name.is_empty() {
                tokens.push(Token::Symbol(name.to_string()));
            }
            pos += end + TOKEN_DELIMITER.len_utf8();
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Same message with `Unknown` placeholders removed
    pub fn without_unknown(&self) -> Self {
        Self {
            tokens: self
                .tokens
                .iter()
                .filter(|token| !matches!(token, Token::Unknown(_)))
                .cloned()
                .collect(),
        }
    }

    pub fn has_unknown(&self) -> bool {
        self.tokens.iter().any(|token| matches!(token, Token::Unknown(_)))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", TOKEN_DELIMITER)?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for Message {
    type Err = AelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Vec<Token>> for Message {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

pub(crate) fn is_printable_ascii(ch: char) -> bool {
    (MIN_CHAR_CODE..=MAX_CHAR_CODE).contains(&(ch as u32))
}

/// Byte offset of the closing quote: the first `"` followed by `|` or end of input
fn find_content_end(body: &str) -> Option<usize> {
    body.match_indices(CONTENT_QUOTE)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            let after = &body[idx + CONTENT_QUOTE.len_utf8()..];
            after.is_empty() || after.starts_with(TOKEN_DELIMITER)
        })
}
