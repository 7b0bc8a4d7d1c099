//! Token kinds and the stateful character-by-character recognizers that
//! decide which kind a run of source text belongs to.

use std::rc::Rc;

/// Every terminal the grammar can reference, plus the synthetic
/// end-of-file marker appended after scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LBrace,
    RBrace,
    Semicolon,
    LParen,
    RParen,
    Comma,
    LBracket,
    RBracket,
    Equals,
    Global,
    While,
    If,
    Else,
    Elif,
    Return,
    Break,
    /// Reserved: lexes like a keyword but no grammar alternative ever
    /// references it, so any occurrence falls through to a parse error.
    KeywordLocal,
    QuotedString,
    Variable,
    Builtin,
    FunctionName,
    EndOfFile,
}

/// A scanned token: its kind, the exact source text it matched, and the
/// file/line it began on.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub file: Rc<str>,
    pub line: usize,
}

/// The three-method contract every token kind implements: feed a
/// character, ask whether the accepted prefix is itself legal, and
/// report how much has been consumed. Recognizers are stateful and
/// monotonic — once `search` rejects a character, it rejects everything
/// after it too.
pub trait Recognizer {
    fn kind(&self) -> TokenKind;
    fn search(&mut self, c: char) -> bool;
    fn is_finalizable(&self) -> bool;
    fn length(&self) -> usize;
    fn content(&self) -> &str;
}

/// A terminal matched by a fixed literal lexeme: punctuation and keywords.
pub struct FixedRecognizer {
    kind: TokenKind,
    lexeme: &'static str,
    matched: usize,
    stuck: bool,
}

impl FixedRecognizer {
    pub fn new(kind: TokenKind, lexeme: &'static str) -> Self {
        FixedRecognizer {
            kind,
            lexeme,
            matched: 0,
            stuck: false,
        }
    }
}

impl Recognizer for FixedRecognizer {
    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn search(&mut self, c: char) -> bool {
        if self.stuck {
            return false;
        }
        let bytes = self.lexeme.as_bytes();
        if self.matched < bytes.len() && c.is_ascii() && bytes[self.matched] == c as u8 {
            self.matched += 1;
            true
        } else {
            self.stuck = true;
            false
        }
    }

    fn is_finalizable(&self) -> bool {
        self.matched == self.lexeme.len()
    }

    fn length(&self) -> usize {
        self.matched
    }

    fn content(&self) -> &str {
        &self.lexeme[..self.matched]
    }
}

/// `Variable`: starts with a lowercase letter, continues with letters of
/// either case.
#[derive(Default)]
pub struct VariableRecognizer {
    content: String,
    stuck: bool,
}

impl Recognizer for VariableRecognizer {
    fn kind(&self) -> TokenKind {
        TokenKind::Variable
    }

    fn search(&mut self, c: char) -> bool {
        if self.stuck {
            return false;
        }
        let ok = c.is_ascii_lowercase() || (!self.content.is_empty() && c.is_ascii_uppercase());
        if ok {
            self.content.push(c);
            true
        } else {
            self.stuck = true;
            false
        }
    }

    fn is_finalizable(&self) -> bool {
        !self.content.is_empty()
    }

    fn length(&self) -> usize {
        self.content.len()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// `Builtin`: entirely uppercase letters.
#[derive(Default)]
pub struct BuiltinRecognizer {
    content: String,
    stuck: bool,
}

impl Recognizer for BuiltinRecognizer {
    fn kind(&self) -> TokenKind {
        TokenKind::Builtin
    }

    fn search(&mut self, c: char) -> bool {
        if self.stuck {
            return false;
        }
        if c.is_ascii_uppercase() {
            self.content.push(c);
            true
        } else {
            self.stuck = true;
            false
        }
    }

    fn is_finalizable(&self) -> bool {
        !self.content.is_empty()
    }

    fn length(&self) -> usize {
        self.content.len()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// `FunctionName`: starts with an uppercase letter, continues with
/// letters of either case, finalizable only once it has seen at least
/// one lowercase letter (the property that distinguishes it from `Builtin`).
#[derive(Default)]
pub struct FunctionNameRecognizer {
    content: String,
    stuck: bool,
    contains_lowercase: bool,
}

impl Recognizer for FunctionNameRecognizer {
    fn kind(&self) -> TokenKind {
        TokenKind::FunctionName
    }

    fn search(&mut self, c: char) -> bool {
        if self.stuck {
            return false;
        }
        if c.is_ascii_lowercase() && !self.content.is_empty() {
            self.contains_lowercase = true;
            self.content.push(c);
            true
        } else if c.is_ascii_uppercase() {
            self.content.push(c);
            true
        } else {
            self.stuck = true;
            false
        }
    }

    fn is_finalizable(&self) -> bool {
        !self.content.is_empty() && self.contains_lowercase
    }

    fn length(&self) -> usize {
        self.content.len()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// `QuotedString`: used only by the lexer's comment/string pre-split
/// phase, never placed in the longest-match candidate set. Content
/// includes the surrounding quotes verbatim.
#[derive(Default)]
pub struct QuotedStringRecognizer {
    content: String,
    backslashes_in_row: usize,
    no_more: bool,
    finalized: bool,
}

impl QuotedStringRecognizer {
    pub fn search(&mut self, c: char) -> bool {
        if self.no_more {
            return false;
        }
        if c == '\n' {
            self.no_more = true;
            return false;
        }
        if self.content.is_empty() {
            if c == '"' {
                self.content.push(c);
                return true;
            }
            self.no_more = true;
            return false;
        }
        if c == '"' && self.backslashes_in_row % 2 == 0 {
            self.no_more = true;
            self.finalized = true;
        } else if c == '\\' {
            self.backslashes_in_row += 1;
        } else {
            self.backslashes_in_row = 0;
        }
        self.content.push(c);
        true
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Builds one fresh recognizer of every kind the longest-match phase
/// competes over, in the declared tiebreak order: fixed-lexeme symbols,
/// then keywords (including the reserved `LOCAL`), then `Builtin`, then
/// `FunctionName`, then `Variable`. On an equal-length tie the earlier
/// entry in this list wins, which is how keywords beat `Builtin` for
/// e.g. `IF`.
pub fn candidate_recognizers() -> Vec<Box<dyn Recognizer>> {
    vec![
        Box::new(FixedRecognizer::new(TokenKind::LBrace, "{")),
        Box::new(FixedRecognizer::new(TokenKind::RBrace, "}")),
        Box::new(FixedRecognizer::new(TokenKind::Semicolon, ";")),
        Box::new(FixedRecognizer::new(TokenKind::LParen, "(")),
        Box::new(FixedRecognizer::new(TokenKind::RParen, ")")),
        Box::new(FixedRecognizer::new(TokenKind::Comma, ",")),
        Box::new(FixedRecognizer::new(TokenKind::LBracket, "[")),
        Box::new(FixedRecognizer::new(TokenKind::RBracket, "]")),
        Box::new(FixedRecognizer::new(TokenKind::Equals, "=")),
        Box::new(FixedRecognizer::new(TokenKind::Global, "GLOBAL")),
        Box::new(FixedRecognizer::new(TokenKind::While, "WHILE")),
        Box::new(FixedRecognizer::new(TokenKind::If, "IF")),
        Box::new(FixedRecognizer::new(TokenKind::Else, "ELSE")),
        Box::new(FixedRecognizer::new(TokenKind::Elif, "ELIF")),
        Box::new(FixedRecognizer::new(TokenKind::Return, "RETURN")),
        Box::new(FixedRecognizer::new(TokenKind::Break, "BREAK")),
        Box::new(FixedRecognizer::new(TokenKind::KeywordLocal, "LOCAL")),
        Box::new(BuiltinRecognizer::default()),
        Box::new(FunctionNameRecognizer::default()),
        Box::new(VariableRecognizer::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalizable_kinds(text: &str) -> Vec<(TokenKind, usize)> {
        let mut recognizers = candidate_recognizers();
        for c in text.chars() {
            for r in recognizers.iter_mut() {
                r.search(c);
            }
        }
        recognizers
            .iter()
            .filter(|r| r.is_finalizable())
            .map(|r| (r.kind(), r.length()))
            .collect()
    }

    #[test]
    fn keyword_beats_builtin_on_tie() {
        let survivors = finalizable_kinds("IF");
        let max_len = survivors.iter().map(|(_, l)| *l).max().unwrap();
        let winners: Vec<_> = survivors.iter().filter(|(_, l)| *l == max_len).collect();
        assert_eq!(winners.len(), 2); // If and Builtin both finalize at length 2
        assert_eq!(winners[0].0, TokenKind::If); // declared first, wins the tie
    }

    #[test]
    fn variable_requires_leading_lowercase() {
        let mut r = VariableRecognizer::default();
        assert!(!r.search('F'));
    }

    #[test]
    fn variable_allows_inner_uppercase() {
        let mut r = VariableRecognizer::default();
        for c in "fooBar".chars() {
            assert!(r.search(c));
        }
        assert_eq!(r.content(), "fooBar");
        assert!(r.is_finalizable());
    }

    #[test]
    fn function_name_requires_a_lowercase_letter() {
        let mut r = FunctionNameRecognizer::default();
        for c in "FOO".chars() {
            r.search(c);
        }
        assert!(!r.is_finalizable());
    }

    #[test]
    fn builtin_rejects_lowercase() {
        let mut r = BuiltinRecognizer::default();
        assert!(r.search('F'));
        assert!(!r.search('o'));
    }

    #[test]
    fn quoted_string_backslash_escaping() {
        let mut r = QuotedStringRecognizer::default();
        for c in "\"a\\\"b\"".chars() {
            r.search(c);
        }
        assert!(r.is_finalized());
        assert_eq!(r.content(), "\"a\\\"b\"");
    }

    #[test]
    fn quoted_string_even_backslashes_close_it() {
        let mut r = QuotedStringRecognizer::default();
        let text = "\"a\\\\\""; // a, \\, \\, " -> even backslashes then quote closes
        for c in text.chars() {
            r.search(c);
        }
        assert!(r.is_finalized());
    }
}
