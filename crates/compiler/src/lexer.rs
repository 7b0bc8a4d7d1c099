//! Turns raw source text into a token stream.
//!
//! Scanning happens in four phases: split out comments and quoted
//! strings (tracking line numbers through both), split the remaining
//! code into whitespace-delimited runs, greedily tokenize each run by
//! longest match, then append the synthetic end-of-file token.

use std::rc::Rc;

use crate::error::CompileError;
use crate::token::{candidate_recognizers, Token, TokenKind};

enum Item {
    Code { text: String, start_line: usize },
    Str { text: String, line: usize },
}

fn split_comments_and_strings(source: &str, file: &Rc<str>) -> Result<Vec<Item>, CompileError> {
    let mut items = Vec::new();
    let mut code = String::new();
    let mut code_start_line = 1usize;
    let mut line = 1usize;
    let mut in_comment = false;
    let mut comment_start_line = 0usize;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '#' {
                in_comment = false;
            } else if c == '\n' {
                line += 1;
            }
            continue;
        }
        if c == '#' {
            if !code.is_empty() {
                items.push(Item::Code {
                    text: std::mem::take(&mut code),
                    start_line: code_start_line,
                });
            }
            in_comment = true;
            comment_start_line = line;
            continue;
        }
        if c == '"' {
            if !code.is_empty() {
                items.push(Item::Code {
                    text: std::mem::take(&mut code),
                    start_line: code_start_line,
                });
            }
            let string_line = line;
            let mut content = String::new();
            content.push('"');
            let mut backslashes_in_row = 0usize;
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '\n' {
                    break;
                }
                if c == '"' && backslashes_in_row % 2 == 0 {
                    content.push(c);
                    closed = true;
                    break;
                }
                if c == '\\' {
                    backslashes_in_row += 1;
                } else {
                    backslashes_in_row = 0;
                }
                content.push(c);
            }
            if !closed {
                return Err(CompileError::Lex {
                    file: file.clone(),
                    line: string_line,
                    message: "unterminated quoted string".to_string(),
                });
            }
            items.push(Item::Str {
                text: content,
                line: string_line,
            });
            code_start_line = line;
            continue;
        }
        if c == '\n' {
            line += 1;
        }
        code.push(c);
    }

    if in_comment {
        return Err(CompileError::Lex {
            file: file.clone(),
            line: comment_start_line,
            message: "unterminated comment".to_string(),
        });
    }
    if !code.is_empty() {
        items.push(Item::Code {
            text: code,
            start_line: code_start_line,
        });
    }
    Ok(items)
}

/// A maximal run of non-whitespace text within a code item, with the
/// line it starts on.
struct Run {
    text: String,
    line: usize,
}

fn split_whitespace_runs(text: &str, start_line: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut current_line = start_line;
    let mut line = start_line;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !current.is_empty() {
                runs.push(Run {
                    text: std::mem::take(&mut current),
                    line: current_line,
                });
            }
            if c == '\n' {
                line += 1;
            }
            continue;
        }
        if current.is_empty() {
            current_line = line;
        }
        current.push(c);
    }
    if !current.is_empty() {
        runs.push(Run {
            text: current,
            line: current_line,
        });
    }
    runs
}

/// Greedily tokenizes one whitespace-delimited run by repeatedly taking
/// the longest finalizable match at the current position, preferring
/// the earliest-declared candidate on a length tie.
fn tokenize_run(run: &Run, file: &Rc<str>) -> Result<Vec<Token>, CompileError> {
    let chars: Vec<char> = run.text.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < chars.len() {
        let mut recognizers = candidate_recognizers();
        let mut best: Option<(usize, usize)> = None; // (length, recognizer index)
        let mut i = 0usize;
        while pos + i < chars.len() {
            let c = chars[pos + i];
            let mut any_alive = false;
            let mut step_best: Option<(usize, usize)> = None;
            for (idx, r) in recognizers.iter_mut().enumerate() {
                let alive = r.search(c);
                any_alive |= alive;
                if r.is_finalizable() {
                    let len = r.length();
                    if step_best.map(|(l, _)| len > l).unwrap_or(true) {
                        step_best = Some((len, idx));
                    }
                }
            }
            if let Some((len, idx)) = step_best {
                if best.map(|(l, _)| len > l).unwrap_or(true) {
                    best = Some((len, idx));
                }
            }
            i += 1;
            if !any_alive {
                break;
            }
        }

        match best {
            Some((len, idx)) => {
                let text: String = chars[pos..pos + len].iter().collect();
                let kind = recognizers[idx].kind();
                tokens.push(Token {
                    kind,
                    text,
                    file: file.clone(),
                    line: run.line,
                });
                pos += len;
            }
            None => {
                let offending: String = chars[pos..].iter().collect();
                return Err(CompileError::Lex {
                    file: file.clone(),
                    line: run.line,
                    message: format!("unrecognized token starting at '{offending}'"),
                });
            }
        }
    }

    Ok(tokens)
}

/// Scans a whole source file into its token stream, ending with a
/// synthetic [`TokenKind::EndOfFile`].
pub fn lex(source: &str, file: &Rc<str>) -> Result<Vec<Token>, CompileError> {
    let items = split_comments_and_strings(source, file)?;
    let mut tokens = Vec::new();
    for item in items {
        match item {
            Item::Code { text, start_line } => {
                for run in split_whitespace_runs(&text, start_line) {
                    tokens.extend(tokenize_run(&run, file)?);
                }
            }
            Item::Str { text, line } => {
                tokens.push(Token {
                    kind: TokenKind::QuotedString,
                    text,
                    file: file.clone(),
                    line,
                });
            }
        }
    }
    let eof_line = tokens.last().map(|t| t.line).unwrap_or(1);
    tokens.push(Token {
        kind: TokenKind::EndOfFile,
        text: String::new(),
        file: file.clone(),
        line: eof_line,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Rc<str> {
        Rc::from("test.pb")
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source, &file()).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn splits_adjacent_tokens_without_whitespace() {
        assert_eq!(
            kinds("Foo(bar,baz)"),
            vec![
                TokenKind::FunctionName,
                TokenKind::LParen,
                TokenKind::Variable,
                TokenKind::Comma,
                TokenKind::Variable,
                TokenKind::RParen,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn skips_comments_and_tracks_lines() {
        let tokens = lex("a #this is\na comment# = b;", &file()).unwrap();
        let assign = tokens.iter().find(|t| t.kind == TokenKind::Equals).unwrap();
        assert_eq!(assign.line, 2);
    }

    #[test]
    fn unterminated_comment_errors() {
        assert!(lex("a # oops", &file()).is_err());
    }

    #[test]
    fn unterminated_string_errors() {
        assert!(lex("a = \"oops;", &file()).is_err());
    }

    #[test]
    fn quoted_string_keeps_escaped_quote_verbatim() {
        let tokens = lex("\"a\\\"b\"", &file()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::QuotedString);
        assert_eq!(tokens[0].text, "\"a\\\"b\"");
    }

    #[test]
    fn keyword_local_lexes_but_is_just_a_token() {
        let tokens = lex("LOCAL", &file()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::KeywordLocal);
    }

    #[test]
    fn non_ascii_whitespace_does_not_split_a_run() {
        // U+00A0 NBSP is Unicode-whitespace but not ASCII-whitespace: it
        // must not be treated as a separator, so "a\u{A0}b" stays one run
        // that no recognizer can fully consume.
        assert!(lex("a\u{00A0}b", &file()).is_err());
    }
}
