//! Predictive recursive-descent expansion of the grammar against a
//! token stream, producing a concrete syntax tree.

use crate::cst::{alternatives, can_start, Label, Node, Symbol};
use crate::error::CompileError;
use crate::token::{Token, TokenKind};

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn parse_terminal(&mut self, kind: TokenKind) -> Result<Node, CompileError> {
        let tok = self.peek();
        if tok.kind != kind {
            return Err(CompileError::Parse {
                file: tok.file.clone(),
                line: tok.line,
                message: format!("expected {:?}, got {:?}", kind, tok.kind),
            });
        }
        let node = Node::Terminal {
            kind: tok.kind,
            text: tok.text.clone(),
            file: tok.file.clone(),
            line: tok.line,
        };
        self.pos += 1;
        Ok(node)
    }

    fn parse_nonterminal(&mut self, label: Label) -> Result<Node, CompileError> {
        let tok = self.peek();
        let file = tok.file.clone();
        let line = tok.line;
        let kind = tok.kind;

        let alts = alternatives(label);
        let chosen = alts
            .iter()
            .find(|rhs| !rhs.is_empty() && can_start(rhs[0], kind));

        match chosen {
            Some(rhs) => {
                let mut children = Vec::with_capacity(rhs.len());
                for symbol in *rhs {
                    children.push(self.parse_symbol(*symbol)?);
                }
                Ok(Node::NonTerminal {
                    label,
                    children,
                    file,
                    line,
                })
            }
            None => {
                if alts.iter().any(|rhs| rhs.is_empty()) {
                    Ok(Node::NonTerminal {
                        label,
                        children: Vec::new(),
                        file,
                        line,
                    })
                } else {
                    Err(CompileError::Parse {
                        file,
                        line,
                        message: format!("unexpected token {:?} in {:?}", kind, label),
                    })
                }
            }
        }
    }

    fn parse_symbol(&mut self, symbol: Symbol) -> Result<Node, CompileError> {
        match symbol {
            Symbol::Terminal(kind) => self.parse_terminal(kind),
            Symbol::NonTerminal(label) => self.parse_nonterminal(label),
        }
    }
}

/// Parses a full token stream (including its trailing `EndOfFile`) into
/// a `Module` chain, erroring if any tokens remain unconsumed.
pub fn parse_module(tokens: &[Token]) -> Result<Node, CompileError> {
    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.parse_nonterminal(Label::Module)?;
    if parser.pos != tokens.len() {
        let tok = &tokens[parser.pos];
        return Err(CompileError::Parse {
            file: tok.file.clone(),
            line: tok.line,
            message: "unconsumed tokens at end of input".to_string(),
        });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use std::rc::Rc;

    fn parse(source: &str) -> Result<Node, CompileError> {
        let file: Rc<str> = Rc::from("t.pb");
        let tokens = lex(source, &file).unwrap();
        parse_module(&tokens)
    }

    fn leaf_kinds(node: &Node, out: &mut Vec<TokenKind>) {
        match node {
            Node::Terminal { kind, .. } => {
                if *kind != TokenKind::EndOfFile {
                    out.push(*kind);
                }
            }
            Node::NonTerminal { children, .. } => {
                for c in children {
                    leaf_kinds(c, out);
                }
            }
        }
    }

    #[test]
    fn parses_minimal_function() {
        let tree = parse("Main() { PRINT(\"hi\"); }").unwrap();
        let mut leaves = Vec::new();
        leaf_kinds(&tree, &mut leaves);
        assert_eq!(
            leaves,
            vec![
                TokenKind::FunctionName,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Builtin,
                TokenKind::LParen,
                TokenKind::QuotedString,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn reserved_local_keyword_is_a_parse_error() {
        assert!(parse("Main() { LOCAL = \"x\"; }").is_err());
    }

    #[test]
    fn unexpected_token_reports_position() {
        let err = parse("Main() }").unwrap_err();
        match err {
            CompileError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn if_elif_else_chain_parses() {
        let tree = parse(
            "Main() { IF [EQUAL(\"a\",\"a\")] { PRINT(\"a\"); } ELIF [EQUAL(\"b\",\"b\")] { PRINT(\"b\"); } ELSE { PRINT(\"c\"); } }",
        );
        assert!(tree.is_ok());
    }

    #[test]
    fn while_with_break_parses() {
        assert!(parse("Main() { WHILE [NOT(EQUAL(\"a\",\"b\"))] { BREAK; } }").is_ok());
    }
}
