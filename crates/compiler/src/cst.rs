//! The grammar: non-terminal labels, their alternative right-hand sides,
//! and the concrete syntax tree node type the parser builds.

use std::rc::Rc;

use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Module,
    FunctionDefinition,
    VariablesList,
    VariablesListExpansion,
    CodeBlock,
    StatementList,
    Statement,
    VariableAssignment,
    FunctionCall,
    ConditionalEvaluation,
    ElseStatement,
    RValue,
    RValueList,
    RValueListExpansion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(Label),
}

/// A node in the concrete syntax tree: either a leaf carrying the token
/// it was matched from, or an interior node carrying its expanded
/// children in order.
#[derive(Debug, Clone)]
pub enum Node {
    Terminal {
        kind: TokenKind,
        text: String,
        file: Rc<str>,
        line: usize,
    },
    NonTerminal {
        label: Label,
        children: Vec<Node>,
        file: Rc<str>,
        line: usize,
    },
}

impl Node {
    pub fn file(&self) -> Rc<str> {
        match self {
            Node::Terminal { file, .. } => file.clone(),
            Node::NonTerminal { file, .. } => file.clone(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Node::Terminal { line, .. } => *line,
            Node::NonTerminal { line, .. } => *line,
        }
    }

    pub fn as_terminal(&self) -> Option<(TokenKind, &str)> {
        match self {
            Node::Terminal { kind, text, .. } => Some((*kind, text.as_str())),
            Node::NonTerminal { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::NonTerminal { children, .. } => children,
            Node::Terminal { .. } => &[],
        }
    }
}

/// The full production table from the grammar: one entry per
/// non-terminal, each an ordered list of alternative symbol sequences.
/// An empty sequence is the epsilon alternative.
pub fn alternatives(label: Label) -> &'static [&'static [Symbol]] {
    use Label::*;
    use Symbol::{NonTerminal as NT, Terminal as T};
    use TokenKind::*;

    match label {
        Module => &[
            &[NT(FunctionDefinition), NT(Module)],
            &[T(EndOfFile)],
        ],
        FunctionDefinition => &[&[
            T(FunctionName),
            T(LParen),
            NT(VariablesList),
            T(RParen),
            NT(CodeBlock),
        ]],
        VariablesList => &[&[T(Variable), NT(VariablesListExpansion)], &[]],
        VariablesListExpansion => &[
            &[T(Comma), T(Variable), NT(VariablesListExpansion)],
            &[],
        ],
        CodeBlock => &[&[T(LBrace), NT(StatementList), T(RBrace)]],
        StatementList => &[&[NT(Statement), NT(StatementList)], &[]],
        Statement => &[
            &[NT(VariableAssignment), T(Semicolon)],
            &[NT(FunctionCall), T(Semicolon)],
            &[T(While), NT(ConditionalEvaluation), NT(CodeBlock)],
            &[
                T(If),
                NT(ConditionalEvaluation),
                NT(CodeBlock),
                NT(ElseStatement),
            ],
            &[T(Return), NT(RValue), T(Semicolon)],
            &[T(Break), T(Semicolon)],
        ],
        VariableAssignment => &[
            &[T(Global), T(Variable), T(Equals), NT(RValue)],
            &[T(Variable), T(Equals), NT(RValue)],
        ],
        FunctionCall => &[
            &[T(FunctionName), T(LParen), NT(RValueList), T(RParen)],
            &[T(Builtin), T(LParen), NT(RValueList), T(RParen)],
        ],
        ConditionalEvaluation => &[&[T(LBracket), NT(RValue), T(RBracket)]],
        ElseStatement => &[
            &[T(Else), NT(CodeBlock)],
            &[
                T(Elif),
                NT(ConditionalEvaluation),
                NT(CodeBlock),
                NT(ElseStatement),
            ],
            &[],
        ],
        RValue => &[&[T(QuotedString)], &[T(Variable)], &[NT(FunctionCall)]],
        RValueList => &[&[NT(RValue), NT(RValueListExpansion)], &[]],
        RValueListExpansion => &[
            &[T(Comma), NT(RValue), NT(RValueListExpansion)],
            &[],
        ],
    }
}

/// Whether a token of the given kind could begin an expansion of `symbol`.
/// Recurses through non-terminals' non-epsilon alternatives to their
/// first symbol.
pub fn can_start(symbol: Symbol, token_kind: TokenKind) -> bool {
    match symbol {
        Symbol::Terminal(k) => k == token_kind,
        Symbol::NonTerminal(label) => alternatives(label)
            .iter()
            .any(|rhs| !rhs.is_empty() && can_start(rhs[0], token_kind)),
    }
}

/// Flattens a `List`/`ListExpansion` pair (`VariablesList` or
/// `RValueList`) into its ordered items, skipping the commas and
/// bottoming out at the epsilon alternative.
pub fn flatten_list(list_node: &Node) -> Vec<&Node> {
    let mut items = Vec::new();
    let children = list_node.children();
    if children.is_empty() {
        return items;
    }
    items.push(&children[0]);
    let mut expansion = &children[1];
    loop {
        let ec = expansion.children();
        if ec.is_empty() {
            break;
        }
        items.push(&ec[1]);
        expansion = &ec[2];
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_can_start_with_function_name_or_eof() {
        assert!(can_start(
            Symbol::NonTerminal(Label::Module),
            TokenKind::FunctionName
        ));
        assert!(can_start(
            Symbol::NonTerminal(Label::Module),
            TokenKind::EndOfFile
        ));
        assert!(!can_start(
            Symbol::NonTerminal(Label::Module),
            TokenKind::Variable
        ));
    }

    #[test]
    fn rvalue_can_start_with_quoted_string_variable_or_call_heads() {
        for k in [TokenKind::QuotedString, TokenKind::Variable, TokenKind::FunctionName, TokenKind::Builtin] {
            assert!(can_start(Symbol::NonTerminal(Label::RValue), k));
        }
        assert!(!can_start(Symbol::NonTerminal(Label::RValue), TokenKind::Comma));
    }

    fn term(kind: TokenKind, text: &str) -> Node {
        Node::Terminal {
            kind,
            text: text.to_string(),
            file: Rc::from("t.pb"),
            line: 1,
        }
    }

    fn nt(label: Label, children: Vec<Node>) -> Node {
        Node::NonTerminal {
            label,
            children,
            file: Rc::from("t.pb"),
            line: 1,
        }
    }

    #[test]
    fn flatten_list_handles_three_items() {
        // VariablesList: a, VariablesListExpansion(, b, VariablesListExpansion(, c, epsilon))
        let list = nt(
            Label::VariablesList,
            vec![
                term(TokenKind::Variable, "a"),
                nt(
                    Label::VariablesListExpansion,
                    vec![
                        term(TokenKind::Comma, ","),
                        term(TokenKind::Variable, "b"),
                        nt(
                            Label::VariablesListExpansion,
                            vec![
                                term(TokenKind::Comma, ","),
                                term(TokenKind::Variable, "c"),
                                nt(Label::VariablesListExpansion, vec![]),
                            ],
                        ),
                    ],
                ),
            ],
        );
        let items = flatten_list(&list);
        let names: Vec<&str> = items.iter().map(|n| n.as_terminal().unwrap().1).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn flatten_list_empty_is_empty() {
        let list = nt(Label::VariablesList, vec![]);
        assert!(flatten_list(&list).is_empty());
    }
}
