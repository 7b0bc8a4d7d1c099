//! Emitters for `RValue` and `FunctionCall` nodes: expression-position
//! code that never carries a trailing semicolon.

use crate::codegen::error::CodeGenError;
use crate::codegen::runtime;
use crate::codegen::state::CompilationContext;
use crate::cst::{flatten_list, Node};
use crate::token::TokenKind;

pub enum RValueEmitter {
    QuotedString(String),
    Variable(String),
    FunctionCall(Box<FunctionCallEmitter>),
}

impl RValueEmitter {
    pub fn try_create(
        node: &Node,
        ctx: &CompilationContext,
    ) -> Result<Self, CodeGenError> {
        let child = &node.children()[0];
        match child.as_terminal() {
            Some((TokenKind::QuotedString, text)) => {
                Ok(RValueEmitter::QuotedString(text.to_string()))
            }
            Some((TokenKind::Variable, name)) => {
                if ctx.is_local(name) {
                    Ok(RValueEmitter::Variable(format!("LOCAL_VAR_{name}")))
                } else if ctx.is_global(name) {
                    Ok(RValueEmitter::Variable(format!("GLOBAL_VAR_{name}")))
                } else {
                    Err(CodeGenError::new(
                        child.file(),
                        child.line(),
                        format!("undefined variable {name}"),
                    ))
                }
            }
            None => Ok(RValueEmitter::FunctionCall(Box::new(
                FunctionCallEmitter::try_create(child, ctx)?,
            ))),
            Some((other, _)) => unreachable!("RValue cannot start with {other:?}"),
        }
    }

    pub fn get_code(&self) -> String {
        match self {
            RValueEmitter::QuotedString(text) => text.clone(),
            RValueEmitter::Variable(ident) => ident.clone(),
            RValueEmitter::FunctionCall(call) => call.get_code(),
        }
    }
}

pub struct FunctionCallEmitter {
    target_name: String,
    args: Vec<RValueEmitter>,
}

impl FunctionCallEmitter {
    pub fn try_create(
        node: &Node,
        ctx: &CompilationContext,
    ) -> Result<Self, CodeGenError> {
        let children = node.children();
        let (head_kind, head_text) = children[0].as_terminal().expect("call head terminal");
        let rvalue_list = &children[2];

        let (target_name, expected_arity) = match head_kind {
            TokenKind::FunctionName => {
                let f = ctx.functions.get(head_text).ok_or_else(|| {
                    CodeGenError::new(
                        children[0].file(),
                        children[0].line(),
                        format!("undefined function {head_text}"),
                    )
                })?;
                (format!("{head_text}_poiboi_fn"), f.params.len())
            }
            TokenKind::Builtin => {
                let decl = runtime::lookup(head_text).ok_or_else(|| {
                    CodeGenError::new(
                        children[0].file(),
                        children[0].line(),
                        format!("unknown builtin {head_text}"),
                    )
                })?;
                (decl.target_name.to_string(), decl.arity)
            }
            other => unreachable!("FunctionCall cannot start with {other:?}"),
        };

        let arg_nodes = flatten_list(rvalue_list);
        if arg_nodes.len() != expected_arity {
            return Err(CodeGenError::new(
                node.file(),
                node.line(),
                format!(
                    "{head_text} expects {expected_arity} argument(s), got {}",
                    arg_nodes.len()
                ),
            ));
        }

        let mut args = Vec::with_capacity(arg_nodes.len());
        for arg in arg_nodes {
            args.push(RValueEmitter::try_create(arg, ctx)?);
        }

        Ok(FunctionCallEmitter { target_name, args })
    }

    pub fn get_code(&self) -> String {
        let args = self
            .args
            .iter()
            .map(RValueEmitter::get_code)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.target_name, args)
    }
}
