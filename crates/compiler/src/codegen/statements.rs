//! Emitters for `CodeBlock`, `StatementList`, `Statement` and its six
//! forms. Each returns a statement-terminated chunk of target text.

use crate::codegen::error::CodeGenError;
use crate::codegen::rvalue::{FunctionCallEmitter, RValueEmitter};
use crate::codegen::state::CompilationContext;
use crate::cst::{Label, Node};
use crate::token::TokenKind;

pub fn emit_code_block(
    node: &Node,
    ctx: &mut CompilationContext,
) -> Result<String, CodeGenError> {
    let children = node.children();
    emit_statement_list(&children[1], ctx)
}

fn emit_statement_list(
    node: &Node,
    ctx: &mut CompilationContext,
) -> Result<String, CodeGenError> {
    let children = node.children();
    if children.is_empty() {
        return Ok(String::new());
    }
    let mut code = emit_statement(&children[0], ctx)?;
    code.push_str(&emit_statement_list(&children[1], ctx)?);
    Ok(code)
}

fn emit_statement(node: &Node, ctx: &mut CompilationContext) -> Result<String, CodeGenError> {
    let children = node.children();
    match &children[0] {
        Node::NonTerminal { label: Label::VariableAssignment, .. } => {
            emit_variable_assignment(&children[0], ctx)
        }
        Node::NonTerminal { label: Label::FunctionCall, .. } => {
            let call = FunctionCallEmitter::try_create(&children[0], ctx)?;
            Ok(format!("{};\n", call.get_code()))
        }
        Node::Terminal { kind: TokenKind::While, .. } => emit_while(node, ctx),
        Node::Terminal { kind: TokenKind::If, .. } => emit_if(node, ctx),
        Node::Terminal { kind: TokenKind::Return, .. } => emit_return(node, ctx),
        Node::Terminal { kind: TokenKind::Break, .. } => emit_break(node, ctx),
        other => unreachable!("Statement cannot start with {other:?}"),
    }
}

fn emit_variable_assignment(
    node: &Node,
    ctx: &mut CompilationContext,
) -> Result<String, CodeGenError> {
    let children = node.children();
    if children.len() == 4 {
        let name = children[1].as_terminal().expect("Variable terminal").1;
        let rv = RValueEmitter::try_create(&children[3], ctx)?;
        ctx.add_global(name);
        return Ok(format!("GLOBAL_VAR_{name} = {};\n", rv.get_code()));
    }

    let name = children[0].as_terminal().expect("Variable terminal").1;
    let rv = RValueEmitter::try_create(&children[2], ctx)?;
    if ctx.is_local(name) {
        Ok(format!("LOCAL_VAR_{name} = {};\n", rv.get_code()))
    } else if ctx.is_global(name) {
        Ok(format!("GLOBAL_VAR_{name} = {};\n", rv.get_code()))
    } else {
        ctx.add_local(name);
        Ok(format!("PBString LOCAL_VAR_{name} = {};\n", rv.get_code()))
    }
}

fn emit_while(node: &Node, ctx: &mut CompilationContext) -> Result<String, CodeGenError> {
    let children = node.children();
    let cond_children = children[1].children();
    let cond = RValueEmitter::try_create(&cond_children[1], ctx)?;

    let mut loop_ctx = ctx.fork_for_loop();
    let body = emit_code_block(&children[2], &mut loop_ctx)?;
    Ok(format!("while ({}) {{\n{}}}\n", cond.get_code(), body))
}

fn emit_if(node: &Node, ctx: &mut CompilationContext) -> Result<String, CodeGenError> {
    let children = node.children();
    let cond_children = children[1].children();
    let cond = RValueEmitter::try_create(&cond_children[1], ctx)?;
    let body = emit_code_block(&children[2], ctx)?;
    let tail = emit_else(&children[3], ctx)?;
    Ok(format!("if ({}) {{\n{}}}\n{}", cond.get_code(), body, tail))
}

fn emit_else(node: &Node, ctx: &mut CompilationContext) -> Result<String, CodeGenError> {
    let children = node.children();
    if children.is_empty() {
        return Ok(String::new());
    }
    if children.len() == 2 {
        let body = emit_code_block(&children[1], ctx)?;
        return Ok(format!(" else {{\n{body}}}\n"));
    }
    // ELIF ConditionalEvaluation CodeBlock ElseStatement
    let cond_children = children[1].children();
    let cond = RValueEmitter::try_create(&cond_children[1], ctx)?;
    let body = emit_code_block(&children[2], ctx)?;
    let tail = emit_else(&children[3], ctx)?;
    Ok(format!(
        " else if ({}) {{\n{}}}\n{}",
        cond.get_code(),
        body,
        tail
    ))
}

fn emit_return(node: &Node, ctx: &mut CompilationContext) -> Result<String, CodeGenError> {
    let children = node.children();
    let rv = RValueEmitter::try_create(&children[1], ctx)?;
    Ok(format!("return {};\n", rv.get_code()))
}

fn emit_break(node: &Node, ctx: &CompilationContext) -> Result<String, CodeGenError> {
    if !ctx.is_in_loop {
        return Err(CodeGenError::new(
            node.file(),
            node.line(),
            "BREAK used outside of a loop",
        ));
    }
    Ok("break;\n".to_string())
}
