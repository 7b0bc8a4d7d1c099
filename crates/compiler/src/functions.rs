//! Flattens the parsed `Module` chain into a name-to-function table.

use std::collections::HashMap;
use std::rc::Rc;

use crate::cst::{flatten_list, Node};
use crate::error::CompileError;

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Node,
    pub file: Rc<str>,
    pub line: usize,
}

/// Walks a `Module` chain collecting its `FunctionDefinition` children
/// in source order, stopping at the terminating `EndOfFile` arm.
pub fn function_definitions(module: &Node) -> Vec<&Node> {
    let mut defs = Vec::new();
    let mut current = module;
    loop {
        let children = current.children();
        match children {
            [def, next_module] => {
                defs.push(def);
                current = next_module;
            }
            _ => break,
        }
    }
    defs
}

fn build_function(def: &Node) -> Function {
    let children = def.children();
    let (_, name) = children[0].as_terminal().expect("FunctionName terminal");
    let params = flatten_list(&children[2])
        .into_iter()
        .map(|n| n.as_terminal().expect("Variable terminal").1.to_string())
        .collect();
    Function {
        name: name.to_string(),
        params,
        body: children[4].clone(),
        file: def.file(),
        line: def.line(),
    }
}

/// Extracts every function from a set of parsed modules (one per source
/// file), preserving source order across files.
pub fn extract_functions(modules: &[Node]) -> Vec<Function> {
    modules
        .iter()
        .flat_map(function_definitions)
        .map(build_function)
        .collect()
}

/// Builds the name-to-function map, rejecting duplicate names.
pub fn build_function_table(
    functions: Vec<Function>,
) -> Result<HashMap<String, Function>, CompileError> {
    let mut table = HashMap::new();
    for f in functions {
        if let Some(existing) = table.get(&f.name) {
            let existing: &Function = existing;
            return Err(CompileError::Semantic {
                file: f.file.clone(),
                line: f.line,
                message: format!(
                    "File: {}; line: {}; Function {} defined twice. Previously at file: {}; line: {}",
                    f.file, f.line, f.name, existing.file, existing.line
                ),
            });
        }
        table.insert(f.name.clone(), f);
    }
    Ok(table)
}

/// Requires a zero- or one-parameter `Main` function to exist.
/// `fallback_file` is cited when `Main` is entirely absent, since there
/// is then no node to take a position from.
pub fn validate_main(
    functions: &HashMap<String, Function>,
    fallback_file: &Rc<str>,
) -> Result<(), CompileError> {
    match functions.get("Main") {
        None => Err(CompileError::Semantic {
            file: fallback_file.clone(),
            line: 1,
            message: "missing required function Main".to_string(),
        }),
        Some(main) if main.params.len() > 1 => Err(CompileError::Semantic {
            file: main.file.clone(),
            line: main.line,
            message: format!(
                "Main must take 0 or 1 parameters, found {}",
                main.params.len()
            ),
        }),
        Some(_) => Ok(()),
    }
}
