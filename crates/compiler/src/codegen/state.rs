//! The mutable state threaded through code generation: the function
//! table, the process-wide globals set, the current function's locals,
//! and whether emission is currently inside a loop body.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use crate::functions::Function;

pub struct CompilationContext<'f> {
    pub functions: &'f HashMap<String, Function>,
    globals: Rc<RefCell<BTreeSet<String>>>,
    locals: HashSet<String>,
    pub is_in_loop: bool,
}

impl<'f> CompilationContext<'f> {
    pub fn new(functions: &'f HashMap<String, Function>) -> Self {
        CompilationContext {
            functions,
            globals: Rc::new(RefCell::new(BTreeSet::new())),
            locals: HashSet::new(),
            is_in_loop: false,
        }
    }

    /// A fresh context for one function's body: shares the globals set,
    /// starts with no locals in scope.
    pub fn for_function(&self) -> Self {
        CompilationContext {
            functions: self.functions,
            globals: self.globals.clone(),
            locals: HashSet::new(),
            is_in_loop: false,
        }
    }

    /// A copy for a loop body: locals so far carry in, but anything the
    /// loop body introduces does not escape back to the caller. Globals
    /// stay shared since they are process-wide.
    pub fn fork_for_loop(&self) -> Self {
        CompilationContext {
            functions: self.functions,
            globals: self.globals.clone(),
            locals: self.locals.clone(),
            is_in_loop: true,
        }
    }

    pub fn add_global(&self, name: &str) {
        self.globals.borrow_mut().insert(name.to_string());
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.borrow().contains(name)
    }

    pub fn add_local(&mut self, name: &str) {
        self.locals.insert(name.to_string());
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    pub fn sorted_globals(&self) -> Vec<String> {
        self.globals.borrow().iter().cloned().collect()
    }
}
