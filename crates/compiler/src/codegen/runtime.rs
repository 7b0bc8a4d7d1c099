//! The embedded PBString runtime text and the builtin name/arity table.

/// Verbatim text of the runtime header, shipped alongside the compiler
/// and stitched into every emitted program.
pub const RUNTIME_HEADER: &str = include_str!("../../runtime_c/pbstring.h");

/// Verbatim text of the runtime implementation.
pub const RUNTIME_SOURCE: &str = include_str!("../../runtime_c/pbstring.c");

pub struct BuiltinDecl {
    pub target_name: &'static str,
    pub arity: usize,
}

const BUILTINS: &[(&str, BuiltinDecl)] = &[
    ("EQUAL", BuiltinDecl { target_name: "Builtin_Equal", arity: 2 }),
    ("PRINT", BuiltinDecl { target_name: "Builtin_Print", arity: 1 }),
    ("CONCAT", BuiltinDecl { target_name: "Builtin_Concat", arity: 2 }),
    ("NOT", BuiltinDecl { target_name: "Builtin_Not", arity: 1 }),
    ("AND", BuiltinDecl { target_name: "Builtin_And", arity: 2 }),
    ("OR", BuiltinDecl { target_name: "Builtin_Or", arity: 2 }),
    ("STRLEN", BuiltinDecl { target_name: "Builtin_Strlen", arity: 1 }),
    ("SUBSTRING", BuiltinDecl { target_name: "Builtin_Substring", arity: 3 }),
];

pub fn lookup(name: &str) -> Option<&'static BuiltinDecl> {
    BUILTINS.iter().find(|(n, _)| *n == name).map(|(_, d)| d)
}
