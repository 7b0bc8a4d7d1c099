//! Assembles the final emitted program: preamble, embedded runtime,
//! forward declarations, globals, function bodies, and entry point.

use std::collections::HashMap;

use crate::codegen::error::CodeGenError;
use crate::codegen::runtime;
use crate::codegen::state::CompilationContext;
use crate::codegen::statements::emit_code_block;
use crate::functions::Function;

fn function_declaration(f: &Function) -> String {
    let params = f
        .params
        .iter()
        .map(|p| format!("PBString {p}_local_poiboivar"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("PBString {}_poiboi_fn({})", f.name, params)
}

fn entry_point_code(main: &Function) -> String {
    if main.params.is_empty() {
        "int main(int, char**) {\n  Main_poiboi_fn();\n  return 0;\n}\n".to_string()
    } else {
        concat!(
            "int main(int argc, char** argv) {\n",
            "  if (argc > 1) {\n",
            "    Main_poiboi_fn(PBString::NewStaticString(argv[1]));\n",
            "  } else {\n",
            "    Main_poiboi_fn(PBString::NewStaticString(\"\"));\n",
            "  }\n",
            "  return 0;\n",
            "}\n",
        )
        .to_string()
    }
}

/// Generates the full emitted program text for `functions` (in source
/// order), resolved against `table`.
pub fn generate_program(
    functions: &[Function],
    table: &HashMap<String, Function>,
) -> Result<String, CodeGenError> {
    let base_ctx = CompilationContext::new(table);

    let mut forward_decls = String::new();
    let mut definitions = String::new();

    for f in functions {
        let decl = function_declaration(f);
        forward_decls.push_str(&decl);
        forward_decls.push_str(";\n");

        let mut fn_ctx = base_ctx.for_function();
        for p in &f.params {
            fn_ctx.add_local(p);
        }

        let mut body = String::new();
        for p in &f.params {
            body.push_str(&format!("PBString LOCAL_VAR_{p} = {p}_local_poiboivar;\n"));
        }
        body.push_str(&emit_code_block(&f.body, &mut fn_ctx)?);
        body.push_str("return PBString();\n");

        definitions.push_str(&decl);
        definitions.push_str(" {\n");
        definitions.push_str(&body);
        definitions.push_str("}\n\n");
    }

    let mut global_decls = String::new();
    for g in base_ctx.sorted_globals() {
        global_decls.push_str(&format!("PBString GLOBAL_VAR_{g};\n"));
    }

    let main = table
        .get("Main")
        .expect("Main's presence is validated before codegen runs");

    let mut out = String::new();
    out.push_str("#define POIBOI_EXECUTABLE_\n#define POIBOI_INCLUDE_ASSERT_\n");
    out.push_str(runtime::RUNTIME_HEADER);
    out.push_str(runtime::RUNTIME_SOURCE);
    out.push_str(&forward_decls);
    out.push('\n');
    out.push_str(&global_decls);
    out.push('\n');
    out.push_str(&definitions);
    out.push_str(&entry_point_code(main));
    Ok(out)
}
