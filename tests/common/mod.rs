use lox_lang::mach::{Interpret, Runtime};

pub fn new_runtime() -> Runtime<Vec<u8>> {
    Runtime::with_writer(Vec::new())
}

/// Runs one source buffer on `runtime` and returns everything observable:
/// printed output first, then any diagnostics.
pub fn exec(runtime: &mut Runtime<Vec<u8>>, source: &str) -> String {
    let mut diagnostics = String::new();
    match runtime.interpret(source) {
        Interpret::Ok => {}
        Interpret::CompileError(errors) => {
            for error in errors.iter() {
                diagnostics.push_str(&format!("{}\n", error));
            }
        }
        Interpret::RuntimeError(error) => {
            diagnostics.push_str(&format!("{}\n", error));
        }
    }
    let printed = std::mem::take(runtime.writer_mut());
    let mut output = String::from_utf8(printed).expect("printed output is UTF-8");
    output.push_str(&diagnostics);
    output
}
