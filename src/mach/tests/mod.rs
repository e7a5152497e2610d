use crate::mach::{Interpret, Runtime};

mod compile_test;

fn runtime() -> Runtime<Vec<u8>> {
    Runtime::with_writer(Vec::new())
}

/// Runs one source buffer and returns everything observable: printed
/// output first, then any diagnostics.
fn run(runtime: &mut Runtime<Vec<u8>>, source: &str) -> String {
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
    let mut output = String::from_utf8(printed).unwrap();
    output.push_str(&diagnostics);
    output
}
