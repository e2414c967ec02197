//! Native functions bound in every fresh environment.

use crate::env::Environment;
use crate::error::EvalResult;
use crate::value::{NativeFn, Value};
use std::io::Write;

pub fn install(env: &mut Environment) {
    env.define_native(NativeFn::new("write", write));
}

/// `write(args...)`: print each argument on its own line.
fn write(out: &mut dyn Write, args: Vec<Value>) -> EvalResult<Option<Value>> {
    for arg in &args {
        writeln!(out, "{arg}")?;
    }
    Ok(None)
}
