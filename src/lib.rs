//! A tree-walking interpreter for a small expression language: numbers,
//! strings, booleans, conditionals, assignment, `let` and closures.
//!
//! ```text
//! fib = lambda(n) if n < 2 then n else fib(n - 1) + fib(n - 2);
//! println(fib(10));
//! ```

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate maplit;

pub mod ast;
pub mod builtin;
mod equality;
pub mod error;
mod number;
pub mod read;
pub mod runtime;
pub mod value;

use std::sync::Once;

pub use crate::ast::Node;
pub use crate::error::{Error, Position};
pub use crate::read::read;
pub use crate::runtime::Environment;
pub use crate::value::Value;

/// Parse `source` and evaluate it in `env`. The first error aborts the run.
pub fn run(source: &str, env: &Environment) -> Result<Value, Error> {
    let program = read(source)?;
    tracing::debug!(bytes = source.len(), "evaluating program");
    let value = program.eval(env)?;
    tracing::debug!(result = %value, "program finished");
    Ok(value)
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `RUST_LOG`, e.g.
/// `RUST_LOG=lambda=trace`. Does nothing if `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
