//! Parse tracing, a diagnostic aid for the parser.
//!
//! Enabled by running with the environment variable `TRACE=1`. Each traced
//! parse rule prints an `↱ name` / `↳ name` pair to stderr, indented by
//! nesting depth. Tracing never affects parse results.

use std::env;

#[derive(Debug)]
pub(crate) struct Tracer {
    enabled: bool,
    depth: usize,
}

impl Tracer {
    /// Reads the `TRACE` environment variable once, at parser creation.
    pub(crate) fn from_env() -> Tracer {
        Tracer {
            enabled: env::var("TRACE").map(|v| v == "1").unwrap_or(false),
            depth: 0,
        }
    }

    pub(crate) fn enter(&mut self, rule: &str) {
        if self.enabled {
            self.depth += 1;
            eprintln!("{}↱ {}", self.indent(), rule);
        }
    }

    pub(crate) fn exit(&mut self, rule: &str) {
        if self.enabled {
            eprintln!("{}↳ {}", self.indent(), rule);
            self.depth = self.depth.saturating_sub(1);
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth.saturating_sub(1))
    }
}
