//! `--order` report rendering.
//!
//! Text output lists one header per line in emission order; JSON output is
//! a single object with stable field names.

use std::io::{self, Write};

use hinline_core::Plan;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    /// Headers, dependencies first.
    pub headers: Vec<String>,
    /// Lifted include lines, in output order.
    pub system_includes: Vec<String>,
}

impl OrderReport {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            headers: plan.order.clone(),
            system_includes: plan.includes.clone(),
        }
    }

    pub fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for header in &self.headers {
            writeln!(w, "{header}")?;
        }
        Ok(())
    }

    pub fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *w, self).map_err(io::Error::other)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> OrderReport {
        OrderReport {
            headers: vec!["inc/b.h".into(), "inc/a.h".into()],
            system_includes: vec!["#include <vector>".into()],
        }
    }

    #[test]
    fn text_lists_headers_one_per_line() {
        let mut buf = Vec::new();
        report().render_text(&mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "inc/b.h\ninc/a.h\n");
    }

    #[test]
    fn json_has_stable_fields() {
        let mut buf = Vec::new();
        report().render_json(&mut buf).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(value["headers"][0], "inc/b.h");
        assert_eq!(value["system_includes"][0], "#include <vector>");
    }
}
