// src/service/systemd.rs

//! systemd unit rendering

use super::ServiceDescriptor;
use std::fmt::Write;

/// Render a descriptor as a systemd service unit
pub fn render_unit(descriptor: &ServiceDescriptor) -> String {
    let exec_start: Vec<String> = descriptor
        .program_arguments()
        .into_iter()
        .map(quote_arg)
        .collect();
    let restart = if descriptor.keep_alive { "always" } else { "no" };

    let mut unit = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(unit, "[Unit]");
    let _ = writeln!(unit, "Description={}", descriptor.label.replace('%', "%%"));
    let _ = writeln!(unit, "After=network.target");
    let _ = writeln!(unit);
    let _ = writeln!(unit, "[Service]");
    let _ = writeln!(unit, "Type=simple");
    let _ = writeln!(unit, "ExecStart={}", exec_start.join(" "));
    let _ = writeln!(
        unit,
        "WorkingDirectory={}",
        descriptor.working_directory.replace('%', "%%")
    );
    let _ = writeln!(unit, "Restart={}", restart);

    if descriptor.run_at_load {
        let _ = writeln!(unit);
        let _ = writeln!(unit, "[Install]");
        let _ = writeln!(unit, "WantedBy=multi-user.target");
    }

    unit
}

/// Quote one `ExecStart=` word
///
/// `%` and `$` are doubled so systemd reads them literally rather than as
/// specifiers or variable references.
fn quote_arg(arg: &str) -> String {
    let literal = arg.replace('%', "%%").replace('$', "$$");
    let needs_quotes = literal.is_empty()
        || literal
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '"' | '\\' | '\''));
    if !needs_quotes {
        return literal;
    }

    let escaped = literal.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
