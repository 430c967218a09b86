//! Rendering of parse errors and scope diagnostics for the terminal.

use ariadne::{Config, Label, Report, ReportKind, Source};
use navi_eval::{EvalError, ScopeDiagnostic};
use navi_ir::StringInterner;
use navi_parse::ParseError;

/// Render a syntax error as a source snippet pointing at its span.
///
/// Output is uncolored so it can be compared and piped.
pub fn render_parse_error(path: &str, source: &str, error: &ParseError) -> String {
    let range = clamp(error.span.to_range(), source.len());
    let report = Report::build(ReportKind::Error, path, range.start)
        .with_message("syntax error")
        .with_label(Label::new((path, range)).with_message(&error.message))
        .with_config(Config::default().with_color(false))
        .finish();

    let mut out = Vec::new();
    if report.write((path, Source::from(source)), &mut out).is_err() {
        return format!("{path}:{}: error: {}", error.span.start, error.message);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// One-line rendering of an evaluation error: `error[kind]: message`.
pub fn render_eval_error(error: &EvalError) -> String {
    format!("error[{}]: {error}", error.kind())
}

/// One-line rendering of a failed definition.
pub fn render_scope_diagnostic(diagnostic: &ScopeDiagnostic, interner: &StringInterner) -> String {
    format!(
        "error[{}] in `{}`: {}",
        diagnostic.error.kind(),
        interner.lookup(diagnostic.name),
        diagnostic.error
    )
}

// Eof errors point one past the end.
fn clamp(range: std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);
    start..end
}
