//! Diagnostic formatting for the Solace CLI.

use ariadne::{Color, Label, Report, ReportKind, Source};
use ropey::Rope;
use solace_core::{CompilationPhase, Diagnostic, DiagnosticSeverity};

/// Get the display color for a compilation phase.
pub fn phase_color(phase: &CompilationPhase) -> Color {
    match phase {
        CompilationPhase::Parsing => Color::Red,
        CompilationPhase::AstGeneration => Color::Red,
        CompilationPhase::NameResolution => Color::Yellow,
        CompilationPhase::Serialization => Color::Magenta,
        CompilationPhase::IrGeneration => Color::Cyan,
        CompilationPhase::AbiGeneration => Color::Blue,
    }
}

fn report_kind(severity: &DiagnosticSeverity) -> ReportKind<'static> {
    match severity {
        DiagnosticSeverity::Error => ReportKind::Error,
        DiagnosticSeverity::Warning => ReportKind::Warning,
        DiagnosticSeverity::Info => ReportKind::Advice,
    }
}

/// Normalize a span to ensure end > start (required by ariadne).
pub fn normalize_span(start: usize, end: usize) -> (usize, usize) {
    (start, end.max(start + 1))
}

/// Print a diagnostic against the original source text.
pub fn print_diagnostic(diag: &Diagnostic, source: &Rope, file_path: &str) {
    let source_text = source.to_string();
    let (start, end) = normalize_span(diag.span.start, diag.span.end);
    // Spans past the text (a tree laid out without its source) would panic ariadne.
    let end = end.min(source_text.len().max(1));
    let start = start.min(end.saturating_sub(1));
    let color = phase_color(&diag.phase);

    Report::build(report_kind(&diag.severity), (file_path, start..end))
        .with_code(format!("{:?}", diag.phase))
        .with_message(&diag.message)
        .with_label(
            Label::new((file_path, start..end))
                .with_message(&diag.message)
                .with_color(color),
        )
        .finish()
        .eprint((file_path, Source::from(source_text)))
        .ok();
}

/// One-line rendering used when no source text is available.
pub fn format_plain(diag: &Diagnostic) -> String {
    format!(
        "{} [{:?}] {} ({}..{})",
        diag.severity, diag.phase, diag.message, diag.span.start, diag.span.end
    )
}
