//! Shared rendering of run reports and errors.

use crate::operation::RunReport;
use crate::ui::{format_duration, UserInterface};

/// Show every step of a completed run, then a one-line summary.
pub fn show_report(ui: &mut dyn UserInterface, report: &RunReport) {
    for record in &report.steps {
        ui.show_step(record);
    }
    ui.message(&summary_line(report));
}

/// Render an error with its whole source chain, `outer: inner: cause`.
pub fn error_chain<E>(err: E) -> String
where
    E: Into<anyhow::Error>,
{
    format!("{:#}", err.into())
}

/// "4 steps in 2ms" with the recovered count when non-zero.
pub fn summary_line(report: &RunReport) -> String {
    let steps = report.steps.len();
    let noun = if steps == 1 { "step" } else { "steps" };
    let mut line = format!("{} {} in {}", steps, noun, format_duration(report.duration));
    let recovered = report.recovered_count();
    if recovered > 0 {
        line.push_str(&format!(", {} recovered", recovered));
    }
    line
}
