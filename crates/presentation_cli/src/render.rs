//! Terminal rendering of query responses

use application::QueryResponse;
use domain::WeatherReport;

/// ANSI red, used for the single error line
pub const RED: &str = "\x1b[31m";
/// ANSI reset
pub const RESET: &str = "\x1b[0m";

/// Render a full query response into terminal text
#[must_use]
pub fn render_response(response: &QueryResponse) -> String {
    let mut out = String::new();

    for report in &response.reports {
        out.push_str(&render_report(report));
        out.push('\n');
    }

    if let Some(summary) = &response.summary {
        out.push_str("💬 ");
        out.push_str(&summary.briefing);
        out.push('\n');
        for tip in &summary.tips {
            out.push_str(&format!("   • {tip}\n"));
        }
    }

    out
}

/// Render one city's report: banner, current block, forecast block
fn render_report(report: &WeatherReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("🌍 {}, {}\n", report.city, report.country));

    if let Some(line) = report.current_line() {
        out.push_str(&format!("   {line}\n"));
    }

    for day in &report.forecast {
        out.push_str(&format!("   {}\n", report.forecast_line(day)));
    }

    out
}

/// Render a one-line error for stderr
#[must_use]
pub fn render_error(message: &str) -> String {
    format!("{RED}✗ {message}{RESET}")
}
