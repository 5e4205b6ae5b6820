use crate::report::report_model::SuiteReport;

// ============================================================================
// Console reporter: one line per scenario plus a summary
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Checkout acceptance ===
///
/// ✓ PASS  page smoke check: all 5 elements displayed; cart is empty
/// ✗ FAIL  successful order submission: [timeout] timed out after 10000ms waiting for confirmation dialog
///     screenshot: screenshots/submission-error.png
/// ✗ FAIL  form validation (skipped): not run: smoke check failed
///
/// === Results: 1/3 passed in 12.4s ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = format!("=== {} ===\n\n", report.suite_name);

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };
        let skipped = if result.skipped { " (skipped)" } else { "" };

        out.push_str(&format!(
            "{}  {}{}: {}\n",
            marker, result.name, skipped, result.message
        ));

        if let Some(ref shot) = result.screenshot {
            out.push_str(&format!("    screenshot: {}\n", shot.display()));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {}/{} passed",
        report.passed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}
