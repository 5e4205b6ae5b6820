use crate::report::report_model::SuiteReport;

// ============================================================================
// JUnit XML reporter for CI systems
// ============================================================================

/// Generate a JUnit XML report.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="Checkout acceptance" tests="3" failures="1" skipped="0" time="4.210">
///   <testcase name="page smoke check" classname="checkout-acceptance" time="0.800" />
///   <testcase name="successful order submission" classname="checkout-acceptance" time="3.000">
///     <failure message="timeout" type="Error">[timeout] timed out ...</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();
    let skipped = report.results.iter().filter(|r| r.skipped).count();

    let mut cases = String::new();
    for result in &report.results {
        let open = format!(
            "  <testcase name=\"{}\" classname=\"checkout-acceptance\" time=\"{:.3}\"",
            escape_xml(&result.name),
            result.duration_ms as f64 / 1000.0
        );

        if result.passed {
            cases.push_str(&open);
            cases.push_str(" />\n");
        } else if result.skipped {
            cases.push_str(&format!(
                "{}>\n    <skipped message=\"{}\" />\n  </testcase>\n",
                open,
                escape_xml(&result.message)
            ));
        } else {
            let (message, kind) = match result.error_kind {
                Some(kind) => (kind.label(), "Error"),
                None => ("assertion failed", "AssertionFailure"),
            };
            cases.push_str(&format!(
                "{}>\n    <failure message=\"{}\" type=\"{}\">{}</failure>\n  </testcase>\n",
                open,
                escape_xml(message),
                kind,
                escape_xml(&result.message)
            ));
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" skipped=\"{skipped}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed - skipped,
        skipped = skipped,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
