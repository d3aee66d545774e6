use crate::report::model::Report;

/// Human-readable summary of a report.
///
/// Intended for terminals; the JSON form is the stable contract.
pub fn render_text(report: &Report) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", report.tool.name, report.tool.version));
    if let Some(path) = &report.source.path {
        out.push_str(&format!("Source: {path}\n"));
    }
    out.push_str(&format!(
        "Source size: {} bytes ({} {})\n",
        report.source.size_bytes, report.source.hash.algorithm, report.source.hash.value
    ));
    out.push_str(&format!("Status: {}\n", report.analysis.status));
    out.push_str(&format!(
        "Risk score: {:.1} / 10 ({})\n",
        result.risk_score, result.classification
    ));
    out.push_str(&format!(
        "Confidence: {:.2} ({} of {} functions parsed, {} of {} patterns matched)\n",
        result.confidence,
        result.metadata.successfully_parsed,
        result.metadata.total_functions,
        result.metadata.patterns_matched,
        result.metadata.patterns_checked,
    ));

    if result.findings.is_empty() {
        out.push_str("Findings: none\n");
    } else {
        out.push_str("Findings:\n");
    }
    for f in &result.findings {
        out.push_str(&format!(
            "  - [{}] {} (line {}, weight {:.1}): {}\n",
            f.severity(),
            f.risk_type,
            f.line_number,
            f.weight(),
            f.machine_reason
        ));
    }

    if !report.analysis.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for w in &report.analysis.warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    out
}
