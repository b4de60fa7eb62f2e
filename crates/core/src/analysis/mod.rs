//! Heuristic scorer.
//!
//! Stands in for a real static analyzer: every check is a plain substring or
//! token test over the input lines. The scorer is total and deterministic:
//! any string with any options yields a record, and identical inputs yield
//! identical records.

use sha2::{Digest, Sha256};

use crate::model::{
    AnalysisOptions, CodeNode, ComplexityMetrics, Finding, ModuleKind, ModuleNode,
    PerformanceMetrics, ResultRecord, Severity,
};

/// Lines longer than this many characters are flagged by the style check.
pub const MAX_LINE_LENGTH: usize = 79;

const BRANCH_KEYWORDS: [&str; 3] = ["if", "for", "while"];
const DOCSTRING_QUOTE: &str = "\"\"\"";

/// Score `text` with the sections selected by `options`.
pub fn score(text: &str, options: &AnalysisOptions) -> ResultRecord {
    let lines = source_lines(text);

    let complexity = complexity_metrics(&lines, options.complexity);
    let security = if options.security { security_findings(&lines) } else { Vec::new() };
    let style = if options.style { style_findings(&lines) } else { Vec::new() };
    let documentation =
        if options.documentation { documentation_findings(&lines) } else { Vec::new() };

    ResultRecord {
        complexity,
        security,
        style,
        documentation,
        code_tree: placeholder_code_tree(text),
        dependency_graph: placeholder_dependency_graph(),
        performance: estimate_performance(text, &complexity),
        source_digest: sha256_hex(text.as_bytes()),
    }
}

/// Split text into lines on `\n`.
///
/// A trailing newline ends the last line instead of opening an empty one, but
/// the empty string still counts as one (empty) line.
pub fn source_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn complexity_metrics(lines: &[&str], enabled: bool) -> ComplexityMetrics {
    let lines_of_code = lines.len() as u32;
    if !enabled {
        return ComplexityMetrics {
            cyclomatic_complexity: 0,
            maintainability_index: 100,
            cognitive_complexity: 0,
            lines_of_code,
        };
    }

    // Naive on purpose: "ifrit" and "before" count as branches.
    let cyclomatic = lines
        .iter()
        .filter(|line| BRANCH_KEYWORDS.iter().any(|kw| line.contains(kw)))
        .count() as u32;

    ComplexityMetrics {
        cyclomatic_complexity: cyclomatic,
        maintainability_index: 100u32.saturating_sub(cyclomatic.saturating_mul(5)),
        cognitive_complexity: cyclomatic.saturating_mul(3) / 2,
        lines_of_code,
    }
}

fn security_findings(lines: &[&str]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;
        if line.contains("eval(") {
            findings.push(
                Finding::new(line_no, "Use of eval() can be dangerous")
                    .with_severity(Severity::High)
                    .with_suggestion("Parse the input explicitly instead of evaluating it"),
            );
        }
        if line.contains("exec(") {
            findings.push(
                Finding::new(line_no, "Use of exec() can be dangerous")
                    .with_severity(Severity::High)
                    .with_suggestion("Avoid executing dynamically built code"),
            );
        }
    }
    findings
}

fn style_findings(lines: &[&str]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;
        let length = line.chars().count();
        if length > MAX_LINE_LENGTH {
            findings.push(
                Finding::new(
                    line_no,
                    format!("Line too long ({length} > {MAX_LINE_LENGTH} characters)"),
                )
                .with_suggestion("Break the line into shorter pieces"),
            );
        }
        for token in line.split_whitespace() {
            if token.contains('_') && token.chars().any(char::is_uppercase) {
                findings.push(
                    Finding::new(
                        line_no,
                        format!("Naming convention: '{token}' mixes underscores and uppercase"),
                    )
                    .with_suggestion("Use snake_case for functions and variables"),
                );
            }
        }
    }
    findings
}

fn documentation_findings(lines: &[&str]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let has_docstring = |idx: usize| lines.get(idx).is_some_and(|l| l.contains(DOCSTRING_QUOTE));

    if !has_docstring(0) {
        findings.push(
            Finding::new(1, "Missing module docstring")
                .with_suggestion("Add a docstring at the top of the module"),
        );
    }

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;
        if line.contains("def ") && !has_docstring(idx + 1) {
            findings.push(
                Finding::new(line_no, "Missing function docstring")
                    .with_suggestion("Add docstring to explain function purpose"),
            );
        }
        if line.contains("class ") && !has_docstring(idx + 1) {
            findings.push(
                Finding::new(line_no, "Missing class docstring")
                    .with_suggestion("Add docstring to explain class purpose"),
            );
        }
    }
    findings
}

/// Single-file project tree. Not derived from the text's structure.
fn placeholder_code_tree(text: &str) -> CodeNode {
    CodeNode::folder(
        "root",
        "Project Root",
        vec![CodeNode::folder("src", "src", vec![CodeNode::file("main", "main.py", text)])],
    )
}

fn placeholder_dependency_graph() -> Vec<ModuleNode> {
    vec![
        ModuleNode::new("main", "main.py", ModuleKind::Module)
            .depends_on("utils")
            .with_details("Entry point"),
        ModuleNode::new("utils", "utils.py", ModuleKind::Module).with_details("Shared helpers"),
    ]
}

/// Size-proportional estimates; stable for identical input.
fn estimate_performance(text: &str, complexity: &ComplexityMetrics) -> PerformanceMetrics {
    let time_complexity = match complexity.cyclomatic_complexity {
        0 => "O(1)",
        1..=5 => "O(n)",
        _ => "O(n^2)",
    };
    PerformanceMetrics {
        time_complexity: time_complexity.to_string(),
        space_complexity: "O(1)".to_string(),
        memory_usage: (text.len() as u64).div_ceil(1024),
        execution_time: f64::from(complexity.lines_of_code) * 0.05,
    }
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
