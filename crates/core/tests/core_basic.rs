use codescope_core::analysis::{self, score, source_lines, MAX_LINE_LENGTH};
use codescope_core::model::{AnalysisOptions, Severity};
use codescope_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn function_without_docstrings_is_flagged_twice() {
    let record = score("def f():\n    pass\n", &AnalysisOptions::all());

    assert_eq!(record.complexity.lines_of_code, 2);
    assert_eq!(record.complexity.cyclomatic_complexity, 0);
    assert_eq!(record.complexity.maintainability_index, 100);

    let lines: Vec<(u32, &str)> =
        record.documentation.iter().map(|f| (f.line, f.message.as_str())).collect();
    assert!(lines.contains(&(1, "Missing module docstring")), "{lines:?}");
    assert!(lines.contains(&(1, "Missing function docstring")), "{lines:?}");
}

#[test]
fn eval_is_a_single_high_severity_finding() {
    let text = "import os\nx = input()\neval(x)\n";
    let record = score(text, &AnalysisOptions::all());

    assert_eq!(record.security.len(), 1);
    let finding = &record.security[0];
    assert_eq!(finding.line, 3);
    assert_eq!(finding.message, "Use of eval() can be dangerous");
    assert_eq!(finding.severity, Some(Severity::High));
    assert!(finding.suggestion.is_some());
}

#[test]
fn exec_and_eval_on_one_line_are_both_reported() {
    let record = score("exec(eval(src))", &AnalysisOptions::all());
    let messages: Vec<&str> = record.security.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["Use of eval() can be dangerous", "Use of exec() can be dangerous"]);
}

#[test]
fn line_counting_follows_newline_segments() {
    assert_eq!(source_lines("").len(), 1);
    assert_eq!(source_lines("a").len(), 1);
    assert_eq!(source_lines("a\nb").len(), 2);
    assert_eq!(source_lines("a\nb\n").len(), 2);
    assert_eq!(source_lines("a\n\nb").len(), 3);
    assert_eq!(source_lines("\n\n").len(), 2);

    let record = score("", &AnalysisOptions::all());
    assert_eq!(record.complexity.lines_of_code, 1);
}

#[test]
fn disabled_sections_stay_empty() {
    let text = "eval(x)\nclass Foo:\n    My_Var = 1\n";
    let record = score(text, &AnalysisOptions::none());

    assert!(record.security.is_empty());
    assert!(record.style.is_empty());
    assert!(record.documentation.is_empty());
    assert_eq!(record.complexity.cyclomatic_complexity, 0);
    assert_eq!(record.complexity.maintainability_index, 100);
    assert_eq!(record.complexity.lines_of_code, 3);
}

#[test]
fn enabling_security_only_adds_security_findings() {
    let text = "def run(cmd):\n    exec(cmd)\n    if cmd: eval(cmd)\n";
    let without = AnalysisOptions { security: false, ..AnalysisOptions::all() };
    let a = score(text, &without);
    let b = score(text, &AnalysisOptions::all());

    assert!(a.security.is_empty());
    assert_eq!(b.security.len(), 2);
    assert_eq!(a.style, b.style);
    assert_eq!(a.documentation, b.documentation);
    assert_eq!(a.complexity, b.complexity);
}

#[test]
fn maintainability_is_clamped_at_zero() {
    let text = "if x:\n".repeat(500);
    let record = score(&text, &AnalysisOptions::all());
    assert_eq!(record.complexity.cyclomatic_complexity, 500);
    assert_eq!(record.complexity.maintainability_index, 0);
    assert_eq!(record.complexity.cognitive_complexity, 750);
}

#[test]
fn branch_keywords_count_lines_not_occurrences() {
    let text = "for x in y:\n    if x: pass\n    while if for\nprint(x)";
    let record = score(text, &AnalysisOptions::all());
    assert_eq!(record.complexity.cyclomatic_complexity, 3);
    assert_eq!(record.complexity.maintainability_index, 85);
    assert_eq!(record.complexity.cognitive_complexity, 4);
}

#[test]
fn style_flags_long_lines_and_mixed_naming() {
    let long = format!("x = '{}'", "a".repeat(MAX_LINE_LENGTH));
    let text = format!("{long}\nMy_Value = 1\nsnake_case = 2\n");
    let record = score(&text, &AnalysisOptions::all());

    let messages: Vec<(u32, &str)> =
        record.style.iter().map(|f| (f.line, f.message.as_str())).collect();
    assert!(messages.iter().any(|(line, msg)| *line == 1 && msg.starts_with("Line too long")));
    assert!(messages.contains(&(2, "Naming convention: 'My_Value' mixes underscores and uppercase")));
    assert!(!messages.iter().any(|(line, _)| *line == 3));
}

#[test]
fn docstring_on_next_line_satisfies_check() {
    let text = "\"\"\"Module.\"\"\"\nclass Thing:\n    \"\"\"Doc.\"\"\"\n    def go(self):\n        \"\"\"Doc.\"\"\"\n";
    let record = score(text, &AnalysisOptions::all());
    assert!(record.documentation.is_empty(), "{:?}", record.documentation);
}

#[test]
fn scoring_is_deterministic() {
    let text = "def f(a):\n    if a:\n        return eval(a)\n";
    let first = score(text, &AnalysisOptions::all());
    let second = score(text, &AnalysisOptions::all());
    assert_eq!(first, second);
    assert_eq!(first.source_digest, analysis::sha256_hex(text.as_bytes()));
    assert_eq!(first.source_digest.len(), 64);
}

#[test]
fn performance_estimate_tracks_size_and_branches() {
    let record = score("print(1)\n", &AnalysisOptions::all());
    assert_eq!(record.performance.time_complexity, "O(1)");
    assert_eq!(record.performance.memory_usage, 1);
    assert!((record.performance.execution_time - 0.05).abs() < 1e-9);

    let branchy = score(&"if a:\n".repeat(6), &AnalysisOptions::all());
    assert_eq!(branchy.performance.time_complexity, "O(n^2)");
}

#[test]
fn placeholder_tree_holds_the_source() {
    let record = score("x = 1\n", &AnalysisOptions::all());
    let main = record.code_tree.find("main").expect("main file node");
    assert_eq!(main.content.as_deref(), Some("x = 1\n"));
    assert_eq!(main.size, Some(6));
    assert_eq!(record.dependency_graph.len(), 2);
}
