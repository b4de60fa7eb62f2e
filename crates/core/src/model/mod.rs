//! Core data model for analysis results.
//!
//! A [`ResultRecord`] is produced by the scorer, never mutated afterwards, and
//! replaced wholesale on each new analysis. The shapes here are also the JSON
//! shapes persisted by the project database, so field names follow the
//! dashboard's camelCase convention on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque project identifier handed out by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonically increasing marker used to order result records.
///
/// `Revision::ZERO` means "nothing applied yet".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    pub const ZERO: Revision = Revision(0);

    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Which sections of the scorer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub complexity: bool,
    pub security: bool,
    pub style: bool,
    pub documentation: bool,
}

impl AnalysisOptions {
    pub fn all() -> Self {
        Self { complexity: true, security: true, style: true, documentation: true }
    }

    pub fn none() -> Self {
        Self { complexity: false, security: false, style: false, documentation: false }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Complexity scores for the analyzed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    pub cyclomatic_complexity: u32,
    /// Always within `0..=100`.
    pub maintainability_index: u32,
    pub cognitive_complexity: u32,
    pub lines_of_code: u32,
}

/// Severity attached to security findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A single flagged line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line number, never larger than `lines_of_code`.
    pub line: u32,
    pub message: String,
    /// Only set for security findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self { line, message: message.into(), severity: None, suggestion: None }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// Node of the project code tree.
///
/// Children are owned, so the structure is a tree by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CodeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl CodeNode {
    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<CodeNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
            children,
            content: None,
            size: None,
        }
    }

    pub fn file(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let size = content.len() as u64;
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::File,
            children: Vec::new(),
            content: Some(content),
            size: Some(size),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&CodeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

impl Default for CodeNode {
    fn default() -> Self {
        CodeNode::folder("root", "Project Root", Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Component,
    Module,
    Package,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Component => "component",
            ModuleKind::Module => "module",
            ModuleKind::Package => "package",
        }
    }
}

/// Entry of the dependency graph. `dependencies` holds ids of other modules;
/// ids that do not resolve are tolerated and dropped by renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ModuleNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ModuleKind) -> Self {
        Self { id: id.into(), name: name.into(), kind, dependencies: Vec::new(), details: None }
    }

    /// Add a dependency id; duplicates are ignored so the list behaves as a set.
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Coarse runtime estimates shown by the performance widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub time_complexity: String,
    pub space_complexity: String,
    /// KiB.
    pub memory_usage: u64,
    /// Milliseconds.
    pub execution_time: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            time_complexity: "O(1)".to_string(),
            space_complexity: "O(1)".to_string(),
            memory_usage: 0,
            execution_time: 0.0,
        }
    }
}

/// Tree, graph and performance slice of a record, persisted apart from findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub code_tree: CodeNode,
    pub dependency_graph: Vec<ModuleNode>,
    pub performance: PerformanceMetrics,
}

/// Normalized output of one analysis invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub complexity: ComplexityMetrics,
    #[serde(default)]
    pub security: Vec<Finding>,
    #[serde(default)]
    pub style: Vec<Finding>,
    #[serde(default)]
    pub documentation: Vec<Finding>,
    pub code_tree: CodeNode,
    #[serde(default)]
    pub dependency_graph: Vec<ModuleNode>,
    #[serde(default)]
    pub performance: PerformanceMetrics,
    #[serde(default)]
    pub source_digest: String,
}

impl ResultRecord {
    /// Split out the metrics slice.
    pub fn metrics(&self) -> ProjectMetrics {
        ProjectMetrics {
            code_tree: self.code_tree.clone(),
            dependency_graph: self.dependency_graph.clone(),
            performance: self.performance.clone(),
        }
    }

    /// Copy of this record with the metrics slice replaced.
    pub fn with_metrics(&self, metrics: ProjectMetrics) -> Self {
        Self {
            code_tree: metrics.code_tree,
            dependency_graph: metrics.dependency_graph,
            performance: metrics.performance,
            ..self.clone()
        }
    }

    pub fn finding_count(&self) -> usize {
        self.security.len() + self.style.len() + self.documentation.len()
    }
}
