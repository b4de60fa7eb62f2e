use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::analysis::source_lines;
use crate::model::{CodeNode, NodeKind, ResultRecord};
use crate::store::{ResultStore, Snapshot, WidgetKind};
use crate::widgets::Widget;

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub kind: NodeKind,
    /// Folders only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Files only, when `showFileSizes` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
    /// Files only, when `showLineNumbers` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeView {
    pub title: String,
    pub rows: Vec<TreeRow>,
}

/// Code tree renderer.
///
/// Expand/collapse state is local to this instance and starts from the
/// `expandedByDefault` setting; a new instance starts over. The selected node
/// lives in the store.
#[derive(Debug, Clone, Default)]
pub struct CodeTreeWidget {
    overrides: HashMap<String, bool>,
}

impl CodeTreeWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, node_id: &str, snapshot: &Snapshot) -> bool {
        self.overrides
            .get(node_id)
            .copied()
            .unwrap_or(snapshot.settings.code_tree.expanded_by_default)
    }

    /// Flip a folder between expanded and collapsed.
    pub fn toggle(&mut self, node_id: &str, snapshot: &Snapshot) {
        let next = !self.is_expanded(node_id, snapshot);
        self.overrides.insert(node_id.to_string(), next);
    }

    pub fn select(&self, store: &mut ResultStore, node_id: &str) {
        store.select_node(Some(node_id.to_string()));
    }
}

impl Widget for CodeTreeWidget {
    const KIND: WidgetKind = WidgetKind::CodeTree;
    const TITLE: &'static str = "Code Tree";
    type View = TreeView;

    fn view(&self, record: &ResultRecord, snapshot: &Snapshot) -> TreeView {
        let settings = snapshot.settings.code_tree;
        let selected = snapshot.selected_node.as_deref();

        let title = match selected.and_then(|id| record.code_tree.find(id)) {
            Some(node) => format!("{} - {}", Self::TITLE, node.name),
            None => Self::TITLE.to_string(),
        };

        let mut rows = Vec::new();
        let mut stack: Vec<(&CodeNode, usize)> = vec![(&record.code_tree, 0)];
        while let Some((node, depth)) = stack.pop() {
            let expanded = node.is_folder().then(|| self.is_expanded(&node.id, snapshot));
            let is_file = node.kind == NodeKind::File;
            rows.push(TreeRow {
                id: node.id.clone(),
                name: node.name.clone(),
                depth,
                kind: node.kind,
                expanded,
                size_kb: node
                    .size
                    .filter(|size| is_file && settings.show_file_sizes && *size > 0)
                    .map(|size| size as f64 / 1024.0),
                line_count: node
                    .content
                    .as_deref()
                    .filter(|_| is_file && settings.show_line_numbers)
                    .map(|content| source_lines(content).len()),
                selected: selected == Some(node.id.as_str()),
            });
            if expanded == Some(true) {
                for child in node.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        TreeView { title, rows }
    }
}

impl fmt::Display for TreeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for row in &self.rows {
            let marker = match row.expanded {
                Some(true) => "▾",
                Some(false) => "▸",
                None => "•",
            };
            write!(f, "{}{} {}", "  ".repeat(row.depth + 1), marker, row.name)?;
            if let Some(lines) = row.line_count {
                write!(f, " ({lines} lines)")?;
            }
            if let Some(kb) = row.size_kb {
                write!(f, " {kb:.1} KB")?;
            }
            if row.selected {
                write!(f, " *")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
