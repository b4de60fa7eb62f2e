use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::model::{ModuleKind, ModuleNode, ResultRecord};
use crate::store::{Snapshot, WidgetKind};
use crate::widgets::Widget;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDependency {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ModuleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Dependencies that resolve to a module in the graph.
    pub dependencies: Vec<ResolvedDependency>,
    /// Ids that did not resolve; they are not shown.
    pub dangling: usize,
    /// Distinct modules reachable through dependencies, excluding this one.
    pub reachable: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyGroup {
    pub kind: ModuleKind,
    pub entries: Vec<DependencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", content = "items", rename_all = "lowercase")]
pub enum DependencyView {
    Flat(Vec<DependencyEntry>),
    Grouped(Vec<DependencyGroup>),
}

impl DependencyView {
    /// Every entry regardless of grouping, in display order.
    pub fn entries(&self) -> Vec<&DependencyEntry> {
        match self {
            DependencyView::Flat(entries) => entries.iter().collect(),
            DependencyView::Grouped(groups) => {
                groups.iter().flat_map(|group| group.entries.iter()).collect()
            }
        }
    }
}

/// Index of the graph by id. The first module with a given id wins.
struct Graph<'a> {
    by_id: HashMap<&'a str, &'a ModuleNode>,
}

impl<'a> Graph<'a> {
    fn new(modules: &'a [ModuleNode]) -> Self {
        let mut by_id = HashMap::new();
        for module in modules {
            by_id.entry(module.id.as_str()).or_insert(module);
        }
        Self { by_id }
    }

    fn reachable_from(&self, start: &'a ModuleNode) -> usize {
        let mut seen: HashSet<&'a str> = HashSet::new();
        seen.insert(start.id.as_str());
        let mut queue: VecDeque<&'a ModuleNode> = VecDeque::from([start]);
        let mut count = 0;
        while let Some(module) = queue.pop_front() {
            for dep in &module.dependencies {
                let Some(&next) = self.by_id.get(dep.as_str()) else {
                    continue;
                };
                if seen.insert(next.id.as_str()) {
                    count += 1;
                    queue.push_back(next);
                }
            }
        }
        count
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyWidget;

impl Widget for DependencyWidget {
    const KIND: WidgetKind = WidgetKind::Dependency;
    const TITLE: &'static str = "Dependencies";
    type View = DependencyView;

    fn view(&self, record: &ResultRecord, snapshot: &Snapshot) -> DependencyView {
        let settings = snapshot.settings.dependency;
        let graph = Graph::new(&record.dependency_graph);

        let entries: Vec<DependencyEntry> = record
            .dependency_graph
            .iter()
            .map(|module| {
                let mut dependencies = Vec::new();
                let mut dangling = 0;
                for dep in &module.dependencies {
                    match graph.by_id.get(dep.as_str()) {
                        Some(target) => dependencies.push(ResolvedDependency {
                            id: target.id.clone(),
                            name: target.name.clone(),
                        }),
                        None => dangling += 1,
                    }
                }
                DependencyEntry {
                    id: module.id.clone(),
                    name: module.name.clone(),
                    kind: settings.show_types.then_some(module.kind),
                    details: module.details.clone().filter(|_| settings.show_details),
                    dependencies,
                    dangling,
                    reachable: graph.reachable_from(module),
                }
            })
            .collect();

        if !settings.group_by_type {
            return DependencyView::Flat(entries);
        }

        let mut groups: Vec<DependencyGroup> = Vec::new();
        for (module, entry) in record.dependency_graph.iter().zip(entries) {
            match groups.iter_mut().find(|group| group.kind == module.kind) {
                Some(group) => group.entries.push(entry),
                None => groups.push(DependencyGroup { kind: module.kind, entries: vec![entry] }),
            }
        }
        DependencyView::Grouped(groups)
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &DependencyEntry, indent: &str) -> fmt::Result {
    write!(f, "{indent}{}", entry.name)?;
    if let Some(kind) = entry.kind {
        write!(f, " [{}]", kind.as_str())?;
    }
    if entry.reachable > 0 {
        write!(f, " (reaches {})", entry.reachable)?;
    }
    writeln!(f)?;
    if let Some(details) = &entry.details {
        writeln!(f, "{indent}  {details}")?;
    }
    for dep in &entry.dependencies {
        writeln!(f, "{indent}  -> {}", dep.name)?;
    }
    Ok(())
}

impl fmt::Display for DependencyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyView::Flat(entries) if entries.is_empty() => writeln!(f, "  (no modules)"),
            DependencyView::Flat(entries) => {
                for entry in entries {
                    write_entry(f, entry, "  ")?;
                }
                Ok(())
            }
            DependencyView::Grouped(groups) => {
                for group in groups {
                    writeln!(f, "  {}:", group.kind.as_str())?;
                    for entry in &group.entries {
                        write_entry(f, entry, "    ")?;
                    }
                }
                Ok(())
            }
        }
    }
}
