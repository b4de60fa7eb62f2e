use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    CodeTree,
    Complexity,
    Dependency,
    Performance,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] =
        [WidgetKind::CodeTree, WidgetKind::Complexity, WidgetKind::Dependency, WidgetKind::Performance];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::CodeTree => "codeTree",
            WidgetKind::Complexity => "complexity",
            WidgetKind::Dependency => "dependency",
            WidgetKind::Performance => "performance",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "codeTree" | "code-tree" | "tree" => Ok(WidgetKind::CodeTree),
            "complexity" => Ok(WidgetKind::Complexity),
            "dependency" | "dependencies" => Ok(WidgetKind::Dependency),
            "performance" => Ok(WidgetKind::Performance),
            other => Err(SettingsError::UnknownWidget(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown widget '{0}'. Allowed: codeTree, complexity, dependency, performance")]
    UnknownWidget(String),
    #[error("Unknown setting '{key}' for widget {widget}. Allowed: {allowed}")]
    UnknownKey { widget: WidgetKind, key: String, allowed: String },
}

/// Flat boolean option record owned by one widget.
pub trait SettingsRecord {
    /// Setting names in display order.
    const KEYS: &'static [&'static str];

    fn get(&self, key: &str) -> Option<bool>;

    /// Returns `false` when `key` is not one of [`Self::KEYS`].
    fn set(&mut self, key: &str, value: bool) -> bool;

    fn entries(&self) -> Vec<(&'static str, bool)> {
        Self::KEYS.iter().filter_map(|k| self.get(k).map(|v| (*k, v))).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeTreeSettings {
    pub show_line_numbers: bool,
    pub show_file_sizes: bool,
    pub expanded_by_default: bool,
}

impl Default for CodeTreeSettings {
    fn default() -> Self {
        Self { show_line_numbers: true, show_file_sizes: true, expanded_by_default: false }
    }
}

impl SettingsRecord for CodeTreeSettings {
    const KEYS: &'static [&'static str] = &["showLineNumbers", "showFileSizes", "expandedByDefault"];

    fn get(&self, key: &str) -> Option<bool> {
        match key {
            "showLineNumbers" => Some(self.show_line_numbers),
            "showFileSizes" => Some(self.show_file_sizes),
            "expandedByDefault" => Some(self.expanded_by_default),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "showLineNumbers" => &mut self.show_line_numbers,
            "showFileSizes" => &mut self.show_file_sizes,
            "expandedByDefault" => &mut self.expanded_by_default,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplexitySettings {
    pub show_trends: bool,
    pub show_thresholds: bool,
    pub show_percentages: bool,
}

impl Default for ComplexitySettings {
    fn default() -> Self {
        Self { show_trends: true, show_thresholds: true, show_percentages: true }
    }
}

impl SettingsRecord for ComplexitySettings {
    const KEYS: &'static [&'static str] = &["showTrends", "showThresholds", "showPercentages"];

    fn get(&self, key: &str) -> Option<bool> {
        match key {
            "showTrends" => Some(self.show_trends),
            "showThresholds" => Some(self.show_thresholds),
            "showPercentages" => Some(self.show_percentages),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "showTrends" => &mut self.show_trends,
            "showThresholds" => &mut self.show_thresholds,
            "showPercentages" => &mut self.show_percentages,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencySettings {
    pub show_types: bool,
    pub show_details: bool,
    pub group_by_type: bool,
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self { show_types: true, show_details: true, group_by_type: false }
    }
}

impl SettingsRecord for DependencySettings {
    const KEYS: &'static [&'static str] = &["showTypes", "showDetails", "groupByType"];

    fn get(&self, key: &str) -> Option<bool> {
        match key {
            "showTypes" => Some(self.show_types),
            "showDetails" => Some(self.show_details),
            "groupByType" => Some(self.group_by_type),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "showTypes" => &mut self.show_types,
            "showDetails" => &mut self.show_details,
            "groupByType" => &mut self.group_by_type,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceSettings {
    pub show_real_time: bool,
    pub show_alerts: bool,
    pub show_thresholds: bool,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self { show_real_time: true, show_alerts: true, show_thresholds: true }
    }
}

impl SettingsRecord for PerformanceSettings {
    const KEYS: &'static [&'static str] = &["showRealTime", "showAlerts", "showThresholds"];

    fn get(&self, key: &str) -> Option<bool> {
        match key {
            "showRealTime" => Some(self.show_real_time),
            "showAlerts" => Some(self.show_alerts),
            "showThresholds" => Some(self.show_thresholds),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "showRealTime" => &mut self.show_real_time,
            "showAlerts" => &mut self.show_alerts,
            "showThresholds" => &mut self.show_thresholds,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Display settings for all four widgets.
///
/// Lives only in the process (and optionally in the local project config);
/// it is never sent through the persistence gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    pub code_tree: CodeTreeSettings,
    pub complexity: ComplexitySettings,
    pub dependency: DependencySettings,
    pub performance: PerformanceSettings,
}

impl WidgetSettings {
    /// Merge a single key into one widget's record. Other widgets are untouched.
    pub fn set(&mut self, widget: WidgetKind, key: &str, value: bool) -> Result<(), SettingsError> {
        let applied = match widget {
            WidgetKind::CodeTree => self.code_tree.set(key, value),
            WidgetKind::Complexity => self.complexity.set(key, value),
            WidgetKind::Dependency => self.dependency.set(key, value),
            WidgetKind::Performance => self.performance.set(key, value),
        };
        if applied {
            Ok(())
        } else {
            Err(SettingsError::UnknownKey {
                widget,
                key: key.to_string(),
                allowed: Self::keys(widget).join(", "),
            })
        }
    }

    pub fn get(&self, widget: WidgetKind, key: &str) -> Option<bool> {
        match widget {
            WidgetKind::CodeTree => self.code_tree.get(key),
            WidgetKind::Complexity => self.complexity.get(key),
            WidgetKind::Dependency => self.dependency.get(key),
            WidgetKind::Performance => self.performance.get(key),
        }
    }

    pub fn keys(widget: WidgetKind) -> &'static [&'static str] {
        match widget {
            WidgetKind::CodeTree => CodeTreeSettings::KEYS,
            WidgetKind::Complexity => ComplexitySettings::KEYS,
            WidgetKind::Dependency => DependencySettings::KEYS,
            WidgetKind::Performance => PerformanceSettings::KEYS,
        }
    }

    pub fn entries(&self, widget: WidgetKind) -> Vec<(&'static str, bool)> {
        match widget {
            WidgetKind::CodeTree => self.code_tree.entries(),
            WidgetKind::Complexity => self.complexity.entries(),
            WidgetKind::Dependency => self.dependency.entries(),
            WidgetKind::Performance => self.performance.entries(),
        }
    }
}

/// Per-widget loading flags; all start raised until the first fetch resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFlags {
    pub code_tree: bool,
    pub complexity: bool,
    pub dependency: bool,
    pub performance: bool,
}

impl LoadingFlags {
    pub fn all(loading: bool) -> Self {
        Self { code_tree: loading, complexity: loading, dependency: loading, performance: loading }
    }

    pub fn get(&self, widget: WidgetKind) -> bool {
        match widget {
            WidgetKind::CodeTree => self.code_tree,
            WidgetKind::Complexity => self.complexity,
            WidgetKind::Dependency => self.dependency,
            WidgetKind::Performance => self.performance,
        }
    }

    pub fn set(&mut self, widget: WidgetKind, loading: bool) {
        match widget {
            WidgetKind::CodeTree => self.code_tree = loading,
            WidgetKind::Complexity => self.complexity = loading,
            WidgetKind::Dependency => self.dependency = loading,
            WidgetKind::Performance => self.performance = loading,
        }
    }
}

impl Default for LoadingFlags {
    fn default() -> Self {
        Self::all(true)
    }
}
