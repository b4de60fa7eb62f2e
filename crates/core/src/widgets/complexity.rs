use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::model::{ComplexityMetrics, ResultRecord};
use crate::store::{Snapshot, WidgetKind};
use crate::widgets::Widget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn between(previous: u32, current: u32) -> Self {
        match current.cmp(&previous) {
            Ordering::Greater => Trend::Up,
            Ordering::Less => Trend::Down,
            Ordering::Equal => Trend::Flat,
        }
    }

    fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: u32,
    pub max: u32,
    /// `value / max * 100`, present when `showPercentages` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    /// `(0, max)`, present when `showThresholds` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(u32, u32)>,
    /// Direction against the previous record, when `showTrends` is on and one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityView {
    pub rows: Vec<MetricRow>,
}

impl ComplexityView {
    pub fn row(&self, label: &str) -> Option<&MetricRow> {
        self.rows.iter().find(|row| row.label == label)
    }
}

/// Labels and scale maxima, in display order.
const SCALES: [(&str, u32); 4] = [
    ("Cyclomatic Complexity", 30),
    ("Cognitive Complexity", 40),
    ("Maintainability Index", 100),
    ("Lines of Code", 1000),
];

fn values(metrics: &ComplexityMetrics) -> [u32; 4] {
    [
        metrics.cyclomatic_complexity,
        metrics.cognitive_complexity,
        metrics.maintainability_index,
        metrics.lines_of_code,
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityWidget;

impl Widget for ComplexityWidget {
    const KIND: WidgetKind = WidgetKind::Complexity;
    const TITLE: &'static str = "Complexity";
    type View = ComplexityView;

    fn view(&self, record: &ResultRecord, snapshot: &Snapshot) -> ComplexityView {
        let settings = snapshot.settings.complexity;
        let current = values(&record.complexity);
        let previous = snapshot.previous.as_ref().map(|prev| values(&prev.complexity));

        let rows = SCALES
            .iter()
            .enumerate()
            .map(|(idx, (label, max))| {
                let value = current[idx];
                MetricRow {
                    label: *label,
                    value,
                    max: *max,
                    percent: settings
                        .show_percentages
                        .then(|| f64::from(value) / f64::from(*max) * 100.0),
                    range: settings.show_thresholds.then_some((0, *max)),
                    trend: previous
                        .filter(|_| settings.show_trends)
                        .map(|prev| Trend::between(prev[idx], value)),
                }
            })
            .collect();

        ComplexityView { rows }
    }
}

impl fmt::Display for ComplexityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "  {:<22} {:>5}", row.label, row.value)?;
            if let Some(percent) = row.percent {
                write!(f, " ({percent:.1}%)")?;
            }
            if let Some(trend) = row.trend {
                write!(f, " {}", trend.arrow())?;
            }
            if let Some((low, high)) = row.range {
                write!(f, "  [{low}..{high}]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
