use std::fmt;

use serde::Serialize;

use crate::model::ResultRecord;
use crate::store::{Snapshot, WidgetKind};
use crate::widgets::Widget;

pub const MEMORY_THRESHOLD_KIB: f64 = 1000.0;
pub const EXECUTION_THRESHOLD_MS: f64 = 100.0;
/// Gauges above this share of their threshold raise an alert.
pub const ALERT_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub threshold: f64,
    pub percent: f64,
    pub alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl Gauge {
    fn new(
        label: &'static str,
        value: f64,
        unit: &'static str,
        threshold: f64,
        show_alerts: bool,
        show_thresholds: bool,
    ) -> Self {
        let percent = value / threshold * 100.0;
        Self {
            label,
            value,
            unit,
            threshold,
            percent,
            alert: show_alerts && percent > ALERT_PERCENT,
            range: show_thresholds.then_some((0.0, threshold)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub time_complexity: String,
    pub space_complexity: String,
    pub gauges: Vec<Gauge>,
    /// Realtime indicator: enabled in settings and a subscription is attached.
    pub live: bool,
}

impl PerformanceView {
    pub fn alerts(&self) -> impl Iterator<Item = &Gauge> {
        self.gauges.iter().filter(|gauge| gauge.alert)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceWidget;

impl Widget for PerformanceWidget {
    const KIND: WidgetKind = WidgetKind::Performance;
    const TITLE: &'static str = "Performance";
    type View = PerformanceView;

    fn view(&self, record: &ResultRecord, snapshot: &Snapshot) -> PerformanceView {
        let settings = snapshot.settings.performance;
        let perf = &record.performance;
        PerformanceView {
            time_complexity: perf.time_complexity.clone(),
            space_complexity: perf.space_complexity.clone(),
            gauges: vec![
                Gauge::new(
                    "Memory Usage",
                    perf.memory_usage as f64,
                    "KB",
                    MEMORY_THRESHOLD_KIB,
                    settings.show_alerts,
                    settings.show_thresholds,
                ),
                Gauge::new(
                    "Execution Time",
                    perf.execution_time,
                    "ms",
                    EXECUTION_THRESHOLD_MS,
                    settings.show_alerts,
                    settings.show_thresholds,
                ),
            ],
            live: settings.show_real_time && snapshot.live,
        }
    }
}

impl fmt::Display for PerformanceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.live {
            writeln!(f, "  ● live")?;
        }
        writeln!(f, "  Time Complexity:  {}", self.time_complexity)?;
        writeln!(f, "  Space Complexity: {}", self.space_complexity)?;
        for gauge in &self.gauges {
            write!(
                f,
                "  {:<15} {:>8.2} {} ({:.1}%)",
                gauge.label, gauge.value, gauge.unit, gauge.percent
            )?;
            if let Some((low, high)) = gauge.range {
                write!(f, "  [{low}..{high}]")?;
            }
            if gauge.alert {
                write!(f, "  ! above {ALERT_PERCENT}% of threshold")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
