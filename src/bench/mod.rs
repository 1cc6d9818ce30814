//! Benchmark harness: named measurements, alerts and a JSON report.
pub mod targets;

use crate::compiler::{CompilationError, RuntimeError};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

pub use targets::{Target, TargetOptions, find_target, targets};

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("alert references unknown metric `{0}`")]
    UnknownMetric(String),
    #[error("invalid benchmark options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Compilation(#[from] CompilationError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterEqual,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Equal => value == threshold,
            Comparison::NotEqual => value != threshold,
            Comparison::Less => value < threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Greater => value > threshold,
            Comparison::GreaterEqual => value >= threshold,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Alert {
    metric: String,
    comparison: Comparison,
    threshold: f64,
}

/// Collects measurements for one benchmark run.
///
/// Repeated measurements under the same name are averaged in the report.
#[derive(Debug)]
pub struct Benchmark {
    name: String,
    measurements: Vec<(String, Vec<f64>)>,
    alerts: Vec<Alert>,
}

impl Benchmark {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurements: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `f` and records its wall-clock time in milliseconds.
    pub fn measure<T>(&mut self, metric: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(metric, start.elapsed().as_secs_f64() * 1000.0);
        out
    }

    pub fn record(&mut self, metric: &str, value: f64) {
        match self.measurements.iter_mut().find(|(name, _)| name == metric) {
            Some((_, samples)) => samples.push(value),
            None => self.measurements.push((metric.to_string(), vec![value])),
        }
    }

    /// Fires when `metric comparison threshold` holds for the averaged
    /// value.
    pub fn alert(&mut self, metric: &str, comparison: Comparison, threshold: f64) {
        self.alerts.push(Alert {
            metric: metric.to_string(),
            comparison,
            threshold,
        });
    }

    pub fn finish(self) -> Result<BenchmarkReport, BenchError> {
        let measurements: Vec<MetricSummary> = self
            .measurements
            .iter()
            .map(|(name, samples)| MetricSummary::new(name, samples))
            .collect();

        let mut alerts = Vec::with_capacity(self.alerts.len());
        for alert in self.alerts {
            let value = measurements
                .iter()
                .find(|m| m.name == alert.metric)
                .map(|m| m.value)
                .ok_or_else(|| BenchError::UnknownMetric(alert.metric.clone()))?;
            let triggered = alert.comparison.holds(value, alert.threshold);
            if triggered {
                warn!(
                    benchmark = %self.name,
                    "alert: {} {} {} (value {value})",
                    alert.metric, alert.comparison, alert.threshold
                );
            }
            alerts.push(AlertReport {
                metric: alert.metric,
                comparison: alert.comparison,
                threshold: alert.threshold,
                value,
                triggered,
            });
        }

        info!(benchmark = %self.name, metrics = measurements.len(), "benchmark finished");
        Ok(BenchmarkReport {
            name: self.name,
            measurements,
            alerts,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub name: String,
    /// Mean over all samples.
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl MetricSummary {
    fn new(name: &str, samples: &[f64]) -> Self {
        let sum: f64 = samples.iter().sum();
        Self {
            name: name.to_string(),
            value: sum / samples.len() as f64,
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            samples: samples.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    pub metric: String,
    pub comparison: Comparison,
    pub threshold: f64,
    pub value: f64,
    pub triggered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub name: String,
    pub measurements: Vec<MetricSummary>,
    pub alerts: Vec<AlertReport>,
}

impl BenchmarkReport {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.measurements
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    pub fn triggered_alerts(&self) -> impl Iterator<Item = &AlertReport> {
        self.alerts.iter().filter(|a| a.triggered)
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for m in &self.measurements {
            writeln!(f, "  {:<28} {:>12.3}  (n={})", m.name, m.value, m.samples)?;
        }
        for a in self.triggered_alerts() {
            writeln!(
                f,
                "  ALERT {} {} {} (value {:.3})",
                a.metric, a.comparison, a.threshold, a.value
            )?;
        }
        Ok(())
    }
}
