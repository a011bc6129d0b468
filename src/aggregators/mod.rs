use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;
use crate::models::SiteRecord;

pub mod comparison_aggregator;
pub mod summary_aggregator;

pub use comparison_aggregator::{compute_bar_heights, compute_pie_shares, ComparisonAggregator};
pub use summary_aggregator::summarize;

/// The site fields that can be put side by side in the comparison chart.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    #[default]
    Visitors,
    Pageviews,
    ClickRate,
    AvgSessionDuration,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Visitors => "visitors",
            Metric::Pageviews => "pageviews",
            Metric::ClickRate => "clickRate",
            Metric::AvgSessionDuration => "avgSessionDuration",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Visitors => "Total Visitors",
            Metric::Pageviews => "Total Pageviews",
            Metric::ClickRate => "Click Rate (%)",
            Metric::AvgSessionDuration => "Avg. Session Duration (s)",
        }
    }

    pub fn value(&self, site: &SiteRecord) -> f64 {
        match self {
            Metric::Visitors => site.visitors as f64,
            Metric::Pageviews => site.pageviews as f64,
            Metric::ClickRate => site.click_rate,
            Metric::AvgSessionDuration => site.avg_session_duration as f64,
        }
    }
}

impl FromStr for Metric {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitors" => Ok(Metric::Visitors),
            "pageviews" => Ok(Metric::Pageviews),
            "clickRate" => Ok(Metric::ClickRate),
            "avgSessionDuration" => Ok(Metric::AvgSessionDuration),
            other => Err(SelectorError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual constants for the comparison chart, in the dashboard's pixel units.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub min_height: f64,
    pub scale_max: f64,
    pub palette: Vec<String>,
}

pub const DEFAULT_PALETTE: &[&str] = &["#3b82f6", "#22c55e", "#eab308", "#a855f7", "#ef4444"];

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_height: 30.0,
            scale_max: 280.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ChartConfig {
    pub fn color_at(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return String::new();
        }
        self.palette[index % self.palette.len()].clone()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarHeight {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieShare {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub metric: Metric,
    pub label: &'static str,
    pub bars: Vec<BarHeight>,
    pub pie: Vec<PieShare>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub sites: usize,
    pub total_visitors: u64,
    pub unique_visitors: u64,
    pub total_pageviews: u64,
    pub click_through_rate: f64,
    /// Seconds.
    pub avg_session_duration: f64,
}
