use tracing::debug;

use super::{BarHeight, ChartConfig, Comparison, Metric, PieShare};
use crate::models::SiteRecord;
use crate::selection::SelectionSet;

fn magnitude(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn selected_values<'a>(
    records: &'a [SiteRecord],
    metric: Metric,
    selected: &'a SelectionSet,
) -> impl Iterator<Item = (&'a SiteRecord, f64)> + 'a {
    records
        .iter()
        .filter(move |site| selected.contains(&site.id))
        .map(move |site| (site, magnitude(metric.value(site))))
}

/// Bar heights for the selected sites, scaled against the largest selected
/// value and floored at `min_height`.
pub fn compute_bar_heights(
    records: &[SiteRecord],
    metric: Metric,
    selected: &SelectionSet,
    config: &ChartConfig,
) -> Vec<BarHeight> {
    let values: Vec<(&SiteRecord, f64)> = selected_values(records, metric, selected).collect();
    let max_value = values.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    values
        .into_iter()
        .map(|(site, value)| {
            let ratio = if max_value > 0.0 { value / max_value } else { 0.0 };
            BarHeight {
                id: site.id.clone(),
                name: site.name.clone(),
                value,
                height: (ratio * config.scale_max).max(config.min_height),
            }
        })
        .collect()
}

/// Percentage share of each selected site. All shares are zero when the
/// selected values sum to zero.
pub fn compute_pie_shares(
    records: &[SiteRecord],
    metric: Metric,
    selected: &SelectionSet,
    config: &ChartConfig,
) -> Vec<PieShare> {
    let values: Vec<(&SiteRecord, f64)> = selected_values(records, metric, selected).collect();
    let total: f64 = values.iter().map(|(_, v)| *v).sum();

    values
        .into_iter()
        .enumerate()
        .map(|(index, (site, value))| PieShare {
            id: site.id.clone(),
            name: site.name.clone(),
            value,
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            color: config.color_at(index),
        })
        .collect()
}

pub struct ComparisonAggregator {
    config: ChartConfig,
}

impl ComparisonAggregator {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn compare(
        &self,
        records: &[SiteRecord],
        metric: Metric,
        selected: &SelectionSet,
    ) -> Comparison {
        let bars = compute_bar_heights(records, metric, selected, &self.config);
        let pie = compute_pie_shares(records, metric, selected, &self.config);

        debug!(
            "Compared {} of {} sites by {}",
            bars.len(),
            records.len(),
            metric
        );

        Comparison {
            metric,
            label: metric.label(),
            bars,
            pie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_tools::mock_data::sample_sites;

    fn first_three() -> (Vec<SiteRecord>, SelectionSet) {
        let sites: Vec<SiteRecord> = sample_sites().into_iter().take(3).collect();
        let selected = SelectionSet::all(&sites);
        (sites, selected)
    }

    fn zeroed(mut sites: Vec<SiteRecord>) -> Vec<SiteRecord> {
        for site in &mut sites {
            site.visitors = 0;
        }
        sites
    }

    #[test]
    fn test_bar_heights_are_proportional() {
        let (sites, selected) = first_three();
        let config = ChartConfig::default();
        let bars = compute_bar_heights(&sites, Metric::Visitors, &selected, &config);

        let heights: Vec<f64> = bars.iter().map(|b| b.height).collect();
        assert_eq!(heights.len(), 3);
        assert!((heights[0] - 280.0).abs() < 1e-9);
        assert!((heights[1] - 8700.0 / 12500.0 * 280.0).abs() < 1e-9);
        assert!((heights[2] - 3200.0 / 12500.0 * 280.0).abs() < 1e-9);
        assert!(heights.iter().all(|h| *h >= 30.0 && *h <= 280.0));
    }

    #[test]
    fn test_bar_heights_floor_at_min_height() {
        let mut sites = sample_sites();
        sites[1].visitors = 1;
        let selected = SelectionSet::all(&sites);
        let bars = compute_bar_heights(&sites, Metric::Visitors, &selected, &ChartConfig::default());
        assert_eq!(bars[1].height, 30.0);
    }

    #[test]
    fn test_all_zero_values() {
        let (sites, selected) = first_three();
        let sites = zeroed(sites);
        let config = ChartConfig::default();

        let bars = compute_bar_heights(&sites, Metric::Visitors, &selected, &config);
        assert_eq!(bars.iter().map(|b| b.height).collect::<Vec<_>>(), vec![30.0, 30.0, 30.0]);

        let pie = compute_pie_shares(&sites, Metric::Visitors, &selected, &config);
        assert_eq!(pie.iter().map(|p| p.percentage).collect::<Vec<_>>(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_max_is_taken_over_selection_only() {
        let sites = sample_sites();
        let selected = SelectionSet::all(&sites).toggle("1");
        let bars = compute_bar_heights(&sites, Metric::Visitors, &selected, &ChartConfig::default());

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].id, "2");
        assert!((bars[0].height - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_shares_sum_to_hundred() {
        let sites = sample_sites();
        let selected = SelectionSet::all(&sites);
        let config = ChartConfig::default();
        for metric in [
            Metric::Visitors,
            Metric::Pageviews,
            Metric::ClickRate,
            Metric::AvgSessionDuration,
        ] {
            let pie = compute_pie_shares(&sites, metric, &selected, &config);
            let sum: f64 = pie.iter().map(|p| p.percentage).sum();
            assert!((sum - 100.0).abs() < 1e-9, "metric {} summed to {}", metric, sum);
        }
    }

    #[test]
    fn test_pie_colors_follow_selected_order() {
        let sites = sample_sites();
        let config = ChartConfig {
            palette: vec!["a".into(), "b".into()],
            ..ChartConfig::default()
        };
        let selected = SelectionSet::all(&sites).toggle("2");
        let pie = compute_pie_shares(&sites, Metric::Visitors, &selected, &config);

        let assigned: Vec<(&str, &str)> = pie
            .iter()
            .map(|p| (p.id.as_str(), p.color.as_str()))
            .collect();
        assert_eq!(assigned, vec![("1", "a"), ("3", "b"), ("4", "a")]);
    }

    #[test]
    fn test_unknown_selected_ids_are_ignored() {
        let sites = sample_sites();
        let selected = SelectionSet::from_ids(["missing", "3"]);
        let comparison = ComparisonAggregator::new(ChartConfig::default()).compare(
            &sites,
            Metric::Pageviews,
            &selected,
        );

        assert_eq!(comparison.bars.len(), 1);
        assert_eq!(comparison.pie[0].percentage, 100.0);
        assert_eq!(comparison.label, "Total Pageviews");
    }

    #[test]
    fn test_negative_or_nan_values_count_as_zero() {
        let (mut sites, selected) = first_three();
        sites[0].click_rate = f64::NAN;
        sites[1].click_rate = -4.0;
        sites[2].click_rate = 0.0;
        let config = ChartConfig::default();

        let bars = compute_bar_heights(&sites, Metric::ClickRate, &selected, &config);
        assert!(bars.iter().all(|b| b.height == 30.0));
        let pie = compute_pie_shares(&sites, Metric::ClickRate, &selected, &config);
        assert!(pie.iter().all(|p| p.percentage == 0.0));
    }
}
