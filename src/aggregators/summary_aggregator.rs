use super::SummaryMetrics;
use crate::models::SiteRecord;

/// Totals and means across every site in the snapshot.
pub fn summarize(sites: &[SiteRecord]) -> SummaryMetrics {
    if sites.is_empty() {
        return SummaryMetrics::default();
    }

    let count = sites.len() as f64;
    SummaryMetrics {
        sites: sites.len(),
        total_visitors: sites.iter().map(|s| s.visitors).sum(),
        unique_visitors: sites.iter().map(|s| s.unique_visitors).sum(),
        total_pageviews: sites.iter().map(|s| s.pageviews).sum(),
        click_through_rate: sites.iter().map(|s| s.click_rate).sum::<f64>() / count,
        avg_session_duration: sites
            .iter()
            .map(|s| s.avg_session_duration as f64)
            .sum::<f64>()
            / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_tools::mock_data::sample_sites;

    #[test]
    fn test_summarize_sample_sites() {
        let summary = summarize(&sample_sites());
        assert_eq!(summary.sites, 4);
        assert_eq!(summary.total_visitors, 12500 + 8700 + 3200 + 876);
        assert_eq!(summary.unique_visitors, 8721 + 4218 + 1987 + 654);
        assert!((summary.click_through_rate - (3.2 + 2.1 + 1.8 + 4.1) / 4.0).abs() < 1e-9);
        assert!((summary.avg_session_duration - (145.0 + 95.0 + 120.0 + 245.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), SummaryMetrics::default());
    }
}
