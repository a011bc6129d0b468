use crate::models::{ConnectionType, DashboardData, SiteRecord, SiteStatus, VisitorRecord};

// (id, ip, browser, provider, connection, os, os_version, screen, tel, chat_a, chat_b, visit_time)
type SampleVisitor = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    ConnectionType,
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    u32,
    &'static str,
);

const SAMPLE_VISITORS: &[SampleVisitor] = &[
    ("1", "192.168.1.1", "Chrome 96", "Viettel", ConnectionType::WiFi, "Windows", "11", "1920x1080", 2, 1, 0, "2023-06-15 14:32"),
    ("2", "203.113.152.5", "Safari 15", "VNPT", ConnectionType::FourG, "iOS", "15.4", "390x844", 3, 0, 2, "2023-06-15 15:47"),
    ("3", "118.70.125.22", "Firefox 102", "FPT", ConnectionType::WiFi, "macOS", "12.4", "1440x900", 0, 2, 1, "2023-06-15 16:03"),
    ("4", "27.72.98.55", "Edge 103", "Mobifone", ConnectionType::ThreeG, "Android", "12", "412x915", 1, 3, 0, "2023-06-15 16:15"),
    ("5", "113.161.68.12", "Chrome 96", "Viettel", ConnectionType::WiFi, "Windows", "10", "1366x768", 2, 0, 0, "2023-06-15 16:30"),
];

// (id, name, url, status, visitors, unique, pageviews, click_rate, avg_session_secs, last_updated)
type SampleSite = (
    &'static str,
    &'static str,
    &'static str,
    SiteStatus,
    u64,
    u64,
    u64,
    f64,
    u32,
    &'static str,
);

const SAMPLE_SITES: &[SampleSite] = &[
    ("1", "E-commerce Store", "https://mystore.example.com", SiteStatus::Active, 12500, 8721, 45000, 3.2, 145, "2 hours ago"),
    ("2", "Company Blog", "https://blog.example.com", SiteStatus::Active, 8700, 4218, 22000, 2.1, 95, "1 day ago"),
    ("3", "Portfolio Site", "https://www.portfolio.com", SiteStatus::Inactive, 3200, 1987, 7800, 1.8, 120, "3 days ago"),
    ("4", "Support Portal", "https://support.example.com", SiteStatus::Pending, 876, 654, 3100, 4.1, 245, "5 hours ago"),
];

pub fn sample_visitors() -> Vec<VisitorRecord> {
    SAMPLE_VISITORS
        .iter()
        .map(
            |&(id, ip, browser, provider, connection_type, os, os_version, screen_size, tel, chat_a, chat_b, visit_time)| {
                VisitorRecord {
                    id: id.to_string(),
                    ip: ip.to_string(),
                    browser: browser.to_string(),
                    provider: provider.to_string(),
                    connection_type,
                    os: os.to_string(),
                    os_version: os_version.to_string(),
                    screen_size: screen_size.to_string(),
                    tel_clicks: tel,
                    chat_a_clicks: chat_a,
                    chat_b_clicks: chat_b,
                    visit_time: visit_time.to_string(),
                }
            },
        )
        .collect()
}

pub fn sample_sites() -> Vec<SiteRecord> {
    SAMPLE_SITES
        .iter()
        .map(
            |&(id, name, url, status, visitors, unique_visitors, pageviews, click_rate, avg_session_duration, last_updated)| {
                SiteRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    url: url.to_string(),
                    status: Some(status),
                    visitors,
                    unique_visitors,
                    pageviews,
                    click_rate,
                    avg_session_duration,
                    last_updated: Some(last_updated.to_string()),
                }
            },
        )
        .collect()
}

/// Seed snapshot served until a real tracking backend exists.
pub fn sample_dashboard() -> DashboardData {
    DashboardData {
        visitors: sample_visitors(),
        sites: sample_sites(),
    }
}
