use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;
use crate::models::VisitorRecord;

const MOBILE_OS: &[&str] = &["iOS", "Android"];
const DESKTOP_OS: &[&str] = &["Windows", "macOS"];

/// Narrows the visitor table by click channel or device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitorCategory {
    #[default]
    All,
    Tel,
    ChatA,
    ChatB,
    Mobile,
    Desktop,
}

impl VisitorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorCategory::All => "all",
            VisitorCategory::Tel => "tel",
            VisitorCategory::ChatA => "chatA",
            VisitorCategory::ChatB => "chatB",
            VisitorCategory::Mobile => "mobile",
            VisitorCategory::Desktop => "desktop",
        }
    }

    pub fn matches(&self, visitor: &VisitorRecord) -> bool {
        match self {
            VisitorCategory::All => true,
            VisitorCategory::Tel => visitor.tel_clicks > 0,
            VisitorCategory::ChatA => visitor.chat_a_clicks > 0,
            VisitorCategory::ChatB => visitor.chat_b_clicks > 0,
            VisitorCategory::Mobile => MOBILE_OS.contains(&visitor.os.as_str()),
            VisitorCategory::Desktop => DESKTOP_OS.contains(&visitor.os.as_str()),
        }
    }
}

impl FromStr for VisitorCategory {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(VisitorCategory::All),
            "tel" => Ok(VisitorCategory::Tel),
            "chatA" | "zalo" => Ok(VisitorCategory::ChatA),
            "chatB" | "messenger" => Ok(VisitorCategory::ChatB),
            "mobile" => Ok(VisitorCategory::Mobile),
            "desktop" => Ok(VisitorCategory::Desktop),
            other => Err(SelectorError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for VisitorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn matches_search(visitor: &VisitorRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &visitor.ip,
        &visitor.browser,
        &visitor.provider,
        &visitor.os,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Keeps the visitors that match both the free-text search and the category,
/// in input order.
pub fn filter_visitors(
    records: &[VisitorRecord],
    search_term: &str,
    category: VisitorCategory,
) -> Vec<VisitorRecord> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|visitor| category.matches(visitor) && matches_search(visitor, &needle))
        .cloned()
        .collect()
}
