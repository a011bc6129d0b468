use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    #[serde(rename = "3G")]
    ThreeG,
    #[serde(rename = "4G")]
    FourG,
    #[serde(rename = "WiFi")]
    WiFi,
    #[serde(other)]
    Unknown,
}

/// A single visitor row as delivered by the tracking backend.
///
/// Visitors carry no site id; which site a visitor belongs to is not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub id: String,
    pub ip: String,
    pub browser: String,
    pub provider: String,
    pub connection_type: ConnectionType,
    pub os: String,
    pub os_version: String,
    pub screen_size: String,
    #[serde(default)]
    pub tel_clicks: u32,
    #[serde(default, alias = "zaloClicks")]
    pub chat_a_clicks: u32,
    #[serde(default, alias = "messengerClicks")]
    pub chat_b_clicks: u32,
    /// Display string, never parsed.
    pub visit_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SiteStatus>,
    pub visitors: u64,
    #[serde(default)]
    pub unique_visitors: u64,
    #[serde(default)]
    pub pageviews: u64,
    /// Percentage, e.g. `3.2` for 3.2%.
    pub click_rate: f64,
    /// Seconds.
    #[serde(with = "session_duration")]
    pub avg_session_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Everything the dashboard reads in one pass. Replaced as a whole, never
/// patched in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardData {
    pub visitors: Vec<VisitorRecord>,
    pub sites: Vec<SiteRecord>,
}

/// `avgSessionDuration` arrives either as seconds or as a display string
/// such as `"2m 45s"`. It is always written back as seconds.
pub mod session_duration {
    use regex::Regex;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Fractional(f64),
        Text(String),
    }

    pub fn serialize<S>(seconds: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(*seconds)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(secs) => u32::try_from(secs).map_err(de::Error::custom),
            RawDuration::Fractional(secs) => {
                if secs.is_finite() && secs >= 0.0 && secs <= u32::MAX as f64 {
                    Ok(secs.round() as u32)
                } else {
                    Err(de::Error::custom(format!("invalid session duration: {}", secs)))
                }
            }
            RawDuration::Text(text) => parse(&text).map_err(de::Error::custom),
        }
    }

    /// Parses `"145"`, `"45s"`, `"3m"`, `"2m 45s"` or `"1h 2m 3s"` into seconds.
    pub fn parse(text: &str) -> Result<u32, String> {
        let trimmed = text.trim();
        if let Ok(secs) = trimmed.parse::<u32>() {
            return Ok(secs);
        }

        let re = Regex::new(r"^(?:(?P<h>\d+)\s*h)?\s*(?:(?P<m>\d+)\s*m)?\s*(?:(?P<s>\d+)\s*s)?$")
            .map_err(|e| e.to_string())?;
        let caps = re
            .captures(trimmed)
            .ok_or_else(|| format!("invalid session duration: {:?}", text))?;

        let mut total: u64 = 0;
        let mut matched = false;
        for (name, factor) in [("h", 3600u64), ("m", 60), ("s", 1)] {
            if let Some(part) = caps.name(name) {
                let value: u64 = part.as_str().parse().map_err(|e| format!("{}", e))?;
                total = value
                    .checked_mul(factor)
                    .and_then(|part| total.checked_add(part))
                    .ok_or_else(|| format!("invalid session duration: {:?}", text))?;
                matched = true;
            }
        }

        if !matched {
            return Err(format!("invalid session duration: {:?}", text));
        }
        u32::try_from(total).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_strings() {
        assert_eq!(session_duration::parse("2m 45s"), Ok(165));
        assert_eq!(session_duration::parse("4m 05s"), Ok(245));
        assert_eq!(session_duration::parse("45s"), Ok(45));
        assert_eq!(session_duration::parse("3m"), Ok(180));
        assert_eq!(session_duration::parse("1h 2m 3s"), Ok(3723));
        assert_eq!(session_duration::parse("145"), Ok(145));
        assert!(session_duration::parse("").is_err());
        assert!(session_duration::parse("soon").is_err());
    }

    #[test]
    fn test_oversized_duration_is_an_error() {
        assert!(session_duration::parse("9999999999999999h").is_err());
        assert!(session_duration::parse("99999999999999999999s").is_err());
        assert!(session_duration::parse("2000000h").is_err());

        let result: Result<SiteRecord, _> = serde_json::from_str(
            r#"{"id":"9","name":"Huge","url":"https://huge.example.com","visitors":1,
                "clickRate":1.0,"avgSessionDuration":"9999999999999999h 1m"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_site_record_accepts_both_duration_forms() {
        let from_text: SiteRecord = serde_json::from_str(
            r#"{"id":"1","name":"E-commerce Store","url":"https://mystore.example.com",
                "status":"active","visitors":12453,"uniqueVisitors":8721,"clickRate":3.2,
                "avgSessionDuration":"2m 45s","lastUpdated":"2 hours ago"}"#,
        )
        .unwrap();
        assert_eq!(from_text.avg_session_duration, 165);
        assert_eq!(from_text.status, Some(SiteStatus::Active));
        assert_eq!(from_text.pageviews, 0);

        let from_seconds: SiteRecord = serde_json::from_str(
            r#"{"id":"2","name":"Company Blog","url":"blog.company.com","visitors":8700,
                "pageviews":22000,"clickRate":2.1,"avgSessionDuration":95}"#,
        )
        .unwrap();
        assert_eq!(from_seconds.avg_session_duration, 95);
        assert_eq!(from_seconds.status, None);

        let json = serde_json::to_value(&from_text).unwrap();
        assert_eq!(json["avgSessionDuration"], 165);
        assert_eq!(json["uniqueVisitors"], 8721);
    }

    #[test]
    fn test_visitor_record_schema() {
        let visitor: VisitorRecord = serde_json::from_str(
            r#"{"id":"1","ip":"192.168.1.1","browser":"Chrome 96","provider":"Viettel",
                "connectionType":"WiFi","os":"Windows","osVersion":"11","screenSize":"1920x1080",
                "telClicks":2,"zaloClicks":1,"messengerClicks":0,"visitTime":"2023-06-15 14:32"}"#,
        )
        .unwrap();
        assert_eq!(visitor.connection_type, ConnectionType::WiFi);
        assert_eq!(visitor.chat_a_clicks, 1);

        let json = serde_json::to_value(&visitor).unwrap();
        assert_eq!(json["chatAClicks"], 1);
        assert_eq!(json["connectionType"], "WiFi");
    }

    #[test]
    fn test_unrecognized_connection_type_is_unknown() {
        let parsed: ConnectionType = serde_json::from_str(r#""5G""#).unwrap();
        assert_eq!(parsed, ConnectionType::Unknown);
        let parsed: ConnectionType = serde_json::from_str(r#""3G""#).unwrap();
        assert_eq!(parsed, ConnectionType::ThreeG);
    }
}
