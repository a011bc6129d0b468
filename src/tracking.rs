use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RegistrationError;
use crate::models::{SiteRecord, SiteStatus};

const SITE_KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SITE_KEY_LEN: usize = 8;
const TRACKER_SCRIPT_URL: &str = "https://analytics.trackwise.io/tracker.js";

/// Form submitted when a user adds a site to track.
#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteRegistration {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl WebsiteRegistration {
    pub fn validate(&self) -> Result<Url, RegistrationError> {
        if self.name.trim().chars().count() < 2 {
            return Err(RegistrationError::NameTooShort);
        }

        validate_site_url(&self.url)
    }
}

/// Tracked sites must be absolute http(s) URLs with a host.
pub fn validate_site_url(raw: &str) -> Result<Url, RegistrationError> {
    let url = Url::parse(raw.trim()).map_err(|_| RegistrationError::InvalidUrl)?;
    match (url.scheme(), url.host_str()) {
        ("http" | "https", Some(host)) if !host.is_empty() => Ok(url),
        _ => Err(RegistrationError::InvalidUrl),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSite {
    pub site: SiteRecord,
    pub site_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tracking_code: String,
}

/// `TW-` followed by eight lowercase base-36 characters.
pub fn generate_site_key<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..SITE_KEY_LEN)
        .map(|_| SITE_KEY_ALPHABET[rng.gen_range(0..SITE_KEY_ALPHABET.len())] as char)
        .collect();
    format!("TW-{}", suffix)
}

pub fn tracking_snippet(site_name: &str, site_key: &str) -> String {
    format!(
        r#"<!-- TrackWise Tracking Code for {name} -->
<script>
  (function(t,r,a,c,k) {{
    t[a]=t[a]||function(){{(t[a].q=t[a].q||[]).push(arguments)}};
    t[a].l=1*new Date();
    k=r.createElement(c);
    k.async=1;
    k.src="{script}";
    r.getElementsByTagName(c)[0].appendChild(k);
  }})(window,document,"tw","script");

  tw("init", "{key}");
  tw("trackPageview");
</script>"#,
        name = site_name,
        script = TRACKER_SCRIPT_URL,
        key = site_key,
    )
}

/// Validates the form and builds a pending site with empty metrics plus the
/// snippet the user pastes into their pages.
pub fn register<R: Rng>(
    form: &WebsiteRegistration,
    id: String,
    rng: &mut R,
) -> Result<TrackedSite, RegistrationError> {
    let url = form.validate()?;
    let name = form.name.trim().to_string();
    let site_key = generate_site_key(rng);
    let tracking_code = tracking_snippet(&name, &site_key);

    Ok(TrackedSite {
        site: SiteRecord {
            id,
            name,
            url: url.to_string(),
            status: Some(SiteStatus::Pending),
            visitors: 0,
            unique_visitors: 0,
            pageviews: 0,
            click_rate: 0.0,
            avg_session_duration: 0,
            last_updated: Some("just now".to_string()),
        },
        site_key,
        category: form
            .category
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        tracking_code,
    })
}
