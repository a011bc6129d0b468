use anyhow::{bail, Context, Result};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::aggregators::ChartConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub chart: ChartConfig,
    pub realtime_interval: Duration,
    pub realtime_max_delta: u64,
    pub realtime_initial_visitors: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            chart: ChartConfig::default(),
            realtime_interval: Duration::from_secs(30),
            realtime_max_delta: 5,
            realtime_initial_visitors: 42,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let chart = ChartConfig {
            min_height: parse_or(&lookup, "CHART_MIN_HEIGHT", defaults.chart.min_height)?,
            scale_max: parse_or(&lookup, "CHART_SCALE_MAX", defaults.chart.scale_max)?,
            palette: defaults.chart.palette,
        };
        if !(chart.min_height >= 0.0 && chart.scale_max >= chart.min_height) {
            bail!(
                "CHART_SCALE_MAX ({}) must be at least CHART_MIN_HEIGHT ({}) and both non-negative",
                chart.scale_max,
                chart.min_height
            );
        }

        let interval_secs: u64 = parse_or(
            &lookup,
            "REALTIME_INTERVAL_SECS",
            defaults.realtime_interval.as_secs(),
        )?;
        if interval_secs == 0 {
            bail!("REALTIME_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            host: parse_or(&lookup, "TRACKWISE_HOST", defaults.host)?,
            port: parse_or(&lookup, "TRACKWISE_PORT", defaults.port)?,
            chart,
            realtime_interval: Duration::from_secs(interval_secs),
            realtime_max_delta: parse_or(&lookup, "REALTIME_MAX_DELTA", defaults.realtime_max_delta)?,
            realtime_initial_visitors: parse_or(
                &lookup,
                "REALTIME_INITIAL_VISITORS",
                defaults.realtime_initial_visitors,
            )?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}
