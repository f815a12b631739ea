//! Cloudflare zone analytics.
//!
//! Queries the GraphQL analytics API for daily request groups and reshapes
//! the answer into the flat structure the admin dashboard renders.

use std::num::NonZeroU32;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::CloudflareConfig;

pub const DEFAULT_DAYS: u32 = 7;
pub const MAX_DAYS: u32 = 30;

const ZONE_ANALYTICS_QUERY: &str = r#"
query ZoneAnalytics($zoneTag: String!, $since: Date!, $until: Date!) {
  viewer {
    zones(filter: { zoneTag: $zoneTag }) {
      httpRequests1dGroups(
        limit: 31
        filter: { date_geq: $since, date_leq: $until }
        orderBy: [date_ASC]
      ) {
        dimensions { date }
        sum { requests pageViews bytes threats cachedRequests }
        uniq { uniques }
      }
    }
  }
}
"#;

#[derive(Debug, Error)]
pub enum CloudflareError {
    #[error("Cloudflare analytics is not configured")]
    NotConfigured,

    #[error("Cloudflare request budget exhausted, try again later")]
    RateLimited,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cloudflare returned status {0}")]
    Status(u16),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Invalid response from Cloudflare: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Response shape
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrafficTotals {
    pub requests: u64,
    pub page_views: u64,
    pub unique_visitors: u64,
    pub bytes: u64,
    pub threats: u64,
    pub cached_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTraffic {
    pub date: NaiveDate,
    pub requests: u64,
    pub page_views: u64,
    pub unique_visitors: u64,
    pub bytes: u64,
    pub threats: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneAnalytics {
    pub zone_id: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub totals: TrafficTotals,
    pub daily: Vec<DailyTraffic>,
}

// ============================================================================
// GraphQL wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    #[serde(default)]
    zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Zone {
    #[serde(default)]
    http_requests1d_groups: Vec<DayGroup>,
}

#[derive(Debug, Deserialize)]
struct DayGroup {
    dimensions: DayDimensions,
    #[serde(default)]
    sum: DaySum,
    #[serde(default)]
    uniq: DayUniq,
}

#[derive(Debug, Deserialize)]
struct DayDimensions {
    date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DaySum {
    requests: u64,
    page_views: u64,
    bytes: u64,
    threats: u64,
    cached_requests: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DayUniq {
    uniques: u64,
}

/// Inclusive date window ending today covering `days` days.
pub fn date_window(days: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days = days.clamp(1, MAX_DAYS);
    let since = today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(today);
    (since, today)
}

/// Converts a raw GraphQL answer into [`ZoneAnalytics`].
pub fn reshape(
    zone_id: &str,
    since: NaiveDate,
    until: NaiveDate,
    raw: serde_json::Value,
) -> Result<ZoneAnalytics, CloudflareError> {
    let response: GraphQlResponse = serde_json::from_value(raw)
        .map_err(|e| CloudflareError::InvalidResponse(e.to_string()))?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CloudflareError::GraphQl(message));
    }

    let groups = response
        .data
        .ok_or_else(|| CloudflareError::InvalidResponse("missing data".to_string()))?
        .viewer
        .zones
        .into_iter()
        .next()
        .map(|zone| zone.http_requests1d_groups)
        .unwrap_or_default();

    let mut totals = TrafficTotals::default();
    let mut daily: Vec<DailyTraffic> = groups
        .into_iter()
        .map(|group| {
            totals.requests = totals.requests.saturating_add(group.sum.requests);
            totals.page_views = totals.page_views.saturating_add(group.sum.page_views);
            totals.unique_visitors = totals.unique_visitors.saturating_add(group.uniq.uniques);
            totals.bytes = totals.bytes.saturating_add(group.sum.bytes);
            totals.threats = totals.threats.saturating_add(group.sum.threats);
            totals.cached_requests = totals.cached_requests.saturating_add(group.sum.cached_requests);
            DailyTraffic {
                date: group.dimensions.date,
                requests: group.sum.requests,
                page_views: group.sum.page_views,
                unique_visitors: group.uniq.uniques,
                bytes: group.sum.bytes,
                threats: group.sum.threats,
            }
        })
        .collect();
    daily.sort_by_key(|d| d.date);

    Ok(ZoneAnalytics {
        zone_id: zone_id.to_string(),
        since,
        until,
        totals,
        daily,
    })
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client for the Cloudflare GraphQL analytics endpoint.
pub struct CloudflareClient {
    client: Client,
    config: CloudflareConfig,
    limiter: DirectLimiter,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("graphql_url", &self.config.graphql_url)
            .field("zone_id", &self.config.zone_id)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl CloudflareClient {
    pub fn new(config: CloudflareConfig) -> Result<Self, CloudflareError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        let per_minute = NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Takes one outbound request slot.
    fn try_acquire(&self) -> Result<(), CloudflareError> {
        self.limiter
            .check()
            .map_err(|_| CloudflareError::RateLimited)
    }

    /// Fetches daily traffic for the last `days` days (including today).
    pub async fn zone_analytics(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<ZoneAnalytics, CloudflareError> {
        if !self.config.is_configured() {
            return Err(CloudflareError::NotConfigured);
        }
        self.try_acquire()?;

        let (since, until) = date_window(days, today);
        let body = json!({
            "query": ZONE_ANALYTICS_QUERY,
            "variables": {
                "zoneTag": self.config.zone_id,
                "since": since.to_string(),
                "until": until.to_string(),
            }
        });

        let response = self
            .client
            .post(&self.config.graphql_url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CloudflareError::Timeout(self.config.timeout_ms)
                } else {
                    CloudflareError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Cloudflare analytics request failed");
            return Err(CloudflareError::Status(status.as_u16()));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CloudflareError::InvalidResponse(e.to_string()))?;

        reshape(&self.config.zone_id, since, until, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample() -> serde_json::Value {
        json!({
            "data": {
                "viewer": {
                    "zones": [{
                        "httpRequests1dGroups": [
                            {
                                "dimensions": { "date": "2024-05-02" },
                                "sum": { "requests": 200, "pageViews": 80, "bytes": 4096, "threats": 1, "cachedRequests": 120 },
                                "uniq": { "uniques": 30 }
                            },
                            {
                                "dimensions": { "date": "2024-05-01" },
                                "sum": { "requests": 100, "pageViews": 40, "bytes": 2048, "threats": 0, "cachedRequests": 60 },
                                "uniq": { "uniques": 20 }
                            }
                        ]
                    }]
                }
            },
            "errors": null
        })
    }

    #[test]
    fn test_reshape_totals_and_daily() {
        let out = reshape("zone-1", date("2024-05-01"), date("2024-05-02"), sample()).unwrap();

        assert_eq!(out.zone_id, "zone-1");
        assert_eq!(
            out.totals,
            TrafficTotals {
                requests: 300,
                page_views: 120,
                unique_visitors: 50,
                bytes: 6144,
                threats: 1,
                cached_requests: 180,
            }
        );
        assert_eq!(out.daily.len(), 2);
        assert_eq!(out.daily[0].date, date("2024-05-01"));
        assert_eq!(out.daily[1].requests, 200);
    }

    #[test]
    fn test_reshape_totals_saturate() {
        let group = |day: &str| {
            json!({
                "dimensions": { "date": day },
                "sum": { "requests": u64::MAX, "pageViews": 1, "bytes": u64::MAX, "threats": 0, "cachedRequests": 0 },
                "uniq": { "uniques": 1 }
            })
        };
        let raw = json!({
            "data": {
                "viewer": {
                    "zones": [{ "httpRequests1dGroups": [group("2024-05-01"), group("2024-05-02")] }]
                }
            }
        });

        let out = reshape("zone-1", date("2024-05-01"), date("2024-05-02"), raw).unwrap();
        assert_eq!(out.totals.requests, u64::MAX);
        assert_eq!(out.totals.bytes, u64::MAX);
        assert_eq!(out.totals.page_views, 2);
    }

    #[test]
    fn test_reshape_serializes_snake_case() {
        let out = reshape("z", date("2024-05-01"), date("2024-05-02"), sample()).unwrap();
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["totals"]["page_views"], 120);
        assert_eq!(value["daily"][0]["date"], "2024-05-01");
        assert_eq!(value["since"], "2024-05-01");
    }

    #[test]
    fn test_reshape_graphql_errors() {
        let raw = json!({ "data": null, "errors": [{ "message": "zone not found" }, { "message": "bad token" }] });
        match reshape("z", date("2024-05-01"), date("2024-05-01"), raw) {
            Err(CloudflareError::GraphQl(msg)) => assert_eq!(msg, "zone not found; bad token"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reshape_no_zone_is_empty() {
        let raw = json!({ "data": { "viewer": { "zones": [] } } });
        let out = reshape("z", date("2024-05-01"), date("2024-05-07"), raw).unwrap();
        assert!(out.daily.is_empty());
        assert_eq!(out.totals, TrafficTotals::default());
    }

    #[test]
    fn test_reshape_missing_data() {
        let raw = json!({ "errors": [] });
        assert!(matches!(
            reshape("z", date("2024-05-01"), date("2024-05-01"), raw),
            Err(CloudflareError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_date_window() {
        let today = date("2024-05-10");
        assert_eq!(date_window(7, today), (date("2024-05-04"), today));
        assert_eq!(date_window(1, today), (today, today));
        assert_eq!(date_window(0, today), (today, today));
        assert_eq!(date_window(90, today).0, date("2024-04-11"));
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = CloudflareClient::new(CloudflareConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.zone_analytics(7, date("2024-05-10")).await,
            Err(CloudflareError::NotConfigured)
        ));
    }

    #[test]
    fn test_outbound_budget() {
        let config = CloudflareConfig {
            rate_limit_per_minute: 2,
            ..CloudflareConfig::default()
        };
        let client = CloudflareClient::new(config).unwrap();
        assert!(client.try_acquire().is_ok());
        assert!(client.try_acquire().is_ok());
        assert!(matches!(client.try_acquire(), Err(CloudflareError::RateLimited)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CloudflareConfig {
            api_token: "secret-token".into(),
            ..CloudflareConfig::default()
        };
        let debug = format!("{:?}", CloudflareClient::new(config).unwrap());
        assert!(!debug.contains("secret-token"));
    }
}
