//! `AmapProvider` — reqwest client for the AMap (高德) web-service API.
//!
//! Two endpoints are consumed:
//!
//! - `/v3/geocode/geo` — address → `"lon,lat"` location string.
//! - `/v3/direction/driving` — origin/destination → steps, each carrying a
//!   `"lon,lat;lon,lat;…"` polyline fragment.
//!
//! The free tier rate-limits to a few queries per second; the dispatcher
//! spaces its calls accordingly (`EngineConfig::provider_delay_ms`).

use reqwest::Client;
use st_core::GeoPoint;

use crate::{ProviderError, ProviderResult, RouteProvider, RouteStrategy};

const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// HTTP client for the AMap geocoding and driving-direction services.
#[derive(Debug, Clone)]
pub struct AmapProvider {
    http:     Client,
    key:      String,
    base_url: String,
}

impl AmapProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            http:     Client::new(),
            key:      key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a proxy or mock server instead of the real API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn strategy_code(strategy: RouteStrategy) -> &'static str {
        match strategy {
            RouteStrategy::Fastest => "0", // speed priority
            RouteStrategy::Trunk   => "2", // distance priority keeps trunk legs on mainlines
        }
    }
}

impl RouteProvider for AmapProvider {
    async fn geocode(&self, address: &str) -> ProviderResult<GeoPoint> {
        let url = format!("{}/v3/geocode/geo", self.base_url);
        let resp: GeocodeResponse = self
            .http
            .get(&url)
            .query(&[("key", self.key.as_str()), ("address", address)])
            .send()
            .await?
            .json()
            .await?;

        if resp.status != "1" {
            return Err(ProviderError::Rejected { code: resp.status, info: resp.info });
        }
        let first = resp
            .geocodes
            .first()
            .ok_or_else(|| ProviderError::NoResult(address.to_string()))?;
        parse_point(&first.location)
    }

    async fn drive_route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        strategy: RouteStrategy,
    ) -> ProviderResult<Vec<GeoPoint>> {
        let url = format!("{}/v3/direction/driving", self.base_url);
        let origin = format!("{:.6},{:.6}", from.lon, from.lat);
        let destination = format!("{:.6},{:.6}", to.lon, to.lat);
        let resp: DrivingResponse = self
            .http
            .get(&url)
            .query(&[
                ("key", self.key.as_str()),
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("strategy", Self::strategy_code(strategy)),
                ("extensions", "base"),
            ])
            .send()
            .await?
            .json()
            .await?;

        if resp.status != "1" {
            return Err(ProviderError::Rejected { code: resp.status, info: resp.info });
        }
        let path = resp
            .route
            .and_then(|r| r.paths.into_iter().next())
            .ok_or_else(|| ProviderError::Malformed("driving response has no path".into()))?;

        let mut points = Vec::new();
        for step in &path.steps {
            points.extend(parse_polyline(&step.polyline)?);
        }
        if points.is_empty() {
            return Err(ProviderError::Malformed("driving path has no polyline points".into()));
        }
        Ok(points)
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    info: String,
    #[serde(default)]
    geocodes: Vec<Geocode>,
}

#[derive(serde::Deserialize)]
struct Geocode {
    location: String,
}

#[derive(serde::Deserialize)]
struct DrivingResponse {
    status: String,
    #[serde(default)]
    info: String,
    route: Option<DrivingRoute>,
}

#[derive(serde::Deserialize)]
struct DrivingRoute {
    #[serde(default)]
    paths: Vec<DrivingPath>,
}

#[derive(serde::Deserialize)]
struct DrivingPath {
    #[serde(default)]
    steps: Vec<DrivingStep>,
}

#[derive(serde::Deserialize)]
struct DrivingStep {
    #[serde(default)]
    polyline: String,
}

/// Parse a single `"lon,lat"` pair.
pub(crate) fn parse_point(s: &str) -> ProviderResult<GeoPoint> {
    let mut it = s.split(',');
    let lon = it.next().and_then(|v| v.trim().parse::<f64>().ok());
    let lat = it.next().and_then(|v| v.trim().parse::<f64>().ok());
    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
        _ => Err(ProviderError::Malformed(format!("bad coordinate pair {s:?}"))),
    }
}

/// Parse a `"lon,lat;lon,lat;…"` polyline fragment.
pub(crate) fn parse_polyline(s: &str) -> ProviderResult<Vec<GeoPoint>> {
    s.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(parse_point)
        .collect()
}
