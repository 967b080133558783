//! Reference data for the wizard's dropdowns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::info;

use super::AirSafeApi;
use super::endpoints;
use super::fallback::{call_with_fallback, default_cities, default_city_names, default_professions};
use super::types::CityRecord;

/// Options shown by the identity and location steps, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    pub city_names: Vec<String>,
    pub professions: Vec<String>,
}

/// Lazily fetched city and profession lists.
///
/// A successful fetch is kept for the lifetime of the cache. A failed fetch
/// returns the built-in list but is not remembered, so the next call (e.g. a
/// reload) tries the network again.
pub struct ReferenceDataCache {
    api: Arc<dyn AirSafeApi>,
    timeout: Duration,
    city_names: OnceCell<Vec<String>>,
    professions: OnceCell<Vec<String>>,
    cities: OnceCell<Vec<CityRecord>>,
}

impl ReferenceDataCache {
    pub fn new(api: Arc<dyn AirSafeApi>, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            city_names: OnceCell::new(),
            professions: OnceCell::new(),
            cities: OnceCell::new(),
        }
    }

    /// Load both dropdown lists. The two fetches run concurrently.
    pub async fn load(&self) -> ReferenceData {
        let (city_names, professions) =
            futures::future::join(self.city_names(), self.professions()).await;
        info!(
            cities = city_names.len(),
            professions = professions.len(),
            "Reference data loaded"
        );
        ReferenceData {
            city_names,
            professions,
        }
    }

    pub async fn city_names(&self) -> Vec<String> {
        if let Some(names) = self.city_names.get() {
            return names.clone();
        }
        let resolved = call_with_fallback(
            endpoints::CITY_NAMES,
            self.timeout,
            self.api.city_names(),
            default_city_names,
        )
        .await;
        if resolved.source.is_remote() {
            let _ = self.city_names.set(resolved.value.clone());
        }
        resolved.value
    }

    pub async fn professions(&self) -> Vec<String> {
        if let Some(professions) = self.professions.get() {
            return professions.clone();
        }
        let resolved = call_with_fallback(
            endpoints::PROFESSIONS,
            self.timeout,
            self.api.professions(),
            default_professions,
        )
        .await;
        if resolved.source.is_remote() {
            let _ = self.professions.set(resolved.value.clone());
        }
        resolved.value
    }

    /// Full city records, used to annotate the city picker with AQI.
    pub async fn cities(&self) -> Vec<CityRecord> {
        if let Some(cities) = self.cities.get() {
            return cities.clone();
        }
        let resolved = call_with_fallback(
            endpoints::CITIES,
            self.timeout,
            self.api.cities(),
            default_cities,
        )
        .await;
        if resolved.source.is_remote() {
            let _ = self.cities.set(resolved.value.clone());
        }
        resolved.value
    }
}
