//! Analysis status endpoint

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;
use techlens_core::domain::{AnalysisStatus, TechnologyId};
use tracing::debug;

use crate::AnalysisClient;
use crate::error::Result;
use crate::poller::StatusSource;

/// Lower bound applied to the backend's polling recommendation
pub const STATUS_INTERVAL_MIN: Duration = Duration::from_millis(15_000);

/// Upper bound applied to the backend's polling recommendation
pub const STATUS_INTERVAL_MAX: Duration = Duration::from_millis(60_000);

/// Recommendation used when the backend sends none
pub const STATUS_INTERVAL_DEFAULT: Duration = Duration::from_millis(18_000);

impl AnalysisClient {
    /// Fetch the current analysis status of a technology
    ///
    /// Always bypasses caches. The returned recommendation is never absent and
    /// always lies within [`STATUS_INTERVAL_MIN`]..=[`STATUS_INTERVAL_MAX`].
    pub async fn get_analysis_status(&self, id: &TechnologyId) -> Result<AnalysisStatus> {
        let url = self.technology_url(id, "analysis-status")?;
        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let mut status: AnalysisStatus = self.handle_response(response).await?;

        let interval = status.polling_recommendation.clamped(
            STATUS_INTERVAL_MIN,
            STATUS_INTERVAL_MAX,
            STATUS_INTERVAL_DEFAULT,
        );
        debug!(
            %id,
            overall = %status.overall,
            recommended_ms = ?status.polling_recommendation.interval_ms,
            interval_ms = interval.as_millis() as u64,
            "Fetched analysis status"
        );
        status.polling_recommendation.interval_ms = Some(interval.as_millis() as u64);

        Ok(status)
    }
}

#[async_trait]
impl StatusSource for AnalysisClient {
    async fn fetch_status(&self, technology_id: &TechnologyId) -> Result<AnalysisStatus> {
        self.get_analysis_status(technology_id).await
    }
}
