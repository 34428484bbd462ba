//! Technology-related API endpoints

use techlens_core::domain::{Technology, TechnologyId};
use techlens_core::dto::technology::CreateTechnology;
use tracing::{error, info};

use crate::AnalysisClient;
use crate::error::Result;

impl AnalysisClient {
    // =============================================================================
    // Technology Records
    // =============================================================================

    /// Register a technology and start its analysis
    ///
    /// Non-2xx responses come back as [`crate::ClientError::ApiError`]; use
    /// [`crate::ClientError::user_message`] to surface the API's `detail`.
    ///
    /// # Example
    /// ```no_run
    /// # use techlens_client::{AnalysisClient, ClientConfig};
    /// # use techlens_core::dto::technology::CreateTechnology;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = AnalysisClient::new(ClientConfig::default())?;
    /// let technology = client.create_technology(&CreateTechnology {
    ///     name: "Smart bandage".to_string(),
    ///     abstract_text: "A flexible adhesive patch that measures wound temperature.".to_string(),
    ///     num_of_axes: 4,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_technology(&self, req: &CreateTechnology) -> Result<Technology> {
        let url = self.endpoint("technologies");
        let response = self.client.post(&url).json(req).send().await?;

        let technology: Technology = self.handle_response(response).await?;
        info!(id = %technology.id, name = %technology.name, "Technology registered");
        Ok(technology)
    }

    /// Get a technology record by ID
    pub async fn get_technology(&self, id: &TechnologyId) -> Result<Technology> {
        self.get_resource(id, "")
            .await
            .inspect_err(|e| error!(%id, "Failed to fetch technology: {}", e))
    }
}
