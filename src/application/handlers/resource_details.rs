//! ResourceDetailsLoader - everything the resource detail view shows.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::application::failure::FailureReporter;
use crate::application::notices::NoticeKind;
use crate::application::optimistic::OptimisticCell;
use crate::domain::foundation::ResourceId;
use crate::domain::resource::{name_or_placeholder, InteractionState, Resource};
use crate::ports::{ApiError, TechVaultApi};

/// A loaded resource with resolved display fields.
#[derive(Debug, Clone)]
pub struct ResourceDetails {
    pub resource: Resource,
    pub technology_name: String,
    pub skill_level_name: String,
    pub file_url: String,
    /// Favorite/rating facet; hand this to the optimistic mutator.
    pub interaction: OptimisticCell<InteractionState>,
}

/// Handler for the detail view's initial load.
pub struct ResourceDetailsLoader {
    api: Arc<dyn TechVaultApi>,
    origin: String,
    request_timeout: Duration,
    reporter: FailureReporter,
}

impl ResourceDetailsLoader {
    pub fn new(
        api: Arc<dyn TechVaultApi>,
        origin: impl Into<String>,
        request_timeout: Duration,
        reporter: FailureReporter,
    ) -> Self {
        Self {
            api,
            origin: origin.into(),
            request_timeout,
            reporter,
        }
    }

    /// Fetches the resource and the reference lists concurrently.
    ///
    /// Failures are reported as a notice (and may end the session on a
    /// rejected credential) before being returned.
    pub async fn load(&self, id: ResourceId) -> Result<ResourceDetails, ApiError> {
        let sent_with = self.reporter.sending_credential();
        let fetched = timeout(
            self.request_timeout,
            futures::future::try_join3(
                self.api.get_resource(id),
                self.api.technologies(),
                self.api.skill_levels(),
            ),
        )
        .await
        .unwrap_or_else(|_| Err(ApiError::timeout(self.request_timeout)));

        let (resource, technologies, skill_levels) = match fetched {
            Ok(parts) => parts,
            Err(error) => {
                tracing::warn!(resource_id = %id, error = %error, "failed to load resource");
                self.reporter
                    .report(
                        NoticeKind::Query,
                        "Could not load resource",
                        &error,
                        sent_with.as_ref(),
                    )
                    .await;
                return Err(error);
            }
        };

        let technology_name = match &resource.technology {
            Some(nested) => nested.name.clone(),
            None => name_or_placeholder(&technologies, resource.technology_id, |t| {
                (t.id, t.name.as_str())
            }),
        };
        let skill_level_name = match &resource.skill_level {
            Some(nested) => nested.name.clone(),
            None => name_or_placeholder(&skill_levels, resource.skill_level_id, |s| {
                (s.id, s.name.as_str())
            }),
        };

        Ok(ResourceDetails {
            technology_name,
            skill_level_name,
            file_url: resource.file_url(&self.origin),
            interaction: OptimisticCell::new(InteractionState::from_resource(&resource)),
            resource,
        })
    }
}
