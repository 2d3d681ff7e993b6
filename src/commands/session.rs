//! Connection to a deployment shared by the remote commands

use anyhow::{Context as _, Result};
use declarative::CapabilityGate;
use groupkit::{Backend, Entitlements, HttpBackend};
use uuid::Uuid;

use crate::Context;
use crate::config::Settings;
use crate::resource::GroupController;

/// Licensed features of the deployment, as a capability gate
struct Licensed(Entitlements);

impl CapabilityGate for Licensed {
    fn is_enabled(&self, capability: &str) -> bool {
        self.0.is_enabled(capability)
    }
}

/// Backend plus everything the controller needs from the deployment
pub struct Session {
    backend: Box<dyn Backend>,
    licensed: Licensed,
    default_organization_id: Uuid,
}

impl Session {
    /// Connect using settings, flags and environment
    pub fn connect(ctx: &Context) -> Result<Self> {
        let settings = Settings::load()?.with_overrides(ctx.url.clone(), ctx.token.clone());
        let backend = HttpBackend::with_timeout(settings.url()?, settings.token()?, settings.timeout());
        log::debug!("Connecting to {}", backend.base_url());

        Self::with_backend(Box::new(backend), settings.default_organization_id)
    }

    /// Prepare a session over any backend
    ///
    /// Entitlements are fetched once. A failed fetch leaves every feature
    /// disabled, so creates are refused rather than attempted blindly.
    pub fn with_backend(
        backend: Box<dyn Backend>,
        default_organization_id: Option<Uuid>,
    ) -> Result<Self> {
        let entitlements = backend.entitlements().unwrap_or_else(|e| {
            log::warn!("Could not fetch entitlements: {e}");
            Entitlements::default()
        });

        let default_organization_id = match default_organization_id {
            Some(id) => id,
            None => {
                backend
                    .default_organization()
                    .context("Failed to look up the default organization")?
                    .id
            }
        };
        log::debug!("Default organization is {default_organization_id}");

        Ok(Self {
            backend,
            licensed: Licensed(entitlements),
            default_organization_id,
        })
    }

    pub fn controller(&self) -> GroupController<'_> {
        GroupController::new(
            self.backend.as_ref(),
            &self.licensed,
            self.default_organization_id,
        )
    }
}
