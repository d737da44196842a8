//! Application context - dependency injection container

use std::sync::Arc;

use concierge_core::{
    ClaimController, ClaimDisplay, ClaimGateway, ClaimNotifier, ControllerSettings, Redirect,
    RedirectGate,
};
use concierge_domain::{AuthState, ConciergeConfig, ConciergeError, Result};
use concierge_infra::{ApiClient, ApiClientConfig, HttpClaimGateway, SessionTokenProvider};
use tracing::{debug, info};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: ConciergeConfig,
    pub gateway: Arc<dyn ClaimGateway>,
    pub controller: ClaimController,
    pub display: ClaimDisplay,
    pub redirect_gate: RedirectGate,
    tokens: Arc<SessionTokenProvider>,
}

impl AppContext {
    /// Wire the REST gateway and the claim components for `config`.
    ///
    /// # Errors
    /// `Config` if the HTTP client cannot be built.
    pub fn new(config: ConciergeConfig) -> Result<Self> {
        let tokens = Arc::new(SessionTokenProvider::new());
        let client = ApiClient::new(ApiClientConfig::from_backend(&config.backend), tokens.clone())
            .map_err(ConciergeError::from)?;
        let gateway: Arc<dyn ClaimGateway> = Arc::new(HttpClaimGateway::new(Arc::new(client)));

        info!(
            backend = %config.backend.base_url,
            domain = %config.domain,
            stage = %config.stage,
            "application context ready"
        );
        Ok(Self::assemble(config, gateway, tokens))
    }

    /// Same wiring over an arbitrary gateway.
    pub fn with_gateway(config: ConciergeConfig, gateway: Arc<dyn ClaimGateway>) -> Self {
        Self::assemble(config, gateway, Arc::new(SessionTokenProvider::new()))
    }

    fn assemble(
        config: ConciergeConfig,
        gateway: Arc<dyn ClaimGateway>,
        tokens: Arc<SessionTokenProvider>,
    ) -> Self {
        let controller = ClaimController::new(
            gateway.clone(),
            ClaimNotifier::new(),
            ControllerSettings::from_config(&config),
        );
        let display = ClaimDisplay::new(gateway.clone(), config.domain.clone())
            .with_debounce(config.claim.refresh_debounce());
        let redirect_gate = RedirectGate::new(config.claim.setup_redirect_delay());

        Self { config, gateway, controller, display, redirect_gate, tokens }
    }

    /// Install the bearer token used by every backend call.
    ///
    /// # Errors
    /// `Auth` for a blank token.
    pub fn authenticate(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(ConciergeError::Auth(
                "no access token; pass --token or set CONCIERGE_ACCESS_TOKEN".into(),
            ));
        }
        self.tokens.set_token(token.trim());
        Ok(())
    }

    /// Mark the session as signed in, which makes the controller load the
    /// claim. Call [`Self::authenticate`] first.
    pub async fn sign_in(&self) {
        self.controller.set_auth_state(AuthState::SignedIn).await;
    }

    /// End the session: forget the token and reset the controller.
    ///
    /// Returns where the user goes next.
    pub async fn sign_out(&self) -> Redirect {
        self.tokens.clear();
        self.controller.set_auth_state(AuthState::SignedOut).await;
        self.redirect_gate.after_sign_out()
    }

    /// Stop background work before exit.
    pub async fn shutdown(&self) {
        if self.display.is_listening() {
            // Only fails when not listening.
            let _ = self.display.stop().await;
        }
        self.controller.shutdown();
        debug!("application context shut down");
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
