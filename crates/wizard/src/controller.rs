//! Drives a [`WizardState`] against an [`InteractionBackend`].

use tracing::{debug, info, warn};

use crate::{
    backend::InteractionBackend,
    error::{Error, Result},
    payload::OutboundPayload,
    state::{Field, Path, WizardState, WizardStep},
};

/// Owns the wizard state and the backend it submits to.
///
/// Submissions take `&mut self`, so at most one call is in flight.
pub struct WizardController<B> {
    state: WizardState,
    backend: B,
}

impl<B: InteractionBackend> WizardController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: WizardState::new(),
            backend,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn select_path(&mut self, path: Path) -> Result<()> {
        self.state.select_path(path)?;
        debug!(step = %self.state.step, "path selected");
        Ok(())
    }

    pub fn go_back(&mut self) {
        self.state.go_back();
    }

    pub fn new_check(&mut self) -> Result<()> {
        self.state.new_check()
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.state.update_field(field, value);
    }

    pub fn can_submit_under(&self) -> bool {
        self.state.can_submit_under()
    }

    pub fn can_submit_not(&self) -> bool {
        self.state.can_submit_not()
    }

    pub fn submit_enabled(&self) -> bool {
        self.state.submit_enabled()
    }

    /// Submit whichever form is showing.
    pub async fn submit(&mut self) -> Result<()> {
        match self.state.step {
            WizardStep::UnderMedicationForm => self.submit_under().await,
            WizardStep::NotUnderMedicationForm => self.submit_not().await,
            from @ (WizardStep::Choosing | WizardStep::Result) => {
                Err(Error::InvalidTransition {
                    from,
                    action: "submit",
                })
            },
        }
    }

    /// Build the medication payload and send it.
    ///
    /// Backend failures are recorded in the request state, not returned.
    pub async fn submit_under(&mut self) -> Result<()> {
        self.state
            .ensure_can_submit(WizardStep::UnderMedicationForm)?;
        let payload = self.state.under_payload();
        self.send(payload).await;
        Ok(())
    }

    /// Build the food-preparation payload and send it.
    pub async fn submit_not(&mut self) -> Result<()> {
        self.state
            .ensure_can_submit(WizardStep::NotUnderMedicationForm)?;
        let payload = self.state.not_payload();
        self.send(payload).await;
        Ok(())
    }

    async fn send(&mut self, payload: OutboundPayload) {
        self.state.request.last_outbound = Some(payload.clone());
        self.call_backend(payload).await;
    }

    /// Perform the call and record its outcome.
    pub async fn call_backend(&mut self, payload: OutboundPayload) {
        info!(choice = payload.choice(), "submitting check");
        if let Ok(body) = serde_json::to_string(&payload) {
            debug!(%body, "outbound payload");
        }

        self.state.begin_request();
        let outcome = self.backend.check(&payload).await;
        match &outcome {
            Ok(_) => info!("check completed"),
            Err(e) => warn!(error = %e, "check failed"),
        }
        self.state.finish_request(outcome);
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            backend::{BackendError, HttpBackend},
            testing::ScriptedBackend,
        },
        serde_json::json,
        url::Url,
    };

    #[tokio::test]
    async fn warfarin_scenario() {
        let backend = ScriptedBackend::new([Ok(json!({"safe": true}))]);
        let mut c = WizardController::new(backend);

        c.select_path(Path::Under).unwrap();
        c.update_field(Field::Medicines, "warfarin");
        c.update_field(Field::FoodsUnder, "spinach, kale");
        assert!(c.can_submit_under());
        c.submit_under().await.unwrap();

        let expected = json!({"choice": "a", "medicine": "warfarin", "foods": ["spinach", "kale"]});
        let sent = c.backend().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(serde_json::to_value(&sent[0]).unwrap(), expected);

        let state = c.state();
        assert_eq!(state.step, WizardStep::Result);
        assert_eq!(state.request.response, Some(json!({"safe": true})));
        assert_eq!(state.request.last_outbound.as_ref(), Some(&sent[0]));
        assert!(state.request.error.is_none());
        assert!(!state.request.loading);
    }

    #[tokio::test]
    async fn failure_then_retry() {
        let backend = ScriptedBackend::new([
            Err(BackendError::Status(503)),
            Ok(json!({"risk": "low"})),
        ]);
        let mut c = WizardController::new(backend);
        c.select_path(Path::Not).unwrap();
        c.update_field(Field::FoodsNot, "chicken, rice");
        c.update_field(Field::CookingMethod, "grilled");

        c.submit().await.unwrap();
        assert_eq!(c.state().step, WizardStep::NotUnderMedicationForm);
        assert_eq!(c.state().request.error.as_deref(), Some("HTTP 503"));
        assert!(c.state().request.last_outbound.is_some());

        c.submit().await.unwrap();
        assert_eq!(c.state().step, WizardStep::Result);
        assert!(c.state().request.error.is_none());
        assert_eq!(c.backend().sent().len(), 2);

        c.new_check().unwrap();
        assert_eq!(c.state().step, WizardStep::Choosing);
    }

    #[tokio::test]
    async fn submit_from_wrong_step() {
        let mut c = WizardController::new(ScriptedBackend::default());
        assert!(matches!(
            c.submit().await,
            Err(Error::InvalidTransition {
                from: WizardStep::Choosing,
                ..
            })
        ));
        c.select_path(Path::Under).unwrap();
        assert!(c.submit_not().await.is_err());
        assert!(c.backend().sent().is_empty());
    }

    #[tokio::test]
    async fn http_500_keeps_form() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(500)
            .create_async()
            .await;

        let backend = HttpBackend::new(Url::parse(&server.url()).unwrap());
        let mut c = WizardController::new(backend);
        c.select_path(Path::Under).unwrap();
        c.update_field(Field::Medicines, "aspirin");
        c.update_field(Field::FoodsUnder, "rice");
        c.submit_under().await.unwrap();

        assert_eq!(c.state().step, WizardStep::UnderMedicationForm);
        assert_eq!(c.state().request.error.as_deref(), Some("HTTP 500"));
        assert!(c.state().request.response.is_none());
    }

    #[tokio::test]
    async fn http_200_reaches_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/check")
            .match_body(mockito::Matcher::Json(json!({
                "choice": "a",
                "medicine": ["aspirin", "ibuprofen"],
                "foods": ["alcohol"],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"safe": true}"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/api/check", server.url())).unwrap();
        let mut c = WizardController::new(HttpBackend::new(url));
        c.select_path(Path::Under).unwrap();
        c.update_field(Field::Medicines, "aspirin, ibuprofen");
        c.update_field(Field::FoodsUnder, " alcohol ,");
        c.submit().await.unwrap();

        mock.assert_async().await;
        assert_eq!(c.state().step, WizardStep::Result);
        assert_eq!(c.state().request.response, Some(json!({"safe": true})));
        assert_eq!(
            serde_json::to_value(c.state().request.last_outbound.as_ref().unwrap()).unwrap(),
            json!({"choice": "a", "medicine": ["aspirin", "ibuprofen"], "foods": ["alcohol"]})
        );
    }
}
