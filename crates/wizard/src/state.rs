//! Pure state machine for the intake checker wizard. No I/O.

use std::{fmt, str::FromStr};

use {serde::Serialize, serde_json::Value};

use crate::{
    backend::BackendError,
    error::{Error, Result},
    payload::{
        MedicineList, NotUnderMedicationPayload, OutboundPayload, UnderMedicationPayload,
        split_list,
    },
};

/// Steps in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Choosing,
    UnderMedicationForm,
    NotUnderMedicationForm,
    Result,
}

impl WizardStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Choosing => "choosing",
            Self::UnderMedicationForm => "under_medication_form",
            Self::NotUnderMedicationForm => "not_under_medication_form",
            Self::Result => "result",
        }
    }

    pub fn is_form(self) -> bool {
        matches!(self, Self::UnderMedicationForm | Self::NotUnderMedicationForm)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which form the user picked on the choosing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    Under,
    Not,
}

impl Path {
    fn form_step(self) -> WizardStep {
        match self {
            Self::Under => WizardStep::UnderMedicationForm,
            Self::Not => WizardStep::NotUnderMedicationForm,
        }
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "a" | "under" => Ok(Self::Under),
            "2" | "b" | "not" => Ok(Self::Not),
            other => Err(Error::message(format!("unknown path {other:?}"))),
        }
    }
}

/// Free-text inputs. Each form keeps its own foods text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Medicines,
    FoodsUnder,
    FoodsNot,
    CookingMethod,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Medicines => "Medicines (comma separated)",
            Self::FoodsUnder | Self::FoodsNot => "Foods (comma separated)",
            Self::CookingMethod => "Cooking method",
        }
    }

    /// Fields shown on a form step, in prompt order.
    pub fn for_step(step: WizardStep) -> &'static [Field] {
        match step {
            WizardStep::UnderMedicationForm => &[Self::Medicines, Self::FoodsUnder],
            WizardStep::NotUnderMedicationForm => &[Self::FoodsNot, Self::CookingMethod],
            WizardStep::Choosing | WizardStep::Result => &[],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Medicines => "medicines",
            Self::FoodsUnder | Self::FoodsNot => "foods",
            Self::CookingMethod => "cooking method",
        })
    }
}

/// A required field is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} is required")]
pub struct ValidationError {
    pub field: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub medicines: String,
    pub foods_under: String,
    pub foods_not: String,
    pub cooking_method: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Medicines => &self.medicines,
            Field::FoodsUnder => &self.foods_under,
            Field::FoodsNot => &self.foods_not,
            Field::CookingMethod => &self.cooking_method,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Medicines => &mut self.medicines,
            Field::FoodsUnder => &mut self.foods_under,
            Field::FoodsNot => &mut self.foods_not,
            Field::CookingMethod => &mut self.cooking_method,
        }
    }

    fn require(&self, fields: &[Field]) -> std::result::Result<(), ValidationError> {
        match fields.iter().find(|f| self.get(**f).trim().is_empty()) {
            Some(&field) => Err(ValidationError { field }),
            None => Ok(()),
        }
    }
}

/// Progress of the outbound call.
///
/// At most one of `loading`, `error`, `response` is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
    /// Backend JSON, kept opaque.
    pub response: Option<Value>,
    pub last_outbound: Option<OutboundPayload>,
}

/// The wizard state, moved between steps by explicit actions.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub fields: FormFields,
    pub request: RequestState,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Choosing,
            fields: FormFields::default(),
            request: RequestState::default(),
        }
    }

    /// Heading for the current step.
    pub fn prompt(&self) -> &str {
        match self.step {
            WizardStep::Choosing => "Select an option",
            WizardStep::UnderMedicationForm => "Under Medication",
            WizardStep::NotUnderMedicationForm => "Not Under Medication",
            WizardStep::Result => "Result",
        }
    }

    pub fn select_path(&mut self, path: Path) -> Result<()> {
        self.expect_step(WizardStep::Choosing, "select a path")?;
        self.step = path.form_step();
        Ok(())
    }

    /// Return to the choosing step. Entered values are kept.
    pub fn go_back(&mut self) {
        self.step = WizardStep::Choosing;
    }

    /// Start over from the result step. Entered values are kept.
    pub fn new_check(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Result, "start a new check")?;
        self.step = WizardStep::Choosing;
        Ok(())
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        *self.fields.get_mut(field) = value.into();
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn validate_under(&self) -> std::result::Result<(), ValidationError> {
        self.fields.require(Field::for_step(WizardStep::UnderMedicationForm))
    }

    pub fn validate_not(&self) -> std::result::Result<(), ValidationError> {
        self.fields
            .require(Field::for_step(WizardStep::NotUnderMedicationForm))
    }

    /// Validation for whichever form is showing; other steps have nothing
    /// to validate.
    pub fn validate_current(&self) -> std::result::Result<(), ValidationError> {
        self.fields.require(Field::for_step(self.step))
    }

    pub fn can_submit_under(&self) -> bool {
        self.validate_under().is_ok()
    }

    pub fn can_submit_not(&self) -> bool {
        self.validate_not().is_ok()
    }

    /// Whether the submit action on the current step is available.
    pub fn submit_enabled(&self) -> bool {
        let valid = match self.step {
            WizardStep::UnderMedicationForm => self.can_submit_under(),
            WizardStep::NotUnderMedicationForm => self.can_submit_not(),
            WizardStep::Choosing | WizardStep::Result => false,
        };
        valid && !self.request.loading
    }

    pub fn under_payload(&self) -> OutboundPayload {
        UnderMedicationPayload {
            medicine: MedicineList::from_tokens(split_list(&self.fields.medicines)),
            foods: split_list(&self.fields.foods_under),
        }
        .into()
    }

    pub fn not_payload(&self) -> OutboundPayload {
        NotUnderMedicationPayload {
            food_items: split_list(&self.fields.foods_not),
            cooking_method: self.fields.cooking_method.trim().to_string(),
        }
        .into()
    }

    /// Check that a submission may start from `form`.
    pub fn ensure_can_submit(&self, form: WizardStep) -> Result<()> {
        self.expect_step(form, "submit")?;
        if self.request.loading {
            return Err(Error::Busy);
        }
        Ok(())
    }

    /// Mark a call as in flight, clearing the previous outcome.
    pub fn begin_request(&mut self) {
        self.request.loading = true;
        self.request.error = None;
        self.request.response = None;
    }

    /// Record the outcome of the in-flight call.
    ///
    /// Success moves to the result step; failure keeps the current step so
    /// the user can retry.
    pub fn finish_request(&mut self, outcome: std::result::Result<Value, BackendError>) {
        match outcome {
            Ok(response) => {
                self.request.response = Some(response);
                self.step = WizardStep::Result;
            },
            Err(e) => self.request.error = Some(e.to_string()),
        }
        self.request.loading = false;
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.step,
                action,
            })
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn under_form(medicines: &str, foods: &str) -> WizardState {
        let mut s = WizardState::new();
        s.select_path(Path::Under).unwrap();
        s.update_field(Field::Medicines, medicines);
        s.update_field(Field::FoodsUnder, foods);
        s
    }

    #[test]
    fn full_under_flow() {
        let mut s = WizardState::new();
        assert_eq!(s.step, WizardStep::Choosing);

        s.select_path(Path::Under).unwrap();
        assert_eq!(s.step, WizardStep::UnderMedicationForm);

        s.update_field(Field::Medicines, "warfarin");
        s.update_field(Field::FoodsUnder, "spinach, kale");
        assert!(s.submit_enabled());
        assert_eq!(
            serde_json::to_value(s.under_payload()).unwrap(),
            json!({"choice": "a", "medicine": "warfarin", "foods": ["spinach", "kale"]})
        );

        s.begin_request();
        assert!(!s.submit_enabled());
        s.finish_request(Ok(json!({"safe": true})));
        assert_eq!(s.step, WizardStep::Result);
        assert!(!s.request.loading);

        s.new_check().unwrap();
        assert_eq!(s.step, WizardStep::Choosing);
    }

    #[test]
    fn select_path_only_from_choosing() {
        let mut s = WizardState::new();
        s.select_path(Path::Not).unwrap();
        assert_eq!(s.step, WizardStep::NotUnderMedicationForm);
        let err = s.select_path(Path::Under).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition {
            from: WizardStep::NotUnderMedicationForm,
            ..
        }));
    }

    #[test]
    fn back_keeps_values() {
        let mut s = under_form("aspirin", "rice");
        s.go_back();
        assert_eq!(s.step, WizardStep::Choosing);
        s.select_path(Path::Under).unwrap();
        assert_eq!(s.field(Field::Medicines), "aspirin");
        assert_eq!(s.field(Field::FoodsUnder), "rice");

        // Going back from choosing is a no-op.
        s.go_back();
        s.go_back();
        assert_eq!(s.step, WizardStep::Choosing);
    }

    #[test]
    fn forms_keep_separate_foods() {
        let mut s = under_form("aspirin", "rice");
        s.go_back();
        s.select_path(Path::Not).unwrap();
        assert_eq!(s.field(Field::FoodsNot), "");
        assert!(!s.can_submit_not());
        assert!(s.can_submit_under());
    }

    #[test]
    fn empty_or_blank_fields_disable_submit() {
        let s = under_form("", "rice");
        assert!(!s.can_submit_under());
        assert_eq!(s.validate_under(), Err(ValidationError {
            field: Field::Medicines
        }));

        let s = under_form("aspirin", "   ");
        assert!(!s.submit_enabled());
        assert_eq!(
            s.validate_current().unwrap_err().to_string(),
            "foods is required"
        );

        let mut s = WizardState::new();
        s.select_path(Path::Not).unwrap();
        s.update_field(Field::FoodsNot, "rice");
        s.update_field(Field::CookingMethod, "\t");
        assert!(!s.can_submit_not());
        s.update_field(Field::CookingMethod, "steamed");
        assert!(s.can_submit_not());
    }

    #[test]
    fn not_payload_trims_method() {
        let mut s = WizardState::new();
        s.update_field(Field::FoodsNot, "potato,, oil ");
        s.update_field(Field::CookingMethod, "  deep fried ");
        assert_eq!(
            serde_json::to_value(s.not_payload()).unwrap(),
            json!({"choice": "b", "foodItems": ["potato", "oil"], "cookingMethod": "deep fried"})
        );
    }

    #[test]
    fn failure_stays_on_form() {
        let mut s = under_form("aspirin", "rice");
        s.begin_request();
        s.finish_request(Err(BackendError::Status(500)));
        assert_eq!(s.step, WizardStep::UnderMedicationForm);
        assert_eq!(s.request.error.as_deref(), Some("HTTP 500"));
        assert!(s.request.response.is_none());
        assert!(!s.request.loading);

        // A new attempt clears the old error.
        s.begin_request();
        assert!(s.request.error.is_none());
        assert!(s.request.loading);
    }

    #[test]
    fn submit_guards() {
        let mut s = under_form("aspirin", "rice");
        assert!(s.ensure_can_submit(WizardStep::UnderMedicationForm).is_ok());
        assert!(s.ensure_can_submit(WizardStep::NotUnderMedicationForm).is_err());
        s.begin_request();
        assert!(matches!(
            s.ensure_can_submit(WizardStep::UnderMedicationForm),
            Err(Error::Busy)
        ));
    }

    #[test]
    fn new_check_only_from_result() {
        let mut s = WizardState::new();
        assert!(s.new_check().is_err());
    }

    #[test]
    fn path_parsing() {
        assert_eq!("under".parse::<Path>().unwrap(), Path::Under);
        assert_eq!(" 2 ".parse::<Path>().unwrap(), Path::Not);
        assert_eq!("B".parse::<Path>().unwrap(), Path::Not);
        assert!("maybe".parse::<Path>().is_err());
    }

    #[test]
    fn step_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(WizardStep::UnderMedicationForm).unwrap(),
            json!("under_medication_form")
        );
    }
}
