//! Non-interactive check submission.

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    serde_json::Value,
};

use medcheck_wizard::{Field, InteractionBackend, Path, WizardController};

#[derive(Subcommand)]
pub enum SubmitForm {
    /// Medicines and foods (sent as choice "a").
    Under {
        /// Comma-separated medicines.
        #[arg(long)]
        medicine: String,
        /// Comma-separated foods.
        #[arg(long)]
        foods: String,
    },
    /// Foods and a cooking method (sent as choice "b").
    Not {
        /// Comma-separated foods.
        #[arg(long)]
        foods: String,
        #[arg(long)]
        cooking_method: String,
    },
}

/// Fill the matching form, submit it, and return the backend's JSON.
pub async fn handle_submit<B: InteractionBackend>(
    controller: &mut WizardController<B>,
    form: SubmitForm,
) -> Result<Value> {
    match form {
        SubmitForm::Under { medicine, foods } => {
            controller.select_path(Path::Under)?;
            controller.update_field(Field::Medicines, medicine);
            controller.update_field(Field::FoodsUnder, foods);
        },
        SubmitForm::Not {
            foods,
            cooking_method,
        } => {
            controller.select_path(Path::Not)?;
            controller.update_field(Field::FoodsNot, foods);
            controller.update_field(Field::CookingMethod, cooking_method);
        },
    }

    controller.state().validate_current()?;
    controller.submit().await?;

    let request = &controller.state().request;
    if let Some(error) = &request.error {
        anyhow::bail!("check failed: {error}");
    }
    request
        .response
        .clone()
        .context("backend returned no response")
}
