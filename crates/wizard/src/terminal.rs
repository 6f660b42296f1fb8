//! Line-based terminal front end for the wizard.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::{
    backend::InteractionBackend,
    controller::WizardController,
    error::{Context, Result},
    state::{Field, Path, WizardStep},
};

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive wizard until the user quits or input ends.
pub async fn run_session<B, R, W>(
    controller: &mut WizardController<B>,
    reader: &mut R,
    writer: &mut W,
) -> Result<()>
where
    B: InteractionBackend,
    R: BufRead,
    W: Write,
{
    writeln!(writer, "Medication & Food Intake Checker")?;
    loop {
        let flow = match controller.state().step {
            WizardStep::Choosing => choose(controller, reader, writer)?,
            WizardStep::UnderMedicationForm | WizardStep::NotUnderMedicationForm => {
                fill_form(controller, reader, writer).await?
            },
            WizardStep::Result => show_result(controller, reader, writer)?,
        };
        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

fn choose<B, R, W>(
    controller: &mut WizardController<B>,
    reader: &mut R,
    writer: &mut W,
) -> Result<Flow>
where
    B: InteractionBackend,
    R: BufRead,
    W: Write,
{
    writeln!(writer, "\n{}", controller.state().prompt())?;
    writeln!(writer, "  1) Under Medication: enter medicine and foods")?;
    writeln!(writer, "  2) Not Under Medication: enter foods and cooking method")?;
    let Some(line) = ask(reader, writer, "Choice (1/2, q to quit)")? else {
        return Ok(Flow::Quit);
    };
    if is_quit(&line) {
        return Ok(Flow::Quit);
    }
    match line.parse::<Path>() {
        Ok(path) => controller.select_path(path)?,
        Err(_) => writeln!(writer, "Please choose 1 or 2.")?,
    }
    Ok(Flow::Continue)
}

async fn fill_form<B, R, W>(
    controller: &mut WizardController<B>,
    reader: &mut R,
    writer: &mut W,
) -> Result<Flow>
where
    B: InteractionBackend,
    R: BufRead,
    W: Write,
{
    writeln!(
        writer,
        "\n{}  (Enter keeps [value], 'back' returns)",
        controller.state().prompt()
    )?;

    for &field in Field::for_step(controller.state().step) {
        let current = controller.state().field(field);
        let label = if current.is_empty() {
            field.label().to_string()
        } else {
            format!("{} [{current}]", field.label())
        };
        let Some(line) = ask(reader, writer, &label)? else {
            return Ok(Flow::Quit);
        };
        if is_back(&line) {
            controller.go_back();
            return Ok(Flow::Continue);
        }
        if !line.trim().is_empty() {
            controller.update_field(field, line);
        }
    }

    if let Err(e) = controller.state().validate_current() {
        writeln!(writer, "Cannot submit: {e}")?;
        return Ok(Flow::Continue);
    }

    let Some(line) = ask(reader, writer, "Press Enter to submit, or type 'back'")? else {
        return Ok(Flow::Quit);
    };
    if is_back(&line) {
        controller.go_back();
        return Ok(Flow::Continue);
    }
    if is_quit(&line) {
        return Ok(Flow::Quit);
    }
    if !controller.submit_enabled() {
        return Ok(Flow::Continue);
    }

    writeln!(writer, "Checking...")?;
    writer.flush()?;
    controller.submit().await?;
    if let Some(error) = &controller.state().request.error {
        writeln!(writer, "Error: {error}")?;
    }
    Ok(Flow::Continue)
}

fn show_result<B, R, W>(
    controller: &mut WizardController<B>,
    reader: &mut R,
    writer: &mut W,
) -> Result<Flow>
where
    B: InteractionBackend,
    R: BufRead,
    W: Write,
{
    let request = &controller.state().request;
    if let Some(response) = &request.response {
        json_block(writer, "Backend Response", response)?;
    }
    if let Some(outbound) = &request.last_outbound {
        let outbound = serde_json::to_value(outbound).context("encode request")?;
        json_block(writer, "Request Sent", &outbound)?;
    }

    let Some(line) = ask(reader, writer, "Press Enter for a new check, or 'q' to quit")? else {
        return Ok(Flow::Quit);
    };
    if is_quit(&line) {
        return Ok(Flow::Quit);
    }
    controller.new_check()?;
    Ok(Flow::Continue)
}

/// Two-space indented JSON under a heading.
pub fn json_block<W: Write>(writer: &mut W, title: &str, value: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("render json")?;
    writeln!(writer, "\n{title}\n{pretty}")?;
    Ok(())
}

/// Print `prompt`, read one line. `None` at end of input.
fn ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(writer, "{prompt}: ")?;
    writer.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn is_back(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("back")
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "q" | "quit")
}
