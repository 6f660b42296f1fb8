//! Medication & food intake checker wizard.
//!
//! Flow: choosing → (under medication | not under medication) form → result.
//! The state machine in [`state`] is pure; [`controller`] adds the backend
//! call and [`terminal`] renders it line by line.

pub mod backend;
pub mod controller;
pub mod error;
pub mod payload;
pub mod state;
pub mod terminal;

#[cfg(test)]
mod testing;

pub use {
    backend::{BackendError, HttpBackend, InteractionBackend},
    controller::WizardController,
    error::{Context, Error, Result},
    payload::{
        MedicineList, NotUnderMedicationPayload, OutboundPayload, UnderMedicationPayload,
        split_list,
    },
    state::{Field, FormFields, Path, RequestState, ValidationError, WizardState, WizardStep},
};
