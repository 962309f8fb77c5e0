use log::{debug, info};

use crate::forms::{FieldValue, PersonForm};
use crate::models::{
    GenderCodeMap, GenderOption, LookupResponse, PersonField, VerificationStatus,
    INVALID_SENTINEL, NOT_FOUND_SENTINEL,
};
use crate::validation::parse_date;

/// Applies lookup outcomes to the person fields of a form.
pub struct FieldReconciler;

impl FieldReconciler {
    /// Fill the form from a lookup response and report the resulting status.
    ///
    /// Controls missing from the form are skipped, as are fields the response
    /// leaves empty or that cannot be converted (bad date, unknown gender).
    pub fn apply_response(
        form: &mut PersonForm,
        response: &LookupResponse,
        gender_options: &[GenderOption],
    ) -> VerificationStatus {
        match response.developer_message.as_deref().unwrap_or("") {
            NOT_FOUND_SENTINEL => {
                Self::enable_person_fields(form);
                return VerificationStatus::NotFound;
            }
            INVALID_SENTINEL => {
                Self::enable_person_fields(form);
                return VerificationStatus::InvalidFormat;
            }
            _ => {}
        }

        // Only fields this response populates end up locked
        Self::enable_person_fields(form);

        let names = [
            (PersonField::Firstname, &response.firstname),
            (PersonField::Middlename, &response.middlename),
            (PersonField::Lastname, &response.lastname),
        ];
        for (field, value) in names {
            if let Some(text) = value.as_deref().filter(|t| !t.is_empty()) {
                Self::fill(form, field, FieldValue::Text(text.to_string()));
            }
        }

        if let Some(raw) = response.date_of_birth.as_deref().filter(|d| !d.is_empty()) {
            match parse_date(raw, response.date_format.as_deref()) {
                Some(date) => Self::fill(form, PersonField::DateOfBirth, FieldValue::Date(date)),
                None => debug!("Leaving date of birth untouched, could not parse {:?}", raw),
            }
        }

        if let Some(code) = response.gender_id {
            match GenderCodeMap::resolve(code, gender_options) {
                Some(option) => Self::fill(form, PersonField::GenderId, FieldValue::Choice(option.id)),
                None => debug!("No gender option matches external code {}", code),
            }
        }

        info!("External ID verified, person fields filled");
        VerificationStatus::Success
    }

    /// Hand every person field back to the user.
    pub fn enable_person_fields(form: &mut PersonForm) {
        for field in PersonField::ALL {
            if let Some(control) = form.control_mut(field) {
                control.enable();
            }
        }
    }

    /// Lock every person field, e.g. when editing a client whose ID was
    /// verified before.
    pub fn disable_person_fields(form: &mut PersonForm) {
        for field in PersonField::ALL {
            if let Some(control) = form.control_mut(field) {
                control.disable();
            }
        }
    }

    fn fill(form: &mut PersonForm, field: PersonField, value: FieldValue) {
        match form.control_mut(field) {
            Some(control) => {
                control.set_value(value);
                control.disable();
            }
            None => debug!("Control {} no longer on the form, skipping", field),
        }
    }
}
