use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::PersonField;

/// Form shared between the caller and a running ID watch.
pub type SharedForm = Arc<Mutex<PersonForm>>;

/// Lock a shared form, recovering the data if another holder panicked.
pub fn lock_form(form: &SharedForm) -> MutexGuard<'_, PersonForm> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Date(NaiveDate),
    Choice(i64),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub value: FieldValue,
    pub enabled: bool,
}

impl Default for FormControl {
    fn default() -> Self {
        FormControl {
            value: FieldValue::Empty,
            enabled: true,
        }
    }
}

impl FormControl {
    pub fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Client form holding the external ID input and the person detail controls.
///
/// Person controls live in a table keyed by field; a missing entry means the
/// control was removed (e.g. the legal form switched to an entity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonForm {
    external_id: String,
    controls: BTreeMap<PersonField, FormControl>,
}

impl Default for PersonForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonForm {
    /// A form with all five person controls, empty and editable.
    pub fn new() -> Self {
        let controls = PersonField::ALL
            .iter()
            .map(|field| (*field, FormControl::default()))
            .collect();

        PersonForm {
            external_id: String::new(),
            controls,
        }
    }

    /// A form for an entity client: no person controls at all.
    pub fn without_person_fields() -> Self {
        PersonForm {
            external_id: String::new(),
            controls: BTreeMap::new(),
        }
    }

    pub fn with_external_id(mut self, external_id: &str) -> Self {
        self.external_id = external_id.to_string();
        self
    }

    pub fn into_shared(self) -> SharedForm {
        Arc::new(Mutex::new(self))
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn set_external_id(&mut self, value: &str) {
        self.external_id = value.to_string();
    }

    pub fn control(&self, field: PersonField) -> Option<&FormControl> {
        self.controls.get(&field)
    }

    pub fn control_mut(&mut self, field: PersonField) -> Option<&mut FormControl> {
        self.controls.get_mut(&field)
    }

    pub fn value(&self, field: PersonField) -> Option<&FieldValue> {
        self.control(field).map(|c| &c.value)
    }

    pub fn is_enabled(&self, field: PersonField) -> Option<bool> {
        self.control(field).map(|c| c.enabled)
    }

    pub fn insert_control(&mut self, field: PersonField, control: FormControl) {
        self.controls.insert(field, control);
    }

    pub fn remove_control(&mut self, field: PersonField) -> Option<FormControl> {
        self.controls.remove(&field)
    }

    /// Iterate over the person controls still present on the form.
    pub fn controls(&self) -> impl Iterator<Item = (PersonField, &FormControl)> {
        self.controls.iter().map(|(field, control)| (*field, control))
    }
}
