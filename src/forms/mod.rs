pub mod form;
pub mod reconciler;

pub use form::{lock_form, FieldValue, FormControl, PersonForm, SharedForm};
pub use reconciler::FieldReconciler;
