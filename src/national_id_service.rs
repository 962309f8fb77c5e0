use std::sync::Arc;

use log::{debug, info};
use tokio::sync::watch;

use crate::config::ExternalIdConfig;
use crate::forms::{lock_form, FieldReconciler, SharedForm};
use crate::lookup::{HttpLookupClient, NationalIdLookup};
use crate::models::{GenderOption, LookupContext, VerificationStatus};
use crate::utils::ExternalIdResult;
use crate::validation::PatternValidator;
use crate::verification::{ExternalIdWatch, PipelineContext};

/// External national ID integration for client forms.
///
/// When enabled, watches a form's external ID input, validates it against the
/// configured pattern, looks valid IDs up on the external API, and fills and
/// locks the person fields from the result.
pub struct ExternalNationalIdService {
    config: ExternalIdConfig,
    validator: Arc<PatternValidator>,
    client: Arc<dyn NationalIdLookup>,
    context: Arc<LookupContext>,
}

impl ExternalNationalIdService {
    pub fn new(config: ExternalIdConfig, client: Arc<dyn NationalIdLookup>) -> Self {
        let validator = PatternValidator::new(config.id_regex.as_deref());

        ExternalNationalIdService {
            config,
            validator: Arc::new(validator),
            client,
            context: Arc::new(LookupContext::default()),
        }
    }

    /// Build the service with the HTTP lookup client.
    pub fn from_config(config: ExternalIdConfig) -> ExternalIdResult<Self> {
        config.validate()?;
        let client = HttpLookupClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn with_context(mut self, context: LookupContext) -> Self {
        self.context = Arc::new(context);
        self
    }

    pub fn config(&self) -> &ExternalIdConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_valid_external_id(&self, value: &str) -> bool {
        self.validator.is_valid(value)
    }

    pub fn enable_person_fields(&self, form: &SharedForm) {
        FieldReconciler::enable_person_fields(&mut lock_form(form));
    }

    /// Start watching the external ID input of `form`.
    ///
    /// Each watch reports its own status. Returns `None` when the feature is disabled. With `skip_initial_value`,
    /// an already-valid ID on the form (edit mode) locks the person fields
    /// straight away instead of being looked up again. Otherwise a non-empty
    /// initial ID goes through the normal debounce and lookup.
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch_external_id(
        &self,
        form: SharedForm,
        gender_options: Vec<GenderOption>,
        skip_initial_value: bool,
    ) -> Option<ExternalIdWatch> {
        if !self.is_enabled() {
            debug!("External national ID system disabled, not watching form");
            return None;
        }

        let initial = lock_form(&form).external_id().to_string();
        let mut seen = None;
        let mut initial_status = VerificationStatus::Empty;

        if skip_initial_value {
            if self.is_valid_external_id(&initial) {
                info!("Existing external ID already verified, locking person fields");
                FieldReconciler::disable_person_fields(&mut lock_form(&form));
                initial_status = VerificationStatus::Success;
            }
            seen = Some(initial.clone());
        }

        let (status, _) = watch::channel(initial_status);
        let ctx = PipelineContext::new(
            form,
            status,
            Arc::clone(&self.validator),
            Arc::clone(&self.client),
            Arc::clone(&self.context),
            gender_options,
            self.config.debounce,
            self.config.lookup_timeout,
        );
        let watch = ExternalIdWatch::start(ctx, seen);

        if !skip_initial_value && !initial.is_empty() {
            watch.push(&initial);
        }

        Some(watch)
    }
}
