use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use crate::forms::{lock_form, FieldReconciler, PersonForm, SharedForm};
use crate::lookup::{lookup_with_timeout, NationalIdLookup};
use crate::models::{GenderOption, LookupContext, LookupResponse, VerificationStatus};
use crate::utils::ExternalIdResult;
use crate::validation::PatternValidator;
use crate::verification::LookupSequencer;

/// Values that leave the debouncer longer than this are reported as
/// malformed; shorter ones are treated as still being typed.
const INVALID_FORMAT_MIN_CHARS: usize = 3;

/// Everything a running watch needs, shared with its lookup tasks.
pub(crate) struct PipelineContext {
    pub form: SharedForm,
    pub status: watch::Sender<VerificationStatus>,
    pub validator: Arc<PatternValidator>,
    pub client: Arc<dyn NationalIdLookup>,
    pub context: Arc<LookupContext>,
    pub gender_options: Vec<GenderOption>,
    pub debounce: Duration,
    pub lookup_timeout: Duration,
    sequencer: LookupSequencer,
    inflight: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl PipelineContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        form: SharedForm,
        status: watch::Sender<VerificationStatus>,
        validator: Arc<PatternValidator>,
        client: Arc<dyn NationalIdLookup>,
        context: Arc<LookupContext>,
        gender_options: Vec<GenderOption>,
        debounce: Duration,
        lookup_timeout: Duration,
    ) -> Self {
        PipelineContext {
            form,
            status,
            validator,
            client,
            context,
            gender_options,
            debounce,
            lookup_timeout,
            sequencer: LookupSequencer::new(),
            inflight: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn set_status(&self, status: VerificationStatus) {
        self.status.send_replace(status);
    }

    fn replace_inflight(&self, handle: Option<JoinHandle<()>>) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *inflight, handle) {
            previous.abort();
        }
    }

    /// Run one debounced, de-duplicated value through the validation gate.
    fn evaluate(self: &Arc<Self>, value: String) {
        // Token changes happen under the form lock so that a lookup task can
        // check-and-apply atomically.
        let mut form = lock_form(&self.form);

        if self.closed.load(Ordering::SeqCst) {
            debug!("External ID watch closed, dropping {:?}", value);
            return;
        }

        if !self.validator.is_valid(&value) {
            self.sequencer.invalidate();
            self.replace_inflight(None);
            FieldReconciler::enable_person_fields(&mut form);

            let status = if value.chars().count() > INVALID_FORMAT_MIN_CHARS {
                VerificationStatus::InvalidFormat
            } else {
                VerificationStatus::Empty
            };
            debug!("External ID {:?} rejected by pattern, status {}", value, status);
            self.set_status(status);
            return;
        }

        // Fields locked by an earlier result must not carry over into this one
        FieldReconciler::enable_person_fields(&mut form);
        let token = self.sequencer.next();
        self.set_status(VerificationStatus::Loading);
        debug!("Issuing external ID lookup #{}", token);

        let ctx = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = lookup_with_timeout(
                ctx.client.as_ref(),
                &value,
                &ctx.context,
                ctx.lookup_timeout,
            )
            .await;
            ctx.apply(token, result);
        });
        self.replace_inflight(Some(handle));
    }

    fn apply(&self, token: u64, result: ExternalIdResult<LookupResponse>) {
        let mut form = lock_form(&self.form);

        if !self.sequencer.is_current(token) {
            debug!("Discarding stale external ID lookup #{}", token);
            return;
        }

        let status = match result {
            Ok(response) => {
                FieldReconciler::apply_response(&mut form, &response, &self.gender_options)
            }
            Err(err) => {
                warn!("External ID lookup failed: {}", err);
                FieldReconciler::enable_person_fields(&mut form);
                err.verification_status()
            }
        };
        self.set_status(status);
    }

    /// Stop honouring any outstanding lookup.
    fn shutdown(&self) {
        let _form = lock_form(&self.form);
        self.closed.store(true, Ordering::SeqCst);
        self.sequencer.invalidate();
        self.replace_inflight(None);
    }
}

/// Debounce raw input, drop repeats, and hand the rest to the gate.
async fn run_pipeline(
    ctx: Arc<PipelineContext>,
    mut input: mpsc::UnboundedReceiver<String>,
    mut last_forwarded: Option<String>,
) {
    let mut pending: Option<String> = None;
    let debounce = sleep(ctx.debounce);
    tokio::pin!(debounce);

    loop {
        tokio::select! {
            value = input.recv() => match value {
                Some(value) => {
                    pending = Some(value);
                    debounce.as_mut().reset(Instant::now() + ctx.debounce);
                }
                None => break,
            },
            () = &mut debounce, if pending.is_some() => {
                let Some(value) = pending.take() else { continue };
                if last_forwarded.as_deref() == Some(value.as_str()) {
                    continue;
                }
                last_forwarded = Some(value.clone());
                ctx.evaluate(value);
            }
        }
    }
}

/// A running watch over one form's external ID input.
///
/// Dropping the watch tears it down: pending debounce timers and in-flight
/// lookups are cancelled and the form is no longer touched.
pub struct ExternalIdWatch {
    ctx: Arc<PipelineContext>,
    input: mpsc::UnboundedSender<String>,
    pipeline: JoinHandle<()>,
}

impl ExternalIdWatch {
    /// Spawn the pipeline. Must be called from within a tokio runtime.
    ///
    /// `seen` is treated as the last value that went through the gate, so
    /// re-entering it does not trigger a lookup.
    pub(crate) fn start(ctx: PipelineContext, seen: Option<String>) -> Self {
        let ctx = Arc::new(ctx);
        let (input, rx) = mpsc::unbounded_channel();
        let pipeline = tokio::spawn(run_pipeline(Arc::clone(&ctx), rx, seen));

        ExternalIdWatch {
            ctx,
            input,
            pipeline,
        }
    }

    /// Record a keystroke: the full current content of the ID input.
    pub fn set_external_id(&self, value: &str) {
        lock_form(&self.ctx.form).set_external_id(value);
        self.push(value);
    }

    pub(crate) fn push(&self, value: &str) {
        if self.input.send(value.to_string()).is_err() {
            debug!("External ID watch already stopped, ignoring input");
        }
    }

    pub fn status(&self) -> VerificationStatus {
        *self.ctx.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<VerificationStatus> {
        self.ctx.status.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.status().is_loading()
    }

    pub fn form(&self) -> &SharedForm {
        &self.ctx.form
    }

    /// Snapshot of the watched form.
    pub fn form_snapshot(&self) -> PersonForm {
        lock_form(&self.ctx.form).clone()
    }

    /// Give the person fields back to the user.
    pub fn enable_person_fields(&self) {
        FieldReconciler::enable_person_fields(&mut lock_form(&self.ctx.form));
    }

    pub fn destroy(self) {}
}

impl Drop for ExternalIdWatch {
    fn drop(&mut self) {
        self.pipeline.abort();
        self.ctx.shutdown();
    }
}
