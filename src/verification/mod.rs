pub mod pipeline;
pub mod sequencer;

pub use pipeline::ExternalIdWatch;
pub(crate) use pipeline::PipelineContext;
pub use sequencer::LookupSequencer;
