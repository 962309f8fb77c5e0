pub mod error;

pub use error::{ExternalIdError, ExternalIdResult};
