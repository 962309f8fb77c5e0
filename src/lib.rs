pub mod config;
pub mod forms;
pub mod lookup;
pub mod models;
pub mod national_id_service;
pub mod utils;
pub mod validation;
pub mod verification;

pub use config::ExternalIdConfig;
pub use national_id_service::ExternalNationalIdService;
pub use verification::ExternalIdWatch;
