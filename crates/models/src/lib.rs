pub mod errors;
pub mod record;

pub use record::HealthRecord;
