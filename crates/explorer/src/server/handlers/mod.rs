pub mod experiments;
pub mod status;
