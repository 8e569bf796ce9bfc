pub mod analysis_result;
pub mod doctor;
pub mod medical_record;
pub mod patient;

pub use analysis_result::*;
pub use doctor::*;
pub use medical_record::*;
pub use patient::*;
