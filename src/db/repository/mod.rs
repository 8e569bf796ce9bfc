pub mod analysis_result;
pub mod doctor;
pub mod medical_record;
pub mod patient;
