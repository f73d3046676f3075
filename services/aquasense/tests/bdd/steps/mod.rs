//! BDD step definitions for the aquasense dashboard

pub mod classification_steps;
pub mod dispensing_steps;
pub mod rendering_steps;
