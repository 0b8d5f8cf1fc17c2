//! Export surfaces: PDF report and synthesized interview audio.

pub mod handlers;
pub mod report;
pub mod speech;
