//! ExamSense Core
//!
//! Turns a student's syllabus and past exam questions into a prioritized
//! study breakdown by asking a document-reasoning backend for a strictly
//! structured answer and validating it before anything is shown.
//!
//! The pipeline runs one direction per submission:
//! [`attachment`] -> [`composer`] -> [`reasoning`] -> [`decoder`] ->
//! [`presentation`], orchestrated by [`analyzer::Analyzer`].

pub mod analysis;
pub mod analyzer;
pub mod attachment;
pub mod composer;
pub mod decoder;
pub mod error;
pub mod gate;
pub mod presentation;
pub mod reasoning;
pub mod schema;
pub mod settings;
