//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the `studytutor` library.
//! `tutor` holds the answer-generation templates and `ocr` the transcription
//! prompt used by vision-model OCR.

pub mod ocr;
pub mod tutor;
