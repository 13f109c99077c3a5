pub mod ai;
pub mod factory;
pub mod ocr;
