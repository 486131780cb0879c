// src/pdf/mod.rs

pub mod fields;
pub mod text;

pub use fields::{extract_fields, normalize_newlines, PdfExtract};
pub use text::{collect_extracts, DocumentExtract, LopdfText, PdfText};
