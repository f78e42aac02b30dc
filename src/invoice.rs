pub mod image;
pub mod normalizer;
pub mod table;

pub use image::{ImageKey, InvoiceImage};
pub use normalizer::{normalize, parse_table, ExtractionResult, FailureReason, ParseError};
pub use table::{ItemTable, LineRecord, CSV_FILE_NAME, CSV_HEADER};
