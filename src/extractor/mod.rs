pub mod file_extractor;
pub mod object_store;
pub mod report;

pub use file_extractor::{extract, CopiedFile, ExtractionProgress, FileOperations};
pub use object_store::ObjectStore;
pub use report::ExtractionReport;
