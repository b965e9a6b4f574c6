pub mod discovery;
pub mod title_document;

pub use discovery::{discover_files, list_candidate_folders};
pub use title_document::{TitleDocument, WISDOM_MASTER_NS};
