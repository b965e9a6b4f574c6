pub mod index_record;
pub mod plan;
pub mod serialized_record;
pub mod source_file;

pub use index_record::IndexRecord;
pub use plan::{Action, FileOutcome, Mode, OutcomeStatus, Plan, PlanEntry, SkipReason, Summary};
pub use serialized_record::{Locale, SerializedRecord};
pub use source_file::SourceFile;
