pub mod title_mutator;

pub use title_mutator::{apply_title, commit_entry, decide_title, plan_rename, plan_title, TitleDecision};
