pub mod index_writer;
pub mod natural_order;
pub mod numeral_normalizer;
pub mod title_codec;

pub use index_writer::IndexWriter;
pub use natural_order::NaturalKey;
