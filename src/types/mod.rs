pub mod book_record;
pub mod isbn;
pub mod quantity;

pub use book_record::{BookRecord, RawRecord};
pub use isbn::Isbn;
pub use quantity::Quantity;
