pub mod delegate;
pub mod promo;
pub mod table;

pub use delegate::{BindOutcome, QnaSession, QueryDelegate};
pub use table::Table;
