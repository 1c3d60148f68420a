mod category;
mod transaction;

pub use category::{CategorySet, DEFAULT_CATEGORIES};
pub use transaction::{Draft, Transaction};

pub(crate) use transaction::parse_date;
