mod classifier;
pub mod error;
mod parser;
mod schema;

pub use classifier::{Classifier, TickReport};
pub use error::{Error, Result};
pub use parser::parse_entry;
