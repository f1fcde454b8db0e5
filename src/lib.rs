//! Car listing parser: turns a captured listing page (ordered text lines
//! plus image URLs) into a structured vehicle record.

pub mod error;
pub mod page;
pub mod parser;
pub mod record;
pub mod settings;

pub use error::{ListingError, Result};
pub use parser::process_listing;
pub use record::{Database, ListingInput, VehicleRecord};
pub use settings::{Settings, Vocabulary};
