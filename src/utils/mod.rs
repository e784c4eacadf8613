pub mod colors;
pub mod csv_input;
pub mod formatting;
pub mod path;
pub mod table;
pub mod time;

pub use formatting::{gap2readable, ms2readable};
