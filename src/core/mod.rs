pub mod backup;
pub mod bib;
pub mod event;
pub mod log;
pub mod ranking;
pub mod record;
pub mod stats;
