pub mod bib;
pub mod event;
pub mod event_status;
pub mod record;
pub mod sort;
pub mod stats;
