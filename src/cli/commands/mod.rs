pub mod backup;
pub mod bib;
pub mod config;
pub mod db;
pub mod event;
pub mod export;
pub mod init;
pub mod log;
pub mod stats;
pub mod time;
