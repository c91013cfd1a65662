pub mod listing;
pub mod static_files;
