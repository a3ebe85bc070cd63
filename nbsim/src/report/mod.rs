pub mod csv_recorder;
pub mod summary;
