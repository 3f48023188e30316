pub mod file_get;
pub mod file_upload;
pub mod health;
