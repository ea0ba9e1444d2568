pub mod file;
pub mod misc;
