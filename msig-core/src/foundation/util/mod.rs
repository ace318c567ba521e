pub mod encoding;
pub mod result_ext;
pub mod time;
