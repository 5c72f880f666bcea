//! Shared file utilities

pub mod atomic;
pub mod encoding;

pub use atomic::atomic_write;
pub use encoding::{read_text_file, TextFile};
