//! Loading recordings from disk. The segmenters themselves never touch I/O.

pub mod csv;
pub mod text;
