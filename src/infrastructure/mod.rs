//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the photo repository and trace files live on the host.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, photos_file, trace_file};
