//! git2-based adapter for the repository mirror port

mod mirror;

pub use mirror::{GitMirror, MirrorSettings};
