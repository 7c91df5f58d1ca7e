//! Controllers layer - stateful coordinators.
//!
//! - `tabs`: the ordered set of open documents
//! - `voice`: background voice capture jobs

pub mod tabs;
pub mod voice;
