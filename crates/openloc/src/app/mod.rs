//! Application layer: parsing, path resolution, and editor dispatch.

pub mod dispatch;
pub mod open;
pub mod parse;
pub mod resolve;
pub mod scan;
