//! Domain types shared by the parser, resolver, and dispatcher.

pub mod errors;
pub mod model;
