//! JSON import and export of element descriptions.

pub mod reader;
pub mod writer;

pub use reader::GraphReader;
pub use writer::{to_json, GraphWriter};
