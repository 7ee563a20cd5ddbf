mod edge;
mod reader;

pub use edge::EdgeCallback;
pub use reader::{Interrupter, Read, Reader};
