mod deserializer;
mod identity;
mod link;

pub use deserializer::*;
pub use identity::*;
pub use link::*;
