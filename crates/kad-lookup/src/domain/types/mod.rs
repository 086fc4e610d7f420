pub mod entities;
pub mod errors;
pub mod messages;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use messages::*;
pub use value_objects::*;
