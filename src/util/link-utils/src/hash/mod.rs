mod hashers;
pub use hashers::*;

mod murmur;
pub use murmur::*;

pub use hashbrown;
