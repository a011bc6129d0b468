pub mod comparison;
pub mod health;
pub mod realtime;
pub mod selection;
pub mod summary;
pub mod visitors;
pub mod websites;

pub use comparison::*;
pub use health::*;
pub use realtime::*;
pub use selection::*;
pub use summary::*;
pub use visitors::*;
pub use websites::*;
