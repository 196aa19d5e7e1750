mod aggregate;
mod money;
mod parser;
mod record;
mod window;

pub use aggregate::*;
pub use money::*;
pub use parser::*;
pub use record::*;
pub use window::*;
