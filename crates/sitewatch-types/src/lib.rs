pub mod event;
pub mod lifecycle;
pub mod record;
pub mod rule;
mod util;

pub use event::*;
pub use lifecycle::*;
pub use record::*;
pub use rule::*;
pub use util::*;
