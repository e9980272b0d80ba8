//! Command implementations.

pub mod lookup;
pub mod opinion;
pub mod search;
pub mod status;

pub use self::lookup::execute_lookup;
pub use self::opinion::execute_opinion;
pub use self::search::{execute_search, render_search};
pub use self::status::execute_status;
