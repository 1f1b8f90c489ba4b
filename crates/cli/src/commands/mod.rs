pub mod candidates;
pub mod harvest;
pub mod util;

pub use candidates::*;
pub use harvest::*;
pub use util::*;
