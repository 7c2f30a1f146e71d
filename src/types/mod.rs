pub mod errors;
pub mod ids;
pub mod plan;
pub mod report;
pub mod target;

pub use errors::*;
pub use ids::*;
pub use plan::*;
pub use report::*;
pub use target::*;
