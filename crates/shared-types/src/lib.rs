pub mod error;
pub mod feature_flags;

// Arrest intake and review domain
pub mod case;
pub mod charges;
pub mod dashboard;
pub mod intake;
pub mod session;
pub mod summary;

pub use error::*;
pub use feature_flags::*;

pub use case::*;
pub use charges::*;
pub use dashboard::*;
pub use intake::*;
pub use session::*;
pub use summary::*;
