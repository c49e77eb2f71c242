pub mod care_event;
pub mod document;
pub mod enums;
pub mod filters;
pub mod resident;

pub use care_event::*;
pub use document::*;
pub use filters::*;
pub use resident::*;
