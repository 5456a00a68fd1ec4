//! Profile aggregate
//!
//! Contains the Profile entity, its role/capability model, DTOs, and the
//! repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::{Capability, DocumentIntent, DocumentKind, DocumentSet, Profile, Role};

pub use dto_create::NewProfileDto;
pub use dto_update::ProfileFieldsUpdate;

pub use repository::{DeleteSummary, ProfileRepositoryInterface, UpdateSummary};
