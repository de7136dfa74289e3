//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the rules of the learning platform independently of HTTP
//! and storage. Two cores live here:
//! - the leveling engine (`leveling`), turning an absolute points total into
//!   stored points and level;
//! - the section component service, keeping each section's bounded component
//!   list consistent with the exercises that exist.
//!
//! Adapters talk to the domain only through [`ports`].

pub mod error;
pub mod exercise;
pub mod ids;
pub mod leveling;
pub mod ports;
pub mod reason_code;
pub mod section;
pub mod section_component_service;
pub mod trace_id;
pub mod user;
pub mod user_progress_service;

pub use self::error::{Error, ErrorCode};
pub use self::exercise::{Exercise, ExerciseChanges, ExerciseDraft, ExerciseValidationError};
pub use self::ids::{ExerciseId, IdValidationError, SectionId, UserId};
pub use self::leveling::{
    LEVEL_THRESHOLD, LevelingError, PointsTotal, Progress, ProgressValidationError, progress_for,
};
pub use self::reason_code::ReasonCode;
pub use self::section::{
    ComponentListError, ComponentRef, ComponentType, MAX_COMPONENTS, Section,
};
pub use self::section_component_service::{ORPHAN_GRACE, SectionComponentService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserChanges, UserValidationError};
pub use self::user_progress_service::UserProgressService;

