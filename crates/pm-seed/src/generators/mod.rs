//! Entity generators for the synthetic dataset.
//!
//! Generators are stateless apart from their configuration and take the run's
//! random stream explicitly, so call order fixes the output for a given seed:
//! - [`OrganizationGenerator`]: the organization owning the run
//! - [`UserGenerator`]: users with departments, roles, and unique emails
//! - [`TeamGenerator`]: teams and memberships, plus the team roster
//! - [`ProjectGenerator`]: projects with their four board sections
//! - [`TagGenerator`]: organization tags and task-tag associations
//! - [`TaskGenerator`]: tasks with due and completion dates, and subtasks
//! - [`CommentGenerator`]: comment threads on tasks
//! - [`AttachmentGenerator`]: file attachments on tasks
//! - [`CustomFieldGenerator`]: per-project field definitions and task values

pub mod actor;
pub mod attachment;
pub mod comment;
pub mod custom_field;
pub mod organization;
pub mod project;
pub mod tag;
pub mod task;
pub mod team;
pub mod user;

pub use actor::{ActorRole, UserPool};
pub use attachment::{
    AttachmentGenConfig, AttachmentGenerator, FileCategory, FileTemplate, GeneratedAttachment,
};
pub use comment::{CommentGenConfig, CommentGenerator, GeneratedComment};
pub use custom_field::{
    CustomFieldGenConfig, CustomFieldGenerator, FieldValue, GeneratedCustomField,
    GeneratedCustomFieldValue,
};
pub use organization::{GeneratedOrganization, OrganizationGenerator};
pub use project::{
    GeneratedProject, GeneratedSection, ProjectGenConfig, ProjectGenerator, STANDARD_SECTIONS,
};
pub use tag::{GeneratedTag, GeneratedTaskTag, TagGenerator};
pub use task::{
    GeneratedTask, TaskGenConfig, TaskGenerator, completion_date_policy, due_date_policy,
};
pub use team::{GeneratedMembership, GeneratedTeam, TeamGenConfig, TeamGenerator, TeamRoster};
pub use user::{GeneratedUser, UserGenConfig, UserGenerator};
