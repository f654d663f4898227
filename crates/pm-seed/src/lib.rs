//! Synthetic project-management data for testing and demos.
//!
//! This crate generates a coherent organization: users and teams, projects
//! with board sections, tasks and subtasks, comments, attachments, tags, and
//! custom fields. Every value is drawn from one seeded random stream, so a
//! given configuration always yields the same dataset.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pm_seed::prelude::*;
//!
//! let store = MemoryStore::new();
//! let dataset = DatasetBuilder::small_test()
//!     .with_users(25)
//!     .with_projects(3..=6)
//!     .build(&store, &TemplateText::new())
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod ids;
pub mod models;
pub mod temporal;
pub mod text;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{BuildError, Dataset, DatasetBuilder, DatasetMetrics};
    pub use crate::config::{RunConfig, RunWindow};
    pub use crate::db::{MemoryStore, Seeder, Store, ToRecord};
    pub use crate::generators::{
        AttachmentGenerator, CommentGenerator, CustomFieldGenerator, OrganizationGenerator,
        ProjectGenerator, TagGenerator, TaskGenerator, TeamGenerator, UserGenerator,
    };
    pub use crate::models::{Department, FieldType, MembershipRole, Priority, ProjectType};
    pub use crate::text::{TemplateText, TextGenerator, build_text_generator};
}
