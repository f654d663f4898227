//! Fluent builder for complete datasets.

use std::ops::RangeInclusive;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use time::Date;
use tracing::info;

use crate::config::{ConfigError, RunConfig};
use crate::db::{SeedError, Store, ToRecord, seed_rows};
use crate::generators::{
    AttachmentGenerator, CommentGenerator, CustomFieldGenerator, GeneratedAttachment,
    GeneratedComment, GeneratedCustomField, GeneratedCustomFieldValue, GeneratedMembership,
    GeneratedOrganization, GeneratedProject, GeneratedSection, GeneratedTag, GeneratedTask,
    GeneratedTaskTag, GeneratedTeam, GeneratedUser, OrganizationGenerator, ProjectGenerator,
    TagGenerator, TaskGenConfig, TaskGenerator, TeamGenerator, UserGenConfig, UserGenerator,
    UserPool,
};
use crate::text::TextGenerator;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Every collection produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub organization: GeneratedOrganization,
    pub users: Vec<GeneratedUser>,
    pub teams: Vec<GeneratedTeam>,
    pub memberships: Vec<GeneratedMembership>,
    pub projects: Vec<GeneratedProject>,
    pub sections: Vec<GeneratedSection>,
    pub tags: Vec<GeneratedTag>,
    pub tasks: Vec<GeneratedTask>,
    pub subtasks: Vec<GeneratedTask>,
    pub comments: Vec<GeneratedComment>,
    pub attachments: Vec<GeneratedAttachment>,
    pub custom_fields: Vec<GeneratedCustomField>,
    pub custom_field_values: Vec<GeneratedCustomFieldValue>,
    pub task_tags: Vec<GeneratedTaskTag>,
    /// Populated when metrics tracking is enabled.
    pub metrics: Option<DatasetMetrics>,
}

/// Timing and volume of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent writing to the store (milliseconds, 0 if only generated).
    pub seeding_time_ms: u64,
    /// Rows per table, in write order.
    pub row_counts: Vec<(&'static str, usize)>,
}

impl Dataset {
    /// Top-level tasks followed by subtasks.
    pub fn all_tasks(&self) -> impl Iterator<Item = &GeneratedTask> {
        self.tasks.iter().chain(&self.subtasks)
    }

    /// Rows per table, in write order. Subtasks count toward `tasks`.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (GeneratedOrganization::TABLE, 1),
            (GeneratedUser::TABLE, self.users.len()),
            (GeneratedTeam::TABLE, self.teams.len()),
            (GeneratedMembership::TABLE, self.memberships.len()),
            (GeneratedProject::TABLE, self.projects.len()),
            (GeneratedSection::TABLE, self.sections.len()),
            (GeneratedTag::TABLE, self.tags.len()),
            (GeneratedTask::TABLE, self.tasks.len() + self.subtasks.len()),
            (GeneratedComment::TABLE, self.comments.len()),
            (GeneratedAttachment::TABLE, self.attachments.len()),
            (GeneratedCustomField::TABLE, self.custom_fields.len()),
            (GeneratedCustomFieldValue::TABLE, self.custom_field_values.len()),
            (GeneratedTaskTag::TABLE, self.task_tags.len()),
        ]
    }

    /// Writes every collection, parents before children.
    ///
    /// Stops at the first failure; collections written before it stay.
    pub async fn persist(&self, store: &dyn Store) -> Result<u64, SeedError> {
        let mut written = 0;

        written += seed_rows(store, std::slice::from_ref(&self.organization)).await?;
        written += seed_rows(store, &self.users).await?;
        written += seed_rows(store, &self.teams).await?;
        written += seed_rows(store, &self.memberships).await?;
        written += seed_rows(store, &self.projects).await?;
        written += seed_rows(store, &self.sections).await?;
        written += seed_rows(store, &self.tags).await?;
        written += seed_rows(store, &self.tasks).await?;
        written += seed_rows(store, &self.subtasks).await?;
        written += seed_rows(store, &self.comments).await?;
        written += seed_rows(store, &self.attachments).await?;
        written += seed_rows(store, &self.custom_fields).await?;
        written += seed_rows(store, &self.custom_field_values).await?;
        written += seed_rows(store, &self.task_tags).await?;

        Ok(written)
    }
}

/// Builder for one run's dataset.
///
/// # Example
///
/// ```rust,ignore
/// let dataset = DatasetBuilder::new()
///     .with_users(200)
///     .with_teams(8)
///     .with_projects(20..=40)
///     .with_window(date!(2024 - 01 - 01), date!(2024 - 04 - 01))
///     .with_seed(7)
///     .build(&store, &TemplateText::new())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    config: RunConfig,
    track_metrics: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    /// Creates a builder with the default run configuration.
    pub fn new() -> Self {
        Self::from_config(RunConfig::default())
    }

    /// Creates a builder from a loaded run configuration.
    pub fn from_config(config: RunConfig) -> Self {
        Self {
            config,
            track_metrics: false,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Sets the number of users.
    pub fn with_users(mut self, count: usize) -> Self {
        self.config.org_size = count;
        self
    }

    /// Sets the number of teams.
    pub fn with_teams(mut self, count: usize) -> Self {
        self.config.num_teams = count;
        self
    }

    /// Sets the simulated date range.
    pub fn with_window(mut self, start: Date, end: Date) -> Self {
        self.config.start_date = start;
        self.config.end_date = end;
        self
    }

    /// Sets the seed for the run's random stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets the inclusive range the project count is drawn from.
    pub fn with_projects(mut self, range: RangeInclusive<usize>) -> Self {
        self.config.projects = (*range.start(), *range.end());
        self
    }

    pub fn with_tasks_per_project(mut self, mean: usize) -> Self {
        self.config.tasks_per_project = mean;
        self
    }

    pub fn with_subtask_ratio(mut self, ratio: f64) -> Self {
        self.config.subtask_ratio = ratio;
        self
    }

    pub fn with_tags(mut self, count: usize) -> Self {
        self.config.tag_count = count;
        self
    }

    pub fn with_organization(mut self, name: impl Into<String>, domain: impl Into<String>) -> Self {
        self.config.org_name = name.into();
        self.config.org_domain = domain.into();
        self
    }

    /// Enables metrics tracking for performance analysis.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Generates the dataset from a stream seeded with the configured seed.
    pub fn build_data(&self, text: &dyn TextGenerator) -> Result<Dataset, BuildError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.build_data_with_rng(text, &mut rng)
    }

    /// Generates the dataset from the given random stream.
    pub fn build_data_with_rng(
        &self,
        text: &dyn TextGenerator,
        rng: &mut impl Rng,
    ) -> Result<Dataset, BuildError> {
        self.config.validate()?;
        let start_time = self.track_metrics.then(Instant::now);
        let config = &self.config;
        let window = config.window();

        info!(
            "Generating dataset for {} ({} users, {} teams, {} to {})",
            config.org_name, config.org_size, config.num_teams, config.start_date, config.end_date
        );

        let organization = OrganizationGenerator::new(&config.org_name, &config.org_domain)
            .generate(window.start, rng);

        let user_gen = UserGenerator::with_config(UserGenConfig {
            domain: config.org_domain.clone(),
            ..Default::default()
        });
        let users = user_gen.generate_batch(config.org_size, organization.id, window, rng);
        info!("Generated {} users", users.len());

        let team_gen = TeamGenerator::new();
        let teams = team_gen.generate_teams(config.num_teams, organization.id, window, rng);
        let (memberships, roster) = team_gen.generate_memberships(&teams, &users, rng);
        info!(
            "Generated {} teams with {} memberships",
            teams.len(),
            memberships.len()
        );

        let project_count = rng.gen_range(config.project_range());
        let (projects, sections) =
            ProjectGenerator::new().generate_projects(project_count, &teams, &users, window, rng);
        info!(
            "Generated {} projects and {} sections",
            projects.len(),
            sections.len()
        );

        let tag_gen = TagGenerator::new();
        let tags = tag_gen.generate_tags(config.tag_count, organization.id, rng);
        info!("Generated {} tags", tags.len());

        let task_gen = TaskGenerator::with_config(TaskGenConfig {
            tasks_per_project: config.tasks_per_project,
            subtask_ratio: config.subtask_ratio,
            ..Default::default()
        });
        let tasks =
            task_gen.generate_tasks(&projects, &sections, &users, &roster, window, text, rng);
        info!("Generated {} tasks", tasks.len());
        let subtasks = task_gen.generate_subtasks(&tasks, window, rng);
        info!("Generated {} subtasks", subtasks.len());

        let pool = UserPool::from_users(&users);
        let all_tasks = || tasks.iter().chain(&subtasks);

        let comments =
            CommentGenerator::new().generate_comments(all_tasks(), &pool, window, text, rng);
        info!("Generated {} comments", comments.len());

        let attachments =
            AttachmentGenerator::new().generate_attachments(all_tasks(), &pool, window, rng);
        info!("Generated {} attachments", attachments.len());

        let field_gen = CustomFieldGenerator::new();
        let custom_fields = field_gen.generate_definitions(&projects, rng);
        let custom_field_values = field_gen.generate_values(all_tasks(), &custom_fields, rng);
        info!(
            "Generated {} custom fields with {} values",
            custom_fields.len(),
            custom_field_values.len()
        );

        let task_tags = tag_gen.generate_task_tags(all_tasks(), &tags, rng);
        info!("Generated {} task-tag associations", task_tags.len());

        let mut dataset = Dataset {
            organization,
            users,
            teams,
            memberships,
            projects,
            sections,
            tags,
            tasks,
            subtasks,
            comments,
            attachments,
            custom_fields,
            custom_field_values,
            task_tags,
            metrics: None,
        };

        dataset.metrics = start_time.map(|start| DatasetMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0, // Set by build() if the dataset is written
            row_counts: dataset.row_counts(),
        });

        Ok(dataset)
    }

    /// Generates the dataset and writes it to `store`.
    pub async fn build(
        self,
        store: &dyn Store,
        text: &dyn TextGenerator,
    ) -> Result<Dataset, BuildError> {
        let mut dataset = self.build_data(text)?;

        let seed_start = self.track_metrics.then(Instant::now);
        let written = dataset.persist(store).await?;
        info!("Wrote {} rows", written);

        if let (Some(start), Some(metrics)) = (seed_start, dataset.metrics.as_mut()) {
            metrics.seeding_time_ms = start.elapsed().as_millis() as u64;
        }

        Ok(dataset)
    }
}

/// Preset datasets for common needs.
impl DatasetBuilder {
    /// A small dataset over one month, quick enough for tests.
    ///
    /// - 10 users in 2 teams
    /// - 5 projects
    /// - January 2024
    pub fn small_test() -> Self {
        Self::new()
            .with_users(10)
            .with_teams(2)
            .with_projects(5..=5)
            .with_window(
                time::macros::date!(2024 - 01 - 01),
                time::macros::date!(2024 - 02 - 01),
            )
            .with_seed(42)
    }

    /// A mid-sized organization for exercising queries and dashboards.
    ///
    /// - 500 users in 12 teams
    /// - 30 to 60 projects over a quarter
    pub fn department_test() -> Self {
        Self::new()
            .with_users(500)
            .with_teams(12)
            .with_projects(30..=60)
            .with_window(
                time::macros::date!(2024 - 01 - 01),
                time::macros::date!(2024 - 04 - 01),
            )
            .with_metrics(true)
    }
}
