//! Project and section generation.

use rand::Rng;
use rand::seq::SliceRandom;
use time::OffsetDateTime;
use uuid::Uuid;

use super::team::GeneratedTeam;
use super::user::GeneratedUser;
use crate::config::RunWindow;
use crate::ids::generate_id;
use crate::models::{COLORS, ProjectType};
use crate::temporal::{categorical, uniform_between};
use crate::text::project_name_templates;

/// Board columns every project starts with, in position order.
pub const STANDARD_SECTIONS: [&str; 4] = ["To Do", "In Progress", "In Review", "Done"];

/// Generated project data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProject {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub description: String,
    pub project_type: ProjectType,
    pub color: String,
    pub archived: bool,
    pub created_at: OffsetDateTime,
    pub created_by: Option<Uuid>,
}

/// Generated section data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSection {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: OffsetDateTime,
}

/// Configuration for project generation.
#[derive(Debug, Clone)]
pub struct ProjectGenConfig {
    /// Weights aligned with [`ProjectType::ALL`].
    pub type_weights: [f64; 3],
    /// Probability of a year or quarter suffix on the name.
    pub name_variant_probability: f64,
    pub archived_probability: f64,
    /// Probability of a type-specific sentence after the description.
    pub description_suffix_probability: f64,
}

impl Default for ProjectGenConfig {
    fn default() -> Self {
        Self {
            type_weights: [0.50, 0.30, 0.20],
            name_variant_probability: 0.30,
            archived_probability: 0.15,
            description_suffix_probability: 0.60,
        }
    }
}

const DESCRIPTION_TEMPLATES: &[&str] = &[
    "Project for {name} focusing on {ptype} initiatives.",
    "Track and coordinate key {ptype} work for {name}.",
    "Central hub for planning and executing {ptype} work related to {name}.",
    "Organize tasks, milestones, and updates for {name} ({ptype}).",
    "Scope, deliverables, and progress tracking for {name} ({ptype} project).",
];

fn description_suffixes(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Engineering => &[
            "Includes backlog grooming, implementation, and QA.",
            "Covers design, implementation, and technical review.",
            "Focuses on feature delivery, reliability, and performance.",
        ],
        ProjectType::Marketing => &[
            "Includes campaign planning, content, and performance tracking.",
            "Covers creative production, approvals, and launch activities.",
            "Focuses on audience targeting, messaging, and reporting.",
        ],
        ProjectType::Operations => &[
            "Includes process improvements, documentation, and coordination.",
            "Covers internal workflows, tooling, and compliance tasks.",
            "Focuses on reliability, standardization, and efficiency.",
        ],
    }
}

/// Generates projects with their board sections.
pub struct ProjectGenerator {
    config: ProjectGenConfig,
}

impl ProjectGenerator {
    /// Creates a new project generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ProjectGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ProjectGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` projects, oldest first, each with four sections.
    ///
    /// Returns no projects when there are no teams to own them.
    pub fn generate_projects(
        &self,
        count: usize,
        teams: &[GeneratedTeam],
        users: &[GeneratedUser],
        window: RunWindow,
        rng: &mut impl Rng,
    ) -> (Vec<GeneratedProject>, Vec<GeneratedSection>) {
        if teams.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut creation_times: Vec<OffsetDateTime> = (0..count)
            .map(|_| uniform_between(window.start, window.end, rng))
            .collect();
        creation_times.sort();

        let mut projects = Vec::with_capacity(count);
        let mut sections = Vec::with_capacity(count * STANDARD_SECTIONS.len());

        for created_at in creation_times {
            let project = self.generate_single_project(created_at, teams, users, rng);
            sections.extend(generate_sections(&project, rng));
            projects.push(project);
        }

        (projects, sections)
    }

    fn generate_single_project(
        &self,
        created_at: OffsetDateTime,
        teams: &[GeneratedTeam],
        users: &[GeneratedUser],
        rng: &mut impl Rng,
    ) -> GeneratedProject {
        let project_type = ProjectType::ALL[categorical(&self.config.type_weights, rng)];
        let name = self.generate_name(project_type, rng);
        let team_id = teams[rng.gen_range(0..teams.len())].id;
        let created_by = users.choose(rng).map(|u| u.id);
        let description = self.generate_description(&name, project_type, rng);
        let color = COLORS[rng.gen_range(0..COLORS.len())].to_string();
        let archived = rng.r#gen::<f64>() < self.config.archived_probability;

        GeneratedProject {
            id: generate_id(rng),
            team_id,
            name,
            description,
            project_type,
            color,
            archived,
            created_at,
            created_by,
        }
    }

    fn generate_name(&self, project_type: ProjectType, rng: &mut impl Rng) -> String {
        let pool = project_name_templates(project_type);
        let base = pool[rng.gen_range(0..pool.len())];

        if rng.r#gen::<f64>() < self.config.name_variant_probability {
            match rng.gen_range(0..3) {
                0 => format!("{base} 2024"),
                1 => format!("{base} Q1"),
                _ => format!("{base} Q2"),
            }
        } else {
            base.to_string()
        }
    }

    fn generate_description(
        &self,
        name: &str,
        project_type: ProjectType,
        rng: &mut impl Rng,
    ) -> String {
        let template = DESCRIPTION_TEMPLATES[rng.gen_range(0..DESCRIPTION_TEMPLATES.len())];
        let base = template
            .replace("{name}", name)
            .replace("{ptype}", project_type.as_str());

        if rng.r#gen::<f64>() < self.config.description_suffix_probability {
            let suffixes = description_suffixes(project_type);
            let suffix = suffixes[rng.gen_range(0..suffixes.len())];
            format!("{base} {suffix}")
        } else {
            base
        }
    }
}

impl Default for ProjectGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_sections(project: &GeneratedProject, rng: &mut impl Rng) -> Vec<GeneratedSection> {
    STANDARD_SECTIONS
        .iter()
        .zip(0..)
        .map(|(name, position)| GeneratedSection {
            id: generate_id(rng),
            project_id: project.id,
            name: name.to_string(),
            position,
            created_at: project.created_at,
        })
        .collect()
}
