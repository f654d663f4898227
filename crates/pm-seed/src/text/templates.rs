//! Template-based text that needs no configuration.

use rand::{Rng, RngCore};

use super::TextGenerator;
use crate::models::ProjectType;

/// Share of tasks left without a description.
const EMPTY_DESCRIPTION_RATE: f64 = 0.20;
/// Descriptions below this roll are brief; the rest get a bullet list.
const BRIEF_DESCRIPTION_CUTOFF: f64 = 0.70;

const ENGINEERING_TASKS: &[&str] = &[
    "Implement user authentication",
    "Fix bug in payment processing",
    "Refactor database queries",
    "Add API endpoint for user profiles",
    "Update documentation",
    "Write unit tests for auth module",
    "Optimize database indexes",
    "Deploy staging environment",
];

const MARKETING_TASKS: &[&str] = &[
    "Create social media campaign",
    "Write blog post about product launch",
    "Design email newsletter template",
    "Analyze website analytics",
    "Update product marketing page",
    "Plan Q2 marketing strategy",
    "Coordinate with PR agency",
];

const OPERATIONS_TASKS: &[&str] = &[
    "Update vendor contracts",
    "Review security compliance",
    "Onboard new team member",
    "Schedule team meeting",
    "Update process documentation",
    "Review budget allocation",
];

const COMMENTS: &[&str] = &[
    "Looks good! Starting on this now.",
    "Any updates on this?",
    "I've run into a blocker - can we sync?",
    "This is done and ready for review.",
    "Found a related issue, linking it here.",
    "Can we prioritize this?",
    "Great progress so far!",
];

const ENGINEERING_PROJECTS: &[&str] = &[
    "Q1 2024 Product Roadmap",
    "API Migration Project",
    "Mobile App Redesign",
    "Infrastructure Modernization",
    "Security Audit 2024",
    "Performance Optimization",
    "Feature: User Dashboard",
    "Bug Fix Sprint Q1",
    "Database Migration",
    "CI/CD Pipeline Improvements",
];

const MARKETING_PROJECTS: &[&str] = &[
    "Q2 Product Launch Campaign",
    "Content Marketing Strategy",
    "Social Media Q1 2024",
    "Brand Awareness Campaign",
    "Customer Acquisition Q2",
    "Email Marketing Automation",
    "Website Redesign Project",
    "SEO Optimization 2024",
    "Event Marketing: Conference Q2",
];

const OPERATIONS_PROJECTS: &[&str] = &[
    "Q1 Team Planning",
    "Process Improvement Initiative",
    "Vendor Management 2024",
    "Compliance Audit Q1",
    "Team Onboarding Process",
    "Budget Planning 2024",
    "Facilities Management",
    "IT Infrastructure Upgrade",
];

/// Project name pool for a project type.
pub fn project_name_templates(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Engineering => ENGINEERING_PROJECTS,
        ProjectType::Marketing => MARKETING_PROJECTS,
        ProjectType::Operations => OPERATIONS_PROJECTS,
    }
}

fn task_name_templates(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Engineering => ENGINEERING_TASKS,
        ProjectType::Marketing => MARKETING_TASKS,
        ProjectType::Operations => OPERATIONS_TASKS,
    }
}

/// Deterministic text drawn from fixed pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateText;

impl TemplateText {
    pub fn new() -> Self {
        Self
    }

    /// Draws the pool index a task name for `project_type` is taken from.
    pub(crate) fn draw_task_name_index(project_type: ProjectType, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..task_name_templates(project_type).len())
    }

    pub(crate) fn task_name_for_index(project_type: ProjectType, index: usize) -> String {
        let pool = task_name_templates(project_type);
        pool[index % pool.len()].to_string()
    }

    /// Draws the pool index a comment is taken from.
    pub(crate) fn draw_comment_index(rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..COMMENTS.len())
    }

    pub(crate) fn comment_for_index(index: usize) -> String {
        COMMENTS[index % COMMENTS.len()].to_string()
    }

    /// Renders a description for an already-drawn detail roll.
    pub(crate) fn description_for_roll(task_name: &str, roll: f64) -> String {
        let subject = task_name.to_lowercase();
        if roll < EMPTY_DESCRIPTION_RATE {
            String::new()
        } else if roll < BRIEF_DESCRIPTION_CUTOFF {
            format!(
                "This task involves working on {subject}. Please ensure all requirements are met."
            )
        } else {
            format!(
                "This task involves {subject}.\n\n\
                 Key requirements:\n\
                 - Review current implementation\n\
                 - Make necessary changes\n\
                 - Test thoroughly\n\
                 - Update documentation as needed"
            )
        }
    }
}

impl TextGenerator for TemplateText {
    fn task_name(&self, project_type: ProjectType, rng: &mut dyn RngCore) -> String {
        let index = Self::draw_task_name_index(project_type, rng);
        Self::task_name_for_index(project_type, index)
    }

    fn task_description(
        &self,
        task_name: &str,
        _project_type: ProjectType,
        rng: &mut dyn RngCore,
    ) -> String {
        let roll: f64 = rng.r#gen();
        Self::description_for_roll(task_name, roll)
    }

    fn comment(
        &self,
        _task_name: &str,
        _project_type: ProjectType,
        rng: &mut dyn RngCore,
    ) -> String {
        Self::comment_for_index(Self::draw_comment_index(rng))
    }
}
