//! Task and subtask generation.
//!
//! Tasks are generated per project with weekday-skewed creation times, a
//! project-level completion rate, and due and completion dates drawn from
//! the policies below. Subtasks hang off a sample of the top-level tasks and
//! inherit most of their parent's attributes.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

use super::project::{GeneratedProject, GeneratedSection};
use super::team::TeamRoster;
use super::user::GeneratedUser;
use crate::config::RunWindow;
use crate::ids::generate_id;
use crate::models::{Priority, ProjectType};
use crate::temporal::{categorical, cycle_time, is_weekend, weekday_skewed_series};
use crate::text::TextGenerator;

/// Generated task (or subtask) data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTask {
    pub id: Uuid,
    pub project_id: Uuid,
    pub section_id: Uuid,
    /// Set for subtasks only.
    pub parent_task_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub assignee_id: Option<Uuid>,
    /// Due moment; persisted as a calendar date.
    pub due_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub completed: bool,
    pub completed_at: Option<OffsetDateTime>,
    pub created_by: Option<Uuid>,
    pub priority: Priority,
    /// Type of the owning project. Not persisted.
    pub project_type: ProjectType,
}

impl GeneratedTask {
    pub fn due_date(&self) -> Option<Date> {
        self.due_at.map(|due| due.date())
    }

    pub fn is_subtask(&self) -> bool {
        self.parent_task_id.is_some()
    }
}

/// Configuration for task generation.
#[derive(Debug, Clone)]
pub struct TaskGenConfig {
    /// Mean number of top-level tasks per project.
    pub tasks_per_project: usize,
    /// Weights for To Do, In Progress, In Review, Done.
    pub section_weights: [f64; 4],
    pub unassigned_probability: f64,
    /// Weights aligned with [`Priority::ALL`].
    pub priority_weights: [f64; 4],
    /// Share of top-level tasks that get subtasks.
    pub subtask_ratio: f64,
    /// Inclusive number of subtasks per parent.
    pub subtasks_per_parent: (usize, usize),
}

impl Default for TaskGenConfig {
    fn default() -> Self {
        Self {
            tasks_per_project: 30,
            section_weights: [0.35, 0.40, 0.15, 0.10],
            unassigned_probability: 0.15,
            priority_weights: [0.20, 0.60, 0.15, 0.05],
            subtask_ratio: 0.20,
            subtasks_per_parent: (2, 5),
        }
    }
}

const SUBTASK_VERBS: &[&str] = &[
    "Review",
    "Test",
    "Document",
    "Design",
    "Implement",
    "Refactor",
    "Update",
    "Finalize",
];

/// Draws a due date for a task created at `created_at`.
///
/// One roll picks the horizon: 10% none, 25% within a week, 40% within a
/// month, 20% one to three months out, 5% already overdue. The result is
/// clamped to `end` and, 85% of the time, walked back off a weekend.
pub fn due_date_policy(
    created_at: OffsetDateTime,
    end: OffsetDateTime,
    rng: &mut impl Rng,
) -> Option<OffsetDateTime> {
    let roll: f64 = rng.r#gen();
    let days_ahead: i64 = if roll < 0.10 {
        return None;
    } else if roll < 0.35 {
        rng.gen_range(1..=7)
    } else if roll < 0.75 {
        rng.gen_range(8..=30)
    } else if roll < 0.95 {
        rng.gen_range(31..=90)
    } else {
        rng.gen_range(-14..=-1)
    };

    let mut due = created_at + Duration::days(days_ahead);
    if due > end {
        due = end;
    } else if due < created_at - Duration::days(30) {
        due = created_at + Duration::days(1);
    }

    if rng.r#gen::<f64>() < 0.85 {
        while is_weekend(due) {
            due -= Duration::days(1);
        }
    }

    Some(due)
}

/// Draws a completion timestamp, or `None` for open tasks.
///
/// Starts from a log-normal cycle time after creation. When a due date exists,
/// 70% of completions land near it instead (three days early to a week late).
/// Either way the result is kept within `[created_at + 1 day, end]`, with
/// `end` winning when the two conflict.
pub fn completion_date_policy(
    created_at: OffsetDateTime,
    due_at: Option<OffsetDateTime>,
    completed: bool,
    end: OffsetDateTime,
    rng: &mut impl Rng,
) -> Option<OffsetDateTime> {
    if !completed {
        return None;
    }

    let earliest = created_at + Duration::days(1);
    let clamp = |ts: OffsetDateTime| ts.max(earliest).min(end);

    let mut completed_at = clamp(created_at + Duration::days(cycle_time(rng)));

    if let Some(due) = due_at
        && rng.r#gen::<f64>() < 0.7
    {
        let variance: i64 = rng.gen_range(-3..=7);
        completed_at = clamp(due + Duration::days(variance));
    }

    Some(completed_at)
}

/// Generates tasks and subtasks.
pub struct TaskGenerator {
    config: TaskGenConfig,
}

impl TaskGenerator {
    /// Creates a new task generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: TaskGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: TaskGenConfig) -> Self {
        Self { config }
    }

    /// Generates top-level tasks for every project that has sections.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_tasks(
        &self,
        projects: &[GeneratedProject],
        sections: &[GeneratedSection],
        users: &[GeneratedUser],
        roster: &TeamRoster,
        window: RunWindow,
        text: &dyn TextGenerator,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTask> {
        let mut sections_by_project: HashMap<Uuid, Vec<&GeneratedSection>> = HashMap::new();
        for section in sections {
            sections_by_project
                .entry(section.project_id)
                .or_default()
                .push(section);
        }

        let mut tasks = Vec::new();
        let mean = self.config.tasks_per_project as f64;
        let min_tasks = (mean * 0.7) as usize;
        let max_tasks = (mean * 1.3) as usize;

        for project in projects {
            let Some(project_sections) = sections_by_project.get(&project.id) else {
                continue;
            };
            if project_sections.is_empty() {
                continue;
            }

            let count = rng.gen_range(min_tasks..=max_tasks);
            let creation_times = weekday_skewed_series(
                project.created_at.max(window.start),
                window.end,
                count,
                rng,
            );
            let completion_rate = completion_rate(project, rng);
            let members = roster.get(&project.team_id).map(Vec::as_slice).unwrap_or(&[]);

            for created_at in creation_times {
                tasks.push(self.generate_single_task(
                    project,
                    project_sections,
                    members,
                    users,
                    created_at,
                    completion_rate,
                    window,
                    text,
                    rng,
                ));
            }
        }

        tasks
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_single_task(
        &self,
        project: &GeneratedProject,
        sections: &[&GeneratedSection],
        members: &[Uuid],
        users: &[GeneratedUser],
        created_at: OffsetDateTime,
        completion_rate: f64,
        window: RunWindow,
        text: &dyn TextGenerator,
        rng: &mut impl Rng,
    ) -> GeneratedTask {
        let name = text.task_name(project.project_type, rng);
        let description = text.task_description(&name, project.project_type, rng);

        let section_id = if sections.len() >= self.config.section_weights.len() {
            sections[categorical(&self.config.section_weights, rng)].id
        } else {
            sections[rng.gen_range(0..sections.len())].id
        };

        let assignee_id = if rng.r#gen::<f64>() >= self.config.unassigned_probability {
            members.choose(rng).copied()
        } else {
            None
        };

        let due_at = due_date_policy(created_at, window.end, rng);
        let completed = rng.r#gen::<f64>() < completion_rate;
        let completed_at = completion_date_policy(created_at, due_at, completed, window.end, rng);
        let priority = Priority::ALL[categorical(&self.config.priority_weights, rng)];
        let created_by = users.choose(rng).map(|u| u.id);

        GeneratedTask {
            id: generate_id(rng),
            project_id: project.id,
            section_id,
            parent_task_id: None,
            name,
            description,
            assignee_id,
            due_at,
            created_at,
            completed,
            completed_at,
            created_by,
            priority,
            project_type: project.project_type,
        }
    }

    /// Generates subtasks under a sample of `tasks`.
    ///
    /// Subtasks share their parent's project, section, assignee, due date,
    /// creator, and priority. Their completion is not tied to the due date.
    pub fn generate_subtasks(
        &self,
        tasks: &[GeneratedTask],
        window: RunWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTask> {
        let parent_count = ((tasks.len() as f64 * self.config.subtask_ratio) as usize).min(tasks.len());
        let (min, max) = self.config.subtasks_per_parent;
        let mut subtasks = Vec::new();

        for parent in tasks.choose_multiple(rng, parent_count) {
            let count = rng.gen_range(min..=max);

            for _ in 0..count {
                let verb = SUBTASK_VERBS[rng.gen_range(0..SUBTASK_VERBS.len())];
                let name = format!("{verb} {}", parent.name.to_lowercase());

                let created_at =
                    (parent.created_at + Duration::days(rng.gen_range(0..=5))).min(window.end);
                let completion_chance = if parent.completed { 0.7 } else { 0.3 };
                let completed = rng.r#gen::<f64>() < completion_chance;
                let completed_at = completed.then(|| {
                    (created_at + Duration::days(rng.gen_range(1..=7))).min(window.end)
                });

                subtasks.push(GeneratedTask {
                    id: generate_id(rng),
                    project_id: parent.project_id,
                    section_id: parent.section_id,
                    parent_task_id: Some(parent.id),
                    name,
                    description: String::new(),
                    assignee_id: parent.assignee_id,
                    due_at: parent.due_at,
                    created_at,
                    completed,
                    completed_at,
                    created_by: parent.created_by,
                    priority: parent.priority,
                    project_type: parent.project_type,
                });
            }
        }

        subtasks
    }
}

impl Default for TaskGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Share of a project's tasks that end up completed.
fn completion_rate(project: &GeneratedProject, rng: &mut impl Rng) -> f64 {
    let name = project.name.to_lowercase();
    if name.contains("sprint") || name.contains("bug") {
        rng.gen_range(0.70..0.85)
    } else if project.project_type == ProjectType::Engineering {
        rng.gen_range(0.65..0.75)
    } else {
        rng.gen_range(0.40..0.50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::project::ProjectGenerator;
    use crate::generators::team::TeamGenerator;
    use crate::generators::user::UserGenerator;
    use crate::text::TemplateText;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use time::macros::datetime;

    fn window() -> RunWindow {
        RunWindow::new(
            datetime!(2024-01-01 0:00 UTC),
            datetime!(2024-07-01 0:00 UTC),
        )
    }

    struct Fixture {
        users: Vec<GeneratedUser>,
        roster: TeamRoster,
        projects: Vec<GeneratedProject>,
        sections: Vec<GeneratedSection>,
    }

    fn fixture(rng: &mut StdRng) -> Fixture {
        let users = UserGenerator::new().generate_batch(40, Uuid::nil(), window(), rng);
        let team_gen = TeamGenerator::new();
        let teams = team_gen.generate_teams(4, Uuid::nil(), window(), rng);
        let (_, roster) = team_gen.generate_memberships(&teams, &users, rng);
        let (projects, sections) =
            ProjectGenerator::new().generate_projects(8, &teams, &users, window(), rng);
        Fixture {
            users,
            roster,
            projects,
            sections,
        }
    }

    fn generate(rng: &mut StdRng) -> (Fixture, Vec<GeneratedTask>) {
        let fixture = fixture(rng);
        let tasks = TaskGenerator::new().generate_tasks(
            &fixture.projects,
            &fixture.sections,
            &fixture.users,
            &fixture.roster,
            window(),
            &TemplateText::new(),
            rng,
        );
        (fixture, tasks)
    }

    #[test]
    fn test_generate_tasks() {
        let mut rng = StdRng::seed_from_u64(42);
        let (fixture, tasks) = generate(&mut rng);

        for project in &fixture.projects {
            let count = tasks.iter().filter(|t| t.project_id == project.id).count();
            assert!((21..=39).contains(&count), "{count} tasks");
        }

        for task in &tasks {
            assert_eq!(task.completed, task.completed_at.is_some());
            assert!(task.parent_task_id.is_none());
            assert!(window().contains(task.created_at));

            let project = fixture.projects.iter().find(|p| p.id == task.project_id).unwrap();
            assert!(task.created_at >= project.created_at);
            assert_eq!(task.project_type, project.project_type);

            let section = fixture.sections.iter().find(|s| s.id == task.section_id).unwrap();
            assert_eq!(section.project_id, project.id);

            if let Some(assignee) = task.assignee_id {
                assert!(fixture.roster[&project.team_id].contains(&assignee));
            }
            if let Some(done) = task.completed_at {
                assert!(done >= task.created_at && done <= window().end);
            }
            if let Some(due) = task.due_at {
                assert!(due <= window().end);
            }
        }
    }

    #[test]
    fn test_unstaffed_team_leaves_tasks_unassigned() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fixture = fixture(&mut rng);
        for members in fixture.roster.values_mut() {
            members.clear();
        }

        let tasks = TaskGenerator::new().generate_tasks(
            &fixture.projects,
            &fixture.sections,
            &fixture.users,
            &fixture.roster,
            window(),
            &TemplateText::new(),
            &mut rng,
        );

        assert!(!tasks.is_empty());
        assert!(tasks.iter().all(|t| t.assignee_id.is_none()));
    }

    #[test]
    fn test_projects_without_sections_are_skipped() {
        let mut rng = StdRng::seed_from_u64(6);
        let fixture = fixture(&mut rng);
        let tasks = TaskGenerator::new().generate_tasks(
            &fixture.projects,
            &[],
            &fixture.users,
            &fixture.roster,
            window(),
            &TemplateText::new(),
            &mut rng,
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_generate_subtasks() {
        let mut rng = StdRng::seed_from_u64(7);
        let (_, tasks) = generate(&mut rng);
        let subtasks = TaskGenerator::new().generate_subtasks(&tasks, window(), &mut rng);

        let parents: HashSet<_> = subtasks.iter().filter_map(|s| s.parent_task_id).collect();
        assert_eq!(parents.len(), (tasks.len() as f64 * 0.2) as usize);
        assert!(subtasks.len() >= parents.len() * 2 && subtasks.len() <= parents.len() * 5);

        for subtask in &subtasks {
            let parent = tasks
                .iter()
                .find(|t| Some(t.id) == subtask.parent_task_id)
                .expect("subtask references a generated task");

            assert_eq!(subtask.project_id, parent.project_id);
            assert_eq!(subtask.section_id, parent.section_id);
            assert_eq!(subtask.assignee_id, parent.assignee_id);
            assert_eq!(subtask.due_at, parent.due_at);
            assert_eq!(subtask.priority, parent.priority);
            assert!(subtask.description.is_empty());
            assert!(subtask.name.ends_with(&parent.name.to_lowercase()));

            assert!(subtask.created_at >= parent.created_at);
            assert!(subtask.created_at <= window().end);
            assert_eq!(subtask.completed, subtask.completed_at.is_some());
            if let Some(done) = subtask.completed_at {
                assert!(done >= subtask.created_at && done <= window().end);
            }
        }
    }

    /// About 20k top-level tasks over the standard fixture.
    fn generate_many(rng: &mut StdRng) -> (Fixture, Vec<GeneratedTask>) {
        let fixture = fixture(rng);
        let generator = TaskGenerator::with_config(TaskGenConfig {
            tasks_per_project: 2_500,
            ..Default::default()
        });
        let tasks = generator.generate_tasks(
            &fixture.projects,
            &fixture.sections,
            &fixture.users,
            &fixture.roster,
            window(),
            &TemplateText::new(),
            rng,
        );
        (fixture, tasks)
    }

    fn share(count: usize, total: usize) -> f64 {
        count as f64 / total as f64
    }

    #[test]
    fn test_section_priority_and_assignment_shares() {
        let mut rng = StdRng::seed_from_u64(13);
        let (fixture, tasks) = generate_many(&mut rng);
        assert!(tasks.len() >= 14_000, "{} tasks", tasks.len());
        assert!(fixture.roster.values().all(|members| !members.is_empty()));

        let positions: HashMap<Uuid, i32> =
            fixture.sections.iter().map(|s| (s.id, s.position)).collect();
        let mut by_section = [0usize; 4];
        let mut by_priority = [0usize; 4];
        let mut unassigned = 0;
        for task in &tasks {
            by_section[positions[&task.section_id] as usize] += 1;
            let priority = Priority::ALL.iter().position(|p| *p == task.priority).unwrap();
            by_priority[priority] += 1;
            if task.assignee_id.is_none() {
                unassigned += 1;
            }
        }

        let config = TaskGenConfig::default();
        for (i, expected) in config.section_weights.iter().enumerate() {
            let got = share(by_section[i], tasks.len());
            assert!((got - expected).abs() < 0.015, "section {i}: {got}");
        }
        for (i, expected) in config.priority_weights.iter().enumerate() {
            let got = share(by_priority[i], tasks.len());
            assert!((got - expected).abs() < 0.015, "{:?}: {got}", Priority::ALL[i]);
        }
        let got = share(unassigned, tasks.len());
        assert!((got - 0.15).abs() < 0.015, "unassigned: {got}");
    }

    #[test]
    fn test_due_dates_mostly_avoid_weekends() {
        let mut rng = StdRng::seed_from_u64(14);
        let created = datetime!(2024-02-05 9:00 UTC);
        let end = datetime!(2025-01-01 0:00 UTC);

        let dues: Vec<_> = (0..20_000)
            .filter_map(|_| due_date_policy(created, end, &mut rng))
            .collect();
        let weekend = dues.iter().filter(|&&due| is_weekend(due)).count();

        // Roughly 2/7 of raw dates fall on a weekend and 15% of those stay.
        let got = share(weekend, dues.len());
        assert!((0.03..0.06).contains(&got), "weekend share: {got}");
    }

    #[test]
    fn test_subtask_completion_follows_parent() {
        let mut rng = StdRng::seed_from_u64(15);
        let (_, tasks) = generate(&mut rng);
        let generator = TaskGenerator::with_config(TaskGenConfig {
            subtask_ratio: 1.0,
            ..Default::default()
        });

        for (parent_done, expected) in [(true, 0.7), (false, 0.3)] {
            let parents: Vec<GeneratedTask> = tasks
                .iter()
                .cloned()
                .map(|mut task| {
                    task.completed = parent_done;
                    task.completed_at = parent_done.then(|| task.created_at + Duration::days(1));
                    task
                })
                .collect();

            let subtasks = generator.generate_subtasks(&parents, window(), &mut rng);
            assert!(subtasks.len() >= parents.len() * 2);

            let done = subtasks.iter().filter(|s| s.completed).count();
            let got = share(done, subtasks.len());
            assert!((got - expected).abs() < 0.05, "parent done {parent_done}: {got}");
        }
    }

    #[test]
    fn test_due_date_distribution() {
        let mut rng = StdRng::seed_from_u64(8);
        let created = datetime!(2024-02-05 9:00 UTC);
        let end = datetime!(2025-01-01 0:00 UTC);
        let trials = 20_000;

        let mut none = 0;
        let mut week = 0;
        let mut overdue = 0;
        for _ in 0..trials {
            match due_date_policy(created, end, &mut rng) {
                None => none += 1,
                Some(due) if due < created => overdue += 1,
                Some(due) if due <= created + Duration::days(7) => week += 1,
                Some(_) => {}
            }
        }

        let share = |n: i32| n as f64 / trials as f64;
        assert!((share(none) - 0.10).abs() < 0.015, "none: {}", share(none));
        assert!((0.035..0.065).contains(&share(overdue)), "overdue: {}", share(overdue));
        assert!((0.23..0.27).contains(&share(week)), "week: {}", share(week));
    }

    #[test]
    fn test_due_date_clamped_to_window_end() {
        let mut rng = StdRng::seed_from_u64(9);
        let end = datetime!(2024-01-10 0:00 UTC);
        let created = datetime!(2024-01-09 0:00 UTC);

        for _ in 0..500 {
            if let Some(due) = due_date_policy(created, end, &mut rng) {
                assert!(due <= end);
            }
        }
    }

    #[test]
    fn test_completion_policy_bounds() {
        let mut rng = StdRng::seed_from_u64(10);
        let created = datetime!(2024-03-01 0:00 UTC);
        let end = datetime!(2024-04-01 0:00 UTC);
        let due = Some(datetime!(2024-03-02 0:00 UTC));

        assert_eq!(completion_date_policy(created, due, false, end, &mut rng), None);

        for _ in 0..1_000 {
            let done = completion_date_policy(created, due, true, end, &mut rng).unwrap();
            assert!(done >= created + Duration::days(1));
            assert!(done <= end);
        }
    }

    #[test]
    fn test_completion_policy_end_wins() {
        let mut rng = StdRng::seed_from_u64(11);
        let end = datetime!(2024-04-01 0:00 UTC);
        let created = end - Duration::hours(6);

        let done = completion_date_policy(created, None, true, end, &mut rng).unwrap();
        assert_eq!(done, end);
    }

    #[test]
    fn test_completion_rate_bands() {
        let mut rng = StdRng::seed_from_u64(12);
        let (fixture, _) = generate(&mut rng);
        let mut project = fixture.projects[0].clone();

        project.name = "Bug Bash".to_string();
        project.project_type = ProjectType::Marketing;
        let rate = completion_rate(&project, &mut rng);
        assert!((0.70..0.85).contains(&rate));

        project.name = "Platform".to_string();
        project.project_type = ProjectType::Engineering;
        let rate = completion_rate(&project, &mut rng);
        assert!((0.65..0.75).contains(&rate));

        project.project_type = ProjectType::Operations;
        let rate = completion_rate(&project, &mut rng);
        assert!((0.40..0.50).contains(&rate));
    }
}
