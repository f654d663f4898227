//! Organization tags and task-tag associations.

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use super::task::GeneratedTask;
use crate::ids::generate_id;
use crate::models::COLORS;
use crate::temporal::categorical;

/// Generated tag data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTag {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub color: String,
}

/// A tag applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratedTaskTag {
    pub task_id: Uuid,
    pub tag_id: Uuid,
}

const TAG_NAMES: &[&str] = &[
    "urgent",
    "blocked",
    "needs-review",
    "bug",
    "feature",
    "enhancement",
    "documentation",
    "refactor",
    "technical-debt",
    "design",
    "qa",
    "deployment",
    "on-hold",
    "client-request",
    "internal",
    "external",
    "security",
    "performance",
    "accessibility",
    "mobile",
    "web",
    "backend",
    "frontend",
    "api",
    "database",
    "infrastructure",
    "marketing",
    "sales",
    "customer-success",
    "ops",
    "finance",
    "q1-2024",
    "q2-2024",
    "q3-2024",
    "q4-2024",
    "high-priority",
    "low-priority",
    "stretch-goal",
    "mvp",
    "research",
    "experiment",
];

/// Weights for 0..=4 tags on a task.
const TAGS_PER_TASK_WEIGHTS: [f64; 5] = [0.30, 0.40, 0.20, 0.08, 0.02];

/// Generates tags and applies them to tasks.
#[derive(Debug, Default)]
pub struct TagGenerator;

impl TagGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates up to `count` distinct tags from the built-in vocabulary.
    pub fn generate_tags(
        &self,
        count: usize,
        organization_id: Uuid,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTag> {
        let names: Vec<&str> = TAG_NAMES
            .choose_multiple(rng, count.min(TAG_NAMES.len()))
            .copied()
            .collect();

        names
            .into_iter()
            .map(|name| GeneratedTag {
                id: generate_id(rng),
                organization_id,
                name: name.to_string(),
                color: COLORS[rng.gen_range(0..COLORS.len())].to_string(),
            })
            .collect()
    }

    /// Tags each task with zero to four distinct tags.
    pub fn generate_task_tags<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a GeneratedTask>,
        tags: &[GeneratedTag],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTaskTag> {
        let mut task_tags = Vec::new();

        for task in tasks {
            let count = categorical(&TAGS_PER_TASK_WEIGHTS, rng);
            if count == 0 || tags.is_empty() {
                continue;
            }

            task_tags.extend(
                tags.choose_multiple(rng, count.min(tags.len()))
                    .map(|tag| GeneratedTaskTag {
                        task_id: task.id,
                        tag_id: tag.id,
                    }),
            );
        }

        task_tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, ProjectType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use time::macros::datetime;

    fn task(rng: &mut StdRng) -> GeneratedTask {
        GeneratedTask {
            id: generate_id(rng),
            project_id: Uuid::nil(),
            section_id: Uuid::nil(),
            parent_task_id: None,
            name: "Write docs".to_string(),
            description: String::new(),
            assignee_id: None,
            due_at: None,
            created_at: datetime!(2024-01-02 0:00 UTC),
            completed: false,
            completed_at: None,
            created_by: None,
            priority: Priority::Normal,
            project_type: ProjectType::Engineering,
        }
    }

    #[test]
    fn test_generate_tags() {
        let mut rng = StdRng::seed_from_u64(42);
        let tags = TagGenerator::new().generate_tags(30, Uuid::nil(), &mut rng);

        assert_eq!(tags.len(), 30);
        let names: HashSet<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 30);
        assert!(tags.iter().all(|t| COLORS.contains(&t.color.as_str())));
    }

    #[test]
    fn test_tag_count_capped_by_vocabulary() {
        let mut rng = StdRng::seed_from_u64(1);
        let tags = TagGenerator::new().generate_tags(100, Uuid::nil(), &mut rng);
        assert_eq!(tags.len(), TAG_NAMES.len());
        assert_eq!(tags.len(), 41);
    }

    #[test]
    fn test_task_tags_distinct_per_task() {
        let mut rng = StdRng::seed_from_u64(2);
        let tag_gen = TagGenerator::new();
        let tags = tag_gen.generate_tags(10, Uuid::nil(), &mut rng);
        let tasks: Vec<_> = (0..500).map(|_| task(&mut rng)).collect();
        let task_tags = tag_gen.generate_task_tags(&tasks, &tags, &mut rng);

        let pairs: HashSet<_> = task_tags.iter().collect();
        assert_eq!(pairs.len(), task_tags.len());

        for task in &tasks {
            let n = task_tags.iter().filter(|tt| tt.task_id == task.id).count();
            assert!(n <= 4);
        }

        // Mean of the weighted counts is 1.12.
        let mean = task_tags.len() as f64 / tasks.len() as f64;
        assert!((0.95..1.3).contains(&mean), "mean tags per task: {mean}");
    }

    #[test]
    fn test_small_tag_pool_caps_selection() {
        let mut rng = StdRng::seed_from_u64(3);
        let tag_gen = TagGenerator::new();
        let tags = tag_gen.generate_tags(1, Uuid::nil(), &mut rng);
        let tasks: Vec<_> = (0..100).map(|_| task(&mut rng)).collect();
        let task_tags = tag_gen.generate_task_tags(&tasks, &tags, &mut rng);

        for task in &tasks {
            assert!(task_tags.iter().filter(|tt| tt.task_id == task.id).count() <= 1);
        }
    }
}
