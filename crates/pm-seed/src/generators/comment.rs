//! Task comment generation.

use rand::Rng;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::actor::{ActorRole, UserPool};
use super::task::GeneratedTask;
use crate::config::RunWindow;
use crate::ids::generate_id;
use crate::temporal::{categorical, days_until, decayed_offset};
use crate::text::TextGenerator;

/// Generated comment data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedComment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// Configuration for comment generation.
#[derive(Debug, Clone)]
pub struct CommentGenConfig {
    /// Weights for 0..=5 comments on a task.
    pub count_weights: Vec<f64>,
    /// Rate of the exponential gap between consecutive comments (per day).
    pub decay_rate: f64,
    pub assignee_probability: f64,
    pub creator_probability: f64,
}

impl Default for CommentGenConfig {
    fn default() -> Self {
        Self {
            count_weights: vec![0.30, 0.35, 0.20, 0.10, 0.04, 0.01],
            decay_rate: 0.3,
            assignee_probability: 0.6,
            creator_probability: 0.3,
        }
    }
}

/// Generates comment threads on tasks.
pub struct CommentGenerator {
    config: CommentGenConfig,
}

impl CommentGenerator {
    /// Creates a new comment generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: CommentGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: CommentGenConfig) -> Self {
        Self { config }
    }

    /// Generates comments for each task, in thread order.
    ///
    /// Comments are authored mostly by the assignee, then the creator, and
    /// otherwise by any user. Nothing is generated when `users` is empty.
    pub fn generate_comments<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a GeneratedTask>,
        users: &UserPool,
        window: RunWindow,
        text: &dyn TextGenerator,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedComment> {
        let mut comments = Vec::new();

        for task in tasks {
            let count = categorical(&self.config.count_weights, rng);
            let times = self.thread_times(task.created_at, window.end, count, rng);

            for created_at in times {
                let roles = [
                    ActorRole::new(task.assignee_id, self.config.assignee_probability),
                    ActorRole::new(task.created_by, self.config.creator_probability),
                ];
                let Some(user_id) = users.resolve(&roles, rng) else {
                    continue;
                };
                let body = text.comment(&task.name, task.project_type, rng);

                comments.push(GeneratedComment {
                    id: generate_id(rng),
                    task_id: task.id,
                    user_id,
                    text: body,
                    created_at,
                });
            }
        }

        comments
    }

    /// Sequential comment times starting at task creation.
    ///
    /// Each gap is a decayed offset capped at the whole days left in the run;
    /// the thread stops at the first time past `end`.
    fn thread_times(
        &self,
        task_created: OffsetDateTime,
        end: OffsetDateTime,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<OffsetDateTime> {
        let mut times = Vec::with_capacity(count);
        let mut current = task_created;

        for _ in 0..count {
            let offset = decayed_offset(self.config.decay_rate, rng)
                .min(days_until(current, end) as f64);
            let next = current + Duration::days(offset as i64);
            if next > end {
                break;
            }
            times.push(next);
            current = next;
        }

        times
    }
}

impl Default for CommentGenerator {
    fn default() -> Self {
        Self::new()
    }
}
