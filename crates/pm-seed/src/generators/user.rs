//! User generation with departments and roles.

use std::collections::HashSet;

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::RunWindow;
use crate::ids::generate_id;
use crate::models::Department;
use crate::temporal::{categorical, uniform_between};

/// Generated user data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUser {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub department: Department,
    pub created_at: OffsetDateTime,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Email domain, normally the organization's.
    pub domain: String,
    /// Relative weights aligned with [`Department::ALL`].
    pub department_weights: [f64; 7],
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            domain: "acme.com".to_string(),
            // Engineering-heavy SaaS headcount mix
            department_weights: [0.40, 0.25, 0.20, 0.15, 0.10, 0.08, 0.07],
        }
    }
}

/// Generates realistic user data.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` users created across the window, oldest first.
    ///
    /// Emails are unique within the batch.
    pub fn generate_batch(
        &self,
        count: usize,
        organization_id: Uuid,
        window: RunWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedUser> {
        let mut creation_times: Vec<OffsetDateTime> = (0..count)
            .map(|_| uniform_between(window.start, window.end, rng))
            .collect();
        creation_times.sort();

        let mut used_emails = HashSet::with_capacity(count);

        creation_times
            .into_iter()
            .map(|created_at| {
                let name: String = Name().fake_with_rng(rng);
                let department =
                    Department::ALL[categorical(&self.config.department_weights, rng)];
                let roles = department.roles();
                let role = roles[rng.gen_range(0..roles.len())].to_string();
                let email = self.unique_email(&name, &mut used_emails);

                GeneratedUser {
                    id: generate_id(rng),
                    organization_id,
                    email,
                    name,
                    role,
                    department,
                    created_at,
                }
            })
            .collect()
    }

    /// Builds `first.last@domain`, adding 2, 3, ... until unused.
    fn unique_email(&self, name: &str, used: &mut HashSet<String>) -> String {
        let local = email_local_part(name);
        let domain = &self.config.domain;

        let mut email = format!("{local}@{domain}");
        let mut suffix = 1;
        while used.contains(&email) {
            suffix += 1;
            email = format!("{local}{suffix}@{domain}");
        }

        used.insert(email.clone());
        email
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased `first.last` from a display name, punctuation removed.
fn email_local_part(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        [] => "user".to_string(),
        [only] => only.clone(),
        [first, .., last] => format!("{first}.{last}"),
    }
}
