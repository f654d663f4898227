//! Team and membership generation.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use time::OffsetDateTime;
use uuid::Uuid;

use super::user::GeneratedUser;
use crate::config::RunWindow;
use crate::ids::generate_id;
use crate::models::MembershipRole;
use crate::temporal::{categorical, uniform_between};

/// Team members keyed by team id, in membership order.
pub type TeamRoster = HashMap<Uuid, Vec<Uuid>>;

/// Generated team data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTeam {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Generated team membership data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMembership {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub joined_at: OffsetDateTime,
}

/// Configuration for team generation.
#[derive(Debug, Clone)]
pub struct TeamGenConfig {
    /// Inclusive member-count buckets with their weights.
    pub size_buckets: Vec<((usize, usize), f64)>,
    /// Probability that a member is an admin.
    pub admin_probability: f64,
}

impl Default for TeamGenConfig {
    fn default() -> Self {
        Self {
            size_buckets: vec![((3, 7), 0.40), ((8, 15), 0.40), ((16, 30), 0.20)],
            admin_probability: 0.10,
        }
    }
}

const TEAM_NAMES: &[&str] = &[
    "Product Engineering",
    "Platform Team",
    "Frontend Team",
    "Backend Services",
    "Infrastructure",
    "Data Engineering",
    "Mobile Engineering",
    "QA & Testing",
    "Product Marketing",
    "Growth Marketing",
    "Content Marketing",
    "Brand Marketing",
    "Demand Generation",
    "Sales Operations",
    "Customer Success",
    "Support Engineering",
    "Product Management",
    "UX Design",
    "DevOps",
    "Security",
    "Finance",
    "People Operations",
    "Legal",
    "Business Operations",
];

/// Generates teams and their memberships.
pub struct TeamGenerator {
    config: TeamGenConfig,
}

impl TeamGenerator {
    /// Creates a new team generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: TeamGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: TeamGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` teams with distinct names.
    ///
    /// Names come from a fixed vocabulary; once it is exhausted the rest are
    /// numbered `Team 1`, `Team 2`, ...
    pub fn generate_teams(
        &self,
        count: usize,
        organization_id: Uuid,
        window: RunWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTeam> {
        let mut names: Vec<String> = TEAM_NAMES
            .choose_multiple(rng, count.min(TEAM_NAMES.len()))
            .map(|name| name.to_string())
            .collect();
        names.extend((1..=count.saturating_sub(TEAM_NAMES.len())).map(|i| format!("Team {i}")));

        names
            .into_iter()
            .map(|name| GeneratedTeam {
                id: generate_id(rng),
                organization_id,
                description: format!("{name} team responsible for core initiatives."),
                name,
                created_at: uniform_between(window.start, window.end, rng),
            })
            .collect()
    }

    /// Generates memberships for every team.
    ///
    /// Each team draws a size bucket, then that many distinct users (capped
    /// by the user count). Members join when their account was created.
    pub fn generate_memberships(
        &self,
        teams: &[GeneratedTeam],
        users: &[GeneratedUser],
        rng: &mut impl Rng,
    ) -> (Vec<GeneratedMembership>, TeamRoster) {
        let weights: Vec<f64> = self.config.size_buckets.iter().map(|(_, w)| *w).collect();
        let mut memberships = Vec::new();
        let mut roster = TeamRoster::with_capacity(teams.len());

        for team in teams {
            let members = roster.entry(team.id).or_default();
            if users.is_empty() {
                continue;
            }

            let (min, max) = self.config.size_buckets[categorical(&weights, rng)].0;
            let size = rng.gen_range(min..=max).min(users.len());

            for user in users.choose_multiple(rng, size) {
                let role = if rng.r#gen::<f64>() < self.config.admin_probability {
                    MembershipRole::Admin
                } else {
                    MembershipRole::Member
                };

                memberships.push(GeneratedMembership {
                    id: generate_id(rng),
                    team_id: team.id,
                    user_id: user.id,
                    role,
                    joined_at: user.created_at,
                });
                members.push(user.id);
            }
        }

        (memberships, roster)
    }
}

impl Default for TeamGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::user::UserGenerator;
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

    #[test]
    fn test_generate_teams() {
        let mut rng = StdRng::seed_from_u64(42);
        let teams = TeamGenerator::new().generate_teams(5, Uuid::nil(), window(), &mut rng);

        assert_eq!(teams.len(), 5);
        for team in &teams {
            assert!(TEAM_NAMES.contains(&team.name.as_str()));
            assert_eq!(
                team.description,
                format!("{} team responsible for core initiatives.", team.name)
            );
            assert!(team.created_at >= window().start && team.created_at < window().end);
        }

        let names: HashSet<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_numbered_fillers_past_vocabulary() {
        let mut rng = StdRng::seed_from_u64(1);
        let teams = TeamGenerator::new().generate_teams(30, Uuid::nil(), window(), &mut rng);

        assert_eq!(teams.len(), 30);
        let names: HashSet<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 30);
        for i in 1..=6 {
            assert!(names.contains(format!("Team {i}").as_str()));
        }
    }

    #[test]
    fn test_generate_memberships() {
        let mut rng = StdRng::seed_from_u64(2);
        let team_gen = TeamGenerator::new();
        let users = UserGenerator::new().generate_batch(100, Uuid::nil(), window(), &mut rng);
        let teams = team_gen.generate_teams(10, Uuid::nil(), window(), &mut rng);
        let (memberships, roster) = team_gen.generate_memberships(&teams, &users, &mut rng);

        assert_eq!(roster.len(), 10);
        for team in &teams {
            let members = &roster[&team.id];
            assert!((3..=30).contains(&members.len()));

            let distinct: HashSet<_> = members.iter().collect();
            assert_eq!(distinct.len(), members.len(), "duplicate member in a team");
        }

        assert_eq!(memberships.len(), roster.values().map(Vec::len).sum::<usize>());
        for membership in &memberships {
            let user = users.iter().find(|u| u.id == membership.user_id).unwrap();
            assert_eq!(membership.joined_at, user.created_at);
        }
    }

    #[test]
    fn test_team_size_capped_by_user_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let team_gen = TeamGenerator::new();
        let users = UserGenerator::new().generate_batch(2, Uuid::nil(), window(), &mut rng);
        let teams = team_gen.generate_teams(4, Uuid::nil(), window(), &mut rng);
        let (memberships, roster) = team_gen.generate_memberships(&teams, &users, &mut rng);

        assert_eq!(memberships.len(), 8);
        assert!(roster.values().all(|members| members.len() == 2));
    }

    #[test]
    fn test_no_users_yields_empty_rosters() {
        let mut rng = StdRng::seed_from_u64(4);
        let team_gen = TeamGenerator::new();
        let teams = team_gen.generate_teams(3, Uuid::nil(), window(), &mut rng);
        let (memberships, roster) = team_gen.generate_memberships(&teams, &[], &mut rng);

        assert!(memberships.is_empty());
        assert!(roster.values().all(Vec::is_empty));
    }
}
