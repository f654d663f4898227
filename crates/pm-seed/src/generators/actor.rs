//! Picks which user acts on an entity (comment author, attachment uploader).

use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use super::user::GeneratedUser;

/// A preferred actor and the probability that it is chosen.
#[derive(Debug, Clone, Copy)]
pub struct ActorRole {
    pub candidate: Option<Uuid>,
    pub probability: f64,
}

impl ActorRole {
    pub fn new(candidate: Option<Uuid>, probability: f64) -> Self {
        Self {
            candidate,
            probability,
        }
    }
}

/// All users of a run, indexed for random picks and membership checks.
#[derive(Debug, Clone, Default)]
pub struct UserPool {
    ids: Vec<Uuid>,
    known: HashSet<Uuid>,
}

impl UserPool {
    pub fn new(ids: Vec<Uuid>) -> Self {
        let known = ids.iter().copied().collect();
        Self { ids, known }
    }

    pub fn from_users(users: &[GeneratedUser]) -> Self {
        Self::new(users.iter().map(|u| u.id).collect())
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.known.contains(id)
    }

    /// Uniformly random user, or `None` for an empty pool.
    pub fn random(&self, rng: &mut impl Rng) -> Option<Uuid> {
        if self.ids.is_empty() {
            return None;
        }
        Some(self.ids[rng.gen_range(0..self.ids.len())])
    }

    /// Resolves the acting user from roles tried in order.
    ///
    /// Each role gets an independent roll against its probability. When a
    /// role fires, its candidate is returned if it is a known user; a missing
    /// or unknown candidate falls back to a random user. If no role fires the
    /// result is a random user.
    pub fn resolve(&self, roles: &[ActorRole], rng: &mut impl Rng) -> Option<Uuid> {
        for role in roles {
            if rng.r#gen::<f64>() < role.probability {
                return match role.candidate {
                    Some(id) if self.contains(&id) => Some(id),
                    _ => self.random(rng),
                };
            }
        }
        self.random(rng)
    }
}
