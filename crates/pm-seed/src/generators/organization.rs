//! Organization generation.

use rand::Rng;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ids::generate_id;

/// Generated organization data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOrganization {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub created_at: OffsetDateTime,
}

/// Generates the single organization that owns a run's data.
pub struct OrganizationGenerator {
    name: String,
    domain: String,
}

impl OrganizationGenerator {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Generates the organization, founded at the start of the run.
    pub fn generate(&self, created_at: OffsetDateTime, rng: &mut impl Rng) -> GeneratedOrganization {
        GeneratedOrganization {
            id: generate_id(rng),
            name: self.name.clone(),
            domain: self.domain.clone(),
            created_at,
        }
    }
}

impl Default for OrganizationGenerator {
    fn default() -> Self {
        Self::new("Acme Corporation", "acme.com")
    }
}
