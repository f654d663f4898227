//! Identifier allocation.
//!
//! Ids are 128 random bits drawn from the run's RNG, so a fixed seed
//! reproduces every identifier. They are persisted as 32 lowercase hex
//! characters without delimiters.

use rand::Rng;
use uuid::{Builder, Uuid};

/// Allocates a new identifier from the run's random stream.
pub fn generate_id(rng: &mut impl Rng) -> Uuid {
    Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

/// Hyphen-free hex form used for storage.
pub fn to_hex(id: Uuid) -> String {
    id.simple().to_string()
}
