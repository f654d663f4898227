//! Enumerated attributes shared by the entity generators.
//!
//! Each enum carries the string used in the persisted schema via `as_str()`.

use serde::{Deserialize, Serialize};

/// Color palette shared by projects and tags.
pub const COLORS: [&str; 8] = [
    "blue",
    "green",
    "orange",
    "red",
    "purple",
    "pink",
    "yellow",
    "turquoise",
];

/// Kind of work a project tracks. Drives naming, completion rates, file mix, and custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Engineering,
    Marketing,
    Operations,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [
        ProjectType::Engineering,
        ProjectType::Marketing,
        ProjectType::Operations,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Engineering => "engineering",
            ProjectType::Marketing => "marketing",
            ProjectType::Operations => "operations",
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Urgent,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

/// Role of a user within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Member,
    Admin,
}

impl MembershipRole {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
            MembershipRole::Admin => "admin",
        }
    }
}

/// Department a user works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Marketing,
    Operations,
    Sales,
    Product,
    Design,
    CustomerSuccess,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::Engineering,
        Department::Marketing,
        Department::Operations,
        Department::Sales,
        Department::Product,
        Department::Design,
        Department::CustomerSuccess,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Marketing => "Marketing",
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::Product => "Product",
            Department::Design => "Design",
            Department::CustomerSuccess => "Customer Success",
        }
    }

    /// Job titles available within the department.
    pub fn roles(&self) -> &'static [&'static str] {
        match self {
            Department::Engineering => &[
                "Software Engineer",
                "Senior Engineer",
                "Staff Engineer",
                "Engineering Manager",
                "Tech Lead",
            ],
            Department::Marketing => &[
                "Marketing Manager",
                "Content Manager",
                "Growth Marketing",
                "Brand Manager",
                "Marketing Analyst",
            ],
            Department::Operations => &[
                "Operations Manager",
                "Business Analyst",
                "Operations Coordinator",
                "VP Operations",
            ],
            Department::Sales => &[
                "Sales Representative",
                "Account Executive",
                "Sales Manager",
                "VP Sales",
            ],
            Department::Product => &[
                "Product Manager",
                "Senior Product Manager",
                "Product Lead",
            ],
            Department::Design => &["Product Designer", "UX Designer", "Design Lead"],
            Department::CustomerSuccess => &[
                "Customer Success Manager",
                "Support Engineer",
                "CS Lead",
            ],
        }
    }
}

/// Data type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Enum,
    Date,
    MultiEnum,
}

impl FieldType {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Enum => "enum",
            FieldType::Date => "date",
            FieldType::MultiEnum => "multi_enum",
        }
    }

    /// Whether definitions of this type carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Enum | FieldType::MultiEnum)
    }
}
