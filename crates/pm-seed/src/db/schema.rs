//! Table catalog mirroring `migrations/0001_schema.sql`.
//!
//! Tables are listed parents first, which is the order rows must be written
//! in and the reverse of the order they can be deleted in.

/// A column that must name an existing row of another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    /// Referenced table; references its single-column primary key.
    pub references: &'static str,
}

/// Keys and references of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub primary_key: &'static [&'static str],
    pub unique: &'static [&'static [&'static str]],
    pub foreign_keys: &'static [ForeignKey],
}

const fn fk(column: &'static str, references: &'static str) -> ForeignKey {
    ForeignKey { column, references }
}

pub const TABLES: &[TableSpec] = &[
    TableSpec {
        name: "organizations",
        primary_key: &["organization_id"],
        unique: &[],
        foreign_keys: &[],
    },
    TableSpec {
        name: "users",
        primary_key: &["user_id"],
        unique: &[&["email"]],
        foreign_keys: &[fk("organization_id", "organizations")],
    },
    TableSpec {
        name: "teams",
        primary_key: &["team_id"],
        unique: &[],
        foreign_keys: &[fk("organization_id", "organizations")],
    },
    TableSpec {
        name: "team_memberships",
        primary_key: &["membership_id"],
        unique: &[&["team_id", "user_id"]],
        foreign_keys: &[fk("team_id", "teams"), fk("user_id", "users")],
    },
    TableSpec {
        name: "projects",
        primary_key: &["project_id"],
        unique: &[],
        foreign_keys: &[fk("team_id", "teams"), fk("created_by", "users")],
    },
    TableSpec {
        name: "sections",
        primary_key: &["section_id"],
        unique: &[&["project_id", "position"]],
        foreign_keys: &[fk("project_id", "projects")],
    },
    TableSpec {
        name: "tags",
        primary_key: &["tag_id"],
        unique: &[&["organization_id", "name"]],
        foreign_keys: &[fk("organization_id", "organizations")],
    },
    TableSpec {
        name: "tasks",
        primary_key: &["task_id"],
        unique: &[],
        foreign_keys: &[
            fk("project_id", "projects"),
            fk("section_id", "sections"),
            fk("parent_task_id", "tasks"),
            fk("assignee_id", "users"),
            fk("created_by", "users"),
        ],
    },
    TableSpec {
        name: "comments",
        primary_key: &["comment_id"],
        unique: &[],
        foreign_keys: &[fk("task_id", "tasks"), fk("user_id", "users")],
    },
    TableSpec {
        name: "attachments",
        primary_key: &["attachment_id"],
        unique: &[],
        foreign_keys: &[fk("task_id", "tasks"), fk("uploaded_by", "users")],
    },
    TableSpec {
        name: "custom_field_definitions",
        primary_key: &["custom_field_id"],
        unique: &[&["project_id", "name"]],
        foreign_keys: &[fk("project_id", "projects")],
    },
    TableSpec {
        name: "custom_field_values",
        primary_key: &["value_id"],
        unique: &[&["task_id", "custom_field_id"]],
        foreign_keys: &[
            fk("task_id", "tasks"),
            fk("custom_field_id", "custom_field_definitions"),
        ],
    },
    TableSpec {
        name: "task_tags",
        primary_key: &["task_id", "tag_id"],
        unique: &[],
        foreign_keys: &[fk("task_id", "tasks"), fk("tag_id", "tags")],
    },
];

/// Looks up a table by name.
pub fn table(name: &str) -> Option<&'static TableSpec> {
    TABLES.iter().find(|spec| spec.name == name)
}
