//! Row conversions for every generated entity.

use super::{Record, ToRecord, Value};
use crate::generators::{
    FieldValue, GeneratedAttachment, GeneratedComment, GeneratedCustomField,
    GeneratedCustomFieldValue, GeneratedMembership, GeneratedOrganization, GeneratedProject,
    GeneratedSection, GeneratedTag, GeneratedTask, GeneratedTaskTag, GeneratedTeam, GeneratedUser,
};

/// Option lists are stored as JSON arrays.
fn json_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

impl ToRecord for GeneratedOrganization {
    const TABLE: &'static str = "organizations";

    fn to_record(&self) -> Record {
        Record::new()
            .with("organization_id", self.id)
            .with("name", self.name.as_str())
            .with("domain", self.domain.as_str())
            .with("created_at", self.created_at)
    }
}

impl ToRecord for GeneratedUser {
    const TABLE: &'static str = "users";

    fn to_record(&self) -> Record {
        Record::new()
            .with("user_id", self.id)
            .with("organization_id", self.organization_id)
            .with("email", self.email.as_str())
            .with("name", self.name.as_str())
            .with("role", self.role.as_str())
            .with("department", self.department.as_str())
            .with("created_at", self.created_at)
    }
}

impl ToRecord for GeneratedTeam {
    const TABLE: &'static str = "teams";

    fn to_record(&self) -> Record {
        Record::new()
            .with("team_id", self.id)
            .with("organization_id", self.organization_id)
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("created_at", self.created_at)
    }
}

impl ToRecord for GeneratedMembership {
    const TABLE: &'static str = "team_memberships";

    fn to_record(&self) -> Record {
        Record::new()
            .with("membership_id", self.id)
            .with("team_id", self.team_id)
            .with("user_id", self.user_id)
            .with("role", self.role.as_str())
            .with("joined_at", self.joined_at)
    }
}

impl ToRecord for GeneratedProject {
    const TABLE: &'static str = "projects";

    fn to_record(&self) -> Record {
        Record::new()
            .with("project_id", self.id)
            .with("team_id", self.team_id)
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("project_type", self.project_type.as_str())
            .with("color", self.color.as_str())
            .with("archived", self.archived)
            .with("created_at", self.created_at)
            .with("created_by", self.created_by)
    }
}

impl ToRecord for GeneratedSection {
    const TABLE: &'static str = "sections";

    fn to_record(&self) -> Record {
        Record::new()
            .with("section_id", self.id)
            .with("project_id", self.project_id)
            .with("name", self.name.as_str())
            .with("position", self.position)
            .with("created_at", self.created_at)
    }
}

impl ToRecord for GeneratedTag {
    const TABLE: &'static str = "tags";

    fn to_record(&self) -> Record {
        Record::new()
            .with("tag_id", self.id)
            .with("organization_id", self.organization_id)
            .with("name", self.name.as_str())
            .with("color", self.color.as_str())
    }
}

impl ToRecord for GeneratedTask {
    const TABLE: &'static str = "tasks";

    fn to_record(&self) -> Record {
        Record::new()
            .with("task_id", self.id)
            .with("project_id", self.project_id)
            .with("section_id", self.section_id)
            .with("parent_task_id", self.parent_task_id)
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("assignee_id", self.assignee_id)
            .with("due_date", self.due_date())
            .with("due_time", Value::Null)
            .with("created_at", self.created_at)
            .with("completed", self.completed)
            .with("completed_at", self.completed_at)
            .with("created_by", self.created_by)
            .with("priority", self.priority.as_str())
    }
}

impl ToRecord for GeneratedComment {
    const TABLE: &'static str = "comments";

    fn to_record(&self) -> Record {
        Record::new()
            .with("comment_id", self.id)
            .with("task_id", self.task_id)
            .with("user_id", self.user_id)
            .with("text", self.text.as_str())
            .with("created_at", self.created_at)
    }
}

impl ToRecord for GeneratedAttachment {
    const TABLE: &'static str = "attachments";

    fn to_record(&self) -> Record {
        Record::new()
            .with("attachment_id", self.id)
            .with("task_id", self.task_id)
            .with("name", self.name.as_str())
            .with("file_type", self.file_type.as_str())
            .with("file_size", self.file_size)
            .with("url", self.url.as_str())
            .with("uploaded_at", self.uploaded_at)
            .with("uploaded_by", self.uploaded_by)
    }
}

impl ToRecord for GeneratedCustomField {
    const TABLE: &'static str = "custom_field_definitions";

    fn to_record(&self) -> Record {
        Record::new()
            .with("custom_field_id", self.id)
            .with("project_id", self.project_id)
            .with("name", self.name.as_str())
            .with("field_type", self.field_type.as_str())
            .with("enum_options", self.enum_options.as_deref().map(json_list))
    }
}

impl ToRecord for GeneratedCustomFieldValue {
    const TABLE: &'static str = "custom_field_values";

    fn to_record(&self) -> Record {
        let mut text = Value::Null;
        let mut number = Value::Null;
        let mut choice = Value::Null;
        let mut date = Value::Null;
        let mut choices = Value::Null;

        match &self.value {
            FieldValue::Text(s) => text = s.as_str().into(),
            FieldValue::Number(n) => number = (*n).into(),
            FieldValue::Enum(s) => choice = s.as_str().into(),
            FieldValue::Date(d) => date = (*d).into(),
            FieldValue::MultiEnum(list) => choices = json_list(list).into(),
        }

        Record::new()
            .with("value_id", self.id)
            .with("task_id", self.task_id)
            .with("custom_field_id", self.custom_field_id)
            .with("text_value", text)
            .with("number_value", number)
            .with("enum_value", choice)
            .with("date_value", date)
            .with("multi_enum_values", choices)
    }
}

impl ToRecord for GeneratedTaskTag {
    const TABLE: &'static str = "task_tags";

    fn to_record(&self) -> Record {
        Record::new()
            .with("task_id", self.task_id)
            .with("tag_id", self.tag_id)
    }
}
