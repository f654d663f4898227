//! Per-project custom field definitions and their values on tasks.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::project::GeneratedProject;
use super::task::GeneratedTask;
use crate::ids::generate_id;
use crate::models::{FieldType, ProjectType};

/// A field shape projects can adopt.
#[derive(Debug, Clone, Copy)]
pub struct FieldTemplate {
    pub name: &'static str,
    pub field_type: FieldType,
    pub options: &'static [&'static str],
}

const FIELD_CATALOG: &[FieldTemplate] = &[
    FieldTemplate {
        name: "Priority",
        field_type: FieldType::Enum,
        options: &["Low", "Medium", "High", "Critical"],
    },
    FieldTemplate {
        name: "Status",
        field_type: FieldType::Enum,
        options: &["Not Started", "In Progress", "Blocked", "Done"],
    },
    FieldTemplate {
        name: "Effort",
        field_type: FieldType::Enum,
        options: &["XS", "S", "M", "L", "XL"],
    },
    FieldTemplate {
        name: "Sprint",
        field_type: FieldType::Enum,
        options: &["Sprint 1", "Sprint 2", "Sprint 3", "Sprint 4", "Backlog"],
    },
    FieldTemplate {
        name: "Budget",
        field_type: FieldType::Number,
        options: &[],
    },
    FieldTemplate {
        name: "Target Date",
        field_type: FieldType::Date,
        options: &[],
    },
    FieldTemplate {
        name: "Owner",
        field_type: FieldType::Text,
        options: &[],
    },
    FieldTemplate {
        name: "Category",
        field_type: FieldType::MultiEnum,
        options: &["Feature", "Bug", "Enhancement", "Documentation", "Research"],
    },
];

/// Generated custom field definition ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCustomField {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    /// Present for enum and multi-enum fields only.
    pub enum_options: Option<Vec<String>>,
}

/// The single populated slot of a custom field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Enum(String),
    Date(Date),
    MultiEnum(Vec<String>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Enum(_) => FieldType::Enum,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::MultiEnum(_) => FieldType::MultiEnum,
        }
    }
}

/// Generated custom field value ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCustomFieldValue {
    pub id: Uuid,
    pub task_id: Uuid,
    pub custom_field_id: Uuid,
    pub value: FieldValue,
}

/// Configuration for custom field generation.
#[derive(Debug, Clone)]
pub struct CustomFieldGenConfig {
    pub engineering_probability: f64,
    pub other_probability: f64,
    /// Inclusive number of fields on a project that has any.
    pub fields_per_project: (usize, usize),
    /// Probability that a task fills a given field.
    pub fill_rate: f64,
}

impl Default for CustomFieldGenConfig {
    fn default() -> Self {
        Self {
            engineering_probability: 0.70,
            other_probability: 0.40,
            fields_per_project: (2, 5),
            fill_rate: 0.70,
        }
    }
}

/// Generates custom field definitions and task values.
pub struct CustomFieldGenerator {
    config: CustomFieldGenConfig,
}

impl CustomFieldGenerator {
    /// Creates a new custom field generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: CustomFieldGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: CustomFieldGenConfig) -> Self {
        Self { config }
    }

    /// Gives some projects a handful of distinct fields from the catalog.
    pub fn generate_definitions(
        &self,
        projects: &[GeneratedProject],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedCustomField> {
        let mut fields = Vec::new();
        let (min, max) = self.config.fields_per_project;

        for project in projects {
            let probability = match project.project_type {
                ProjectType::Engineering => self.config.engineering_probability,
                _ => self.config.other_probability,
            };
            if rng.r#gen::<f64>() >= probability {
                continue;
            }

            let count = rng.gen_range(min..=max).min(FIELD_CATALOG.len());
            let templates: Vec<&FieldTemplate> =
                FIELD_CATALOG.choose_multiple(rng, count).collect();

            for template in templates {
                fields.push(GeneratedCustomField {
                    id: generate_id(rng),
                    project_id: project.id,
                    name: template.name.to_string(),
                    field_type: template.field_type,
                    enum_options: template
                        .field_type
                        .has_options()
                        .then(|| template.options.iter().map(|o| o.to_string()).collect()),
                });
            }
        }

        fields
    }

    /// Fills fields on tasks of projects that define them.
    ///
    /// Date fields take the task's due date; tasks without one get no row.
    pub fn generate_values<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a GeneratedTask>,
        fields: &[GeneratedCustomField],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedCustomFieldValue> {
        let mut fields_by_project: HashMap<Uuid, Vec<&GeneratedCustomField>> = HashMap::new();
        for field in fields {
            fields_by_project.entry(field.project_id).or_default().push(field);
        }

        let mut values = Vec::new();

        for task in tasks {
            let Some(project_fields) = fields_by_project.get(&task.project_id) else {
                continue;
            };

            for field in project_fields {
                if rng.r#gen::<f64>() > self.config.fill_rate {
                    continue;
                }
                let Some(value) = field_value(field, task, rng) else {
                    continue;
                };

                values.push(GeneratedCustomFieldValue {
                    id: generate_id(rng),
                    task_id: task.id,
                    custom_field_id: field.id,
                    value,
                });
            }
        }

        values
    }
}

impl Default for CustomFieldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn field_value(
    field: &GeneratedCustomField,
    task: &GeneratedTask,
    rng: &mut impl Rng,
) -> Option<FieldValue> {
    let options = field.enum_options.as_deref().unwrap_or(&[]);

    match field.field_type {
        FieldType::Text => Some(FieldValue::Text("Sample text value".to_string())),
        FieldType::Number => Some(FieldValue::Number(rng.gen_range(1.0..=1000.0))),
        FieldType::Enum => options.choose(rng).cloned().map(FieldValue::Enum),
        FieldType::Date => task.due_date().map(FieldValue::Date),
        FieldType::MultiEnum => {
            if options.is_empty() {
                return None;
            }
            let count = rng.gen_range(1..=options.len().min(3));
            Some(FieldValue::MultiEnum(
                options.choose_multiple(rng, count).cloned().collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use time::macros::datetime;

    fn project(project_type: ProjectType, rng: &mut StdRng) -> GeneratedProject {
        GeneratedProject {
            id: generate_id(rng),
            team_id: Uuid::nil(),
            name: "Platform".to_string(),
            description: String::new(),
            project_type,
            color: "blue".to_string(),
            archived: false,
            created_at: datetime!(2024-01-01 0:00 UTC),
            created_by: None,
        }
    }

    fn task(project_id: Uuid, due: bool, rng: &mut StdRng) -> GeneratedTask {
        GeneratedTask {
            id: generate_id(rng),
            project_id,
            section_id: Uuid::nil(),
            parent_task_id: None,
            name: "Tune cache".to_string(),
            description: String::new(),
            assignee_id: None,
            due_at: due.then_some(datetime!(2024-01-15 0:00 UTC)),
            created_at: datetime!(2024-01-02 0:00 UTC),
            completed: false,
            completed_at: None,
            created_by: None,
            priority: Priority::Normal,
            project_type: ProjectType::Engineering,
        }
    }

    #[test]
    fn test_generate_definitions() {
        let mut rng = StdRng::seed_from_u64(42);
        let projects: Vec<_> = (0..200)
            .map(|_| project(ProjectType::Engineering, &mut rng))
            .collect();
        let fields = CustomFieldGenerator::new().generate_definitions(&projects, &mut rng);

        let mut with_fields = 0;
        for project in &projects {
            let own: Vec<_> = fields.iter().filter(|f| f.project_id == project.id).collect();
            if own.is_empty() {
                continue;
            }
            with_fields += 1;
            assert!((2..=5).contains(&own.len()));

            let names: HashSet<_> = own.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names.len(), own.len());
        }
        assert!((120..160).contains(&with_fields), "{with_fields} projects with fields");

        for field in &fields {
            assert_eq!(field.enum_options.is_some(), field.field_type.has_options());
        }
    }

    #[test]
    fn test_values_match_definition_type() {
        let mut rng = StdRng::seed_from_u64(1);
        let projects: Vec<_> = (0..30)
            .map(|_| project(ProjectType::Engineering, &mut rng))
            .collect();
        let field_gen = CustomFieldGenerator::new();
        let fields = field_gen.generate_definitions(&projects, &mut rng);
        let tasks: Vec<_> = projects
            .iter()
            .flat_map(|p| (0..10).map(|i| (p.id, i % 2 == 0)).collect::<Vec<_>>())
            .map(|(pid, due)| task(pid, due, &mut rng))
            .collect();

        let values = field_gen.generate_values(&tasks, &fields, &mut rng);
        assert!(!values.is_empty());

        for value in &values {
            let field = fields.iter().find(|f| f.id == value.custom_field_id).unwrap();
            let task = tasks.iter().find(|t| t.id == value.task_id).unwrap();
            assert_eq!(field.project_id, task.project_id);
            assert_eq!(value.value.field_type(), field.field_type);

            let options = field.enum_options.clone().unwrap_or_default();
            match &value.value {
                FieldValue::Text(text) => assert_eq!(text, "Sample text value"),
                FieldValue::Number(n) => assert!((1.0..=1000.0).contains(n)),
                FieldValue::Enum(choice) => assert!(options.contains(choice)),
                FieldValue::Date(date) => assert_eq!(Some(*date), task.due_date()),
                FieldValue::MultiEnum(choices) => {
                    assert!((1..=3).contains(&choices.len()));
                    assert!(choices.iter().all(|c| options.contains(c)));
                    let distinct: HashSet<_> = choices.iter().collect();
                    assert_eq!(distinct.len(), choices.len());
                }
            }
        }
    }

    #[test]
    fn test_date_field_skipped_without_due_date() {
        let mut rng = StdRng::seed_from_u64(2);
        let project = project(ProjectType::Operations, &mut rng);
        let field = GeneratedCustomField {
            id: generate_id(&mut rng),
            project_id: project.id,
            name: "Target Date".to_string(),
            field_type: FieldType::Date,
            enum_options: None,
        };
        let tasks: Vec<_> = (0..50).map(|_| task(project.id, false, &mut rng)).collect();

        let field_gen = CustomFieldGenerator::with_config(CustomFieldGenConfig {
            fill_rate: 1.0,
            ..Default::default()
        });
        assert!(field_gen.generate_values(&tasks, &[field], &mut rng).is_empty());
    }

    #[test]
    fn test_tasks_outside_field_projects_get_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let projects = vec![project(ProjectType::Engineering, &mut rng)];
        let field_gen = CustomFieldGenerator::with_config(CustomFieldGenConfig {
            engineering_probability: 1.0,
            ..Default::default()
        });
        let fields = field_gen.generate_definitions(&projects, &mut rng);
        let stray: Vec<_> = (0..20).map(|_| task(Uuid::nil(), true, &mut rng)).collect();

        assert!(field_gen.generate_values(&stray, &fields, &mut rng).is_empty());
    }
}
