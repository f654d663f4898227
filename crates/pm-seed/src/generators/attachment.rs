//! File attachment generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::actor::{ActorRole, UserPool};
use super::task::GeneratedTask;
use crate::config::RunWindow;
use crate::ids::{generate_id, to_hex};
use crate::models::ProjectType;
use crate::temporal::{categorical, days_until, decayed_offset};

/// Broad kind of an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Document,
    Image,
    Spreadsheet,
    Code,
    Archive,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Document,
        FileCategory::Image,
        FileCategory::Spreadsheet,
        FileCategory::Code,
        FileCategory::Archive,
        FileCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Code => "code",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }

    /// File templates belonging to this category.
    pub fn templates(&self) -> &'static [FileTemplate] {
        match self {
            FileCategory::Document => DOCUMENT_FILES,
            FileCategory::Image => IMAGE_FILES,
            FileCategory::Spreadsheet => SPREADSHEET_FILES,
            FileCategory::Code => CODE_FILES,
            FileCategory::Archive => ARCHIVE_FILES,
            FileCategory::Other => OTHER_FILES,
        }
    }

    /// Draws a category weighted by what projects of this type attach.
    ///
    /// Without a project type every category is equally likely.
    pub fn for_project(project_type: Option<ProjectType>, rng: &mut impl Rng) -> FileCategory {
        use FileCategory::*;

        let (categories, weights): (&[FileCategory], &[f64]) = match project_type {
            Some(ProjectType::Engineering) => (
                &[Document, Image, Code, Spreadsheet, Other],
                &[0.30, 0.25, 0.25, 0.10, 0.10],
            ),
            Some(ProjectType::Marketing) => {
                (&[Image, Document, Other, Spreadsheet], &[0.40, 0.30, 0.20, 0.10])
            }
            Some(ProjectType::Operations) => (
                &[Spreadsheet, Document, Archive, Other],
                &[0.40, 0.30, 0.15, 0.15],
            ),
            None => return Self::ALL[rng.gen_range(0..Self::ALL.len())],
        };

        categories[categorical(weights, rng)]
    }
}

/// A file name with its MIME type and plausible size range in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTemplate {
    pub name: &'static str,
    pub mime_type: &'static str,
    pub min_size: i64,
    pub max_size: i64,
}

const fn file(name: &'static str, mime_type: &'static str, min_size: i64, max_size: i64) -> FileTemplate {
    FileTemplate {
        name,
        mime_type,
        min_size,
        max_size,
    }
}

const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const DOCUMENT_FILES: &[FileTemplate] = &[
    file("document.pdf", "application/pdf", 50_000, 5_000_000),
    file("report.docx", DOCX, 100_000, 10_000_000),
    file("spec.pdf", "application/pdf", 200_000, 3_000_000),
    file("requirements.docx", DOCX, 150_000, 8_000_000),
    file("design-brief.pdf", "application/pdf", 300_000, 4_000_000),
];

const IMAGE_FILES: &[FileTemplate] = &[
    file("screenshot.png", "image/png", 50_000, 2_000_000),
    file("mockup.jpg", "image/jpeg", 100_000, 3_000_000),
    file("diagram.png", "image/png", 80_000, 1_500_000),
    file("wireframe.png", "image/png", 60_000, 1_200_000),
    file("logo.svg", "image/svg+xml", 10_000, 500_000),
];

const SPREADSHEET_FILES: &[FileTemplate] = &[
    file("data.xlsx", XLSX, 50_000, 2_000_000),
    file("budget.xlsx", XLSX, 80_000, 3_000_000),
    file("tracker.xlsx", XLSX, 60_000, 1_500_000),
];

const CODE_FILES: &[FileTemplate] = &[
    file("config.json", "application/json", 1_000, 50_000),
    file("script.js", "text/javascript", 5_000, 200_000),
    file("styles.css", "text/css", 3_000, 150_000),
    file("README.md", "text/markdown", 2_000, 100_000),
];

const ARCHIVE_FILES: &[FileTemplate] = &[
    file("archive.zip", "application/zip", 100_000, 10_000_000),
    file("backup.tar.gz", "application/gzip", 200_000, 5_000_000),
];

const OTHER_FILES: &[FileTemplate] = &[
    file("notes.txt", "text/plain", 1_000, 50_000),
    file("presentation.pptx", PPTX, 200_000, 8_000_000),
    file("video.mp4", "video/mp4", 1_000_000, 50_000_000),
];

const URL_PATTERNS: &[&str] = &[
    "https://storage.example.com/files/{id}/{name}",
    "https://cdn.company.com/attachments/{id}/{name}",
    "https://files.company.com/uploads/{id}/{name}",
    "https://s3.amazonaws.com/bucket/{id}/{name}",
];

/// Generated attachment data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAttachment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub name: String,
    pub file_type: String,
    pub file_size: i64,
    pub url: String,
    pub uploaded_at: OffsetDateTime,
    pub uploaded_by: Option<Uuid>,
}

/// Configuration for attachment generation.
#[derive(Debug, Clone)]
pub struct AttachmentGenConfig {
    /// Weights for 0..=4 attachments on a task.
    pub count_weights: Vec<f64>,
    /// Rate of the exponential upload delay (per day).
    pub decay_rate: f64,
    pub assignee_probability: f64,
    pub creator_probability: f64,
}

impl Default for AttachmentGenConfig {
    fn default() -> Self {
        Self {
            count_weights: vec![0.70, 0.20, 0.07, 0.02, 0.01],
            decay_rate: 2.0,
            assignee_probability: 0.5,
            creator_probability: 0.3,
        }
    }
}

/// Generates file attachments on tasks.
pub struct AttachmentGenerator {
    config: AttachmentGenConfig,
}

impl AttachmentGenerator {
    /// Creates a new attachment generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: AttachmentGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: AttachmentGenConfig) -> Self {
        Self { config }
    }

    /// Generates attachments, most of them uploaded soon after the task
    /// was created.
    pub fn generate_attachments<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a GeneratedTask>,
        users: &UserPool,
        window: RunWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedAttachment> {
        let mut attachments = Vec::new();

        for task in tasks {
            let count = categorical(&self.config.count_weights, rng);

            for _ in 0..count {
                let offset = decayed_offset(self.config.decay_rate, rng)
                    .min(days_until(task.created_at, window.end) as f64);
                let uploaded_at = task.created_at + Duration::days(offset as i64);
                if uploaded_at > window.end {
                    continue;
                }

                attachments.push(self.generate_single_attachment(task, uploaded_at, users, rng));
            }
        }

        attachments
    }

    fn generate_single_attachment(
        &self,
        task: &GeneratedTask,
        uploaded_at: OffsetDateTime,
        users: &UserPool,
        rng: &mut impl Rng,
    ) -> GeneratedAttachment {
        let category = FileCategory::for_project(Some(task.project_type), rng);
        let templates = category.templates();
        let template = templates[rng.gen_range(0..templates.len())];
        let file_size = rng.gen_range(template.min_size..=template.max_size);

        let id = generate_id(rng);
        let pattern = URL_PATTERNS[rng.gen_range(0..URL_PATTERNS.len())];
        let url = pattern
            .replace("{id}", &to_hex(id))
            .replace("{name}", template.name);

        let roles = [
            ActorRole::new(task.assignee_id, self.config.assignee_probability),
            ActorRole::new(task.created_by, self.config.creator_probability),
        ];
        let uploaded_by = users.resolve(&roles, rng);

        GeneratedAttachment {
            id,
            task_id: task.id,
            name: template.name.to_string(),
            file_type: template.mime_type.to_string(),
            file_size,
            url,
            uploaded_at,
            uploaded_by,
        }
    }
}

impl Default for AttachmentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use time::macros::datetime;

    fn window() -> RunWindow {
        RunWindow::new(
            datetime!(2024-01-01 0:00 UTC),
            datetime!(2024-02-01 0:00 UTC),
        )
    }

    fn task(project_type: ProjectType, rng: &mut StdRng) -> GeneratedTask {
        GeneratedTask {
            id: generate_id(rng),
            project_id: Uuid::nil(),
            section_id: Uuid::nil(),
            parent_task_id: None,
            name: "Draft launch plan".to_string(),
            description: String::new(),
            assignee_id: None,
            due_at: None,
            created_at: datetime!(2024-01-20 12:00 UTC),
            completed: false,
            completed_at: None,
            created_by: None,
            priority: Priority::Normal,
            project_type,
        }
    }

    fn find_template(name: &str) -> FileTemplate {
        FileCategory::ALL
            .iter()
            .flat_map(|c| c.templates())
            .find(|t| t.name == name)
            .copied()
            .unwrap()
    }

    #[test]
    fn test_generate_attachments() {
        let mut rng = StdRng::seed_from_u64(42);
        let users = UserPool::new((0..5).map(|_| generate_id(&mut rng)).collect());
        let tasks: Vec<_> = (0..1000)
            .map(|_| task(ProjectType::Engineering, &mut rng))
            .collect();

        let attachments =
            AttachmentGenerator::new().generate_attachments(&tasks, &users, window(), &mut rng);

        // Expected 0.44 per task.
        assert!((350..550).contains(&attachments.len()), "{}", attachments.len());

        for attachment in &attachments {
            let task = tasks.iter().find(|t| t.id == attachment.task_id).unwrap();
            assert!(attachment.uploaded_at >= task.created_at);
            assert!(attachment.uploaded_at <= window().end);

            let template = find_template(&attachment.name);
            assert_eq!(attachment.file_type, template.mime_type);
            assert!((template.min_size..=template.max_size).contains(&attachment.file_size));

            assert!(attachment.url.contains(&to_hex(attachment.id)));
            assert!(attachment.url.ends_with(&format!("/{}", attachment.name)));
            assert!(users.contains(&attachment.uploaded_by.unwrap()));
        }
    }

    #[test]
    fn test_category_mix_by_project_type() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut counts: HashMap<FileCategory, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts
                .entry(FileCategory::for_project(Some(ProjectType::Marketing), &mut rng))
                .or_default() += 1;
        }

        assert!(!counts.contains_key(&FileCategory::Code));
        assert!(!counts.contains_key(&FileCategory::Archive));
        let images = counts[&FileCategory::Image] as f64 / 10_000.0;
        assert!((images - 0.40).abs() < 0.03, "image share: {images}");
    }

    #[test]
    fn test_unknown_project_type_is_uniform() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut counts: HashMap<FileCategory, usize> = HashMap::new();
        for _ in 0..6_000 {
            *counts.entry(FileCategory::for_project(None, &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| (850..1150).contains(&n)));
    }

    #[test]
    fn test_no_uploader_without_users() {
        let mut rng = StdRng::seed_from_u64(3);
        let tasks: Vec<_> = (0..200)
            .map(|_| task(ProjectType::Operations, &mut rng))
            .collect();
        let attachments = AttachmentGenerator::new().generate_attachments(
            &tasks,
            &UserPool::default(),
            window(),
            &mut rng,
        );

        assert!(!attachments.is_empty());
        assert!(attachments.iter().all(|a| a.uploaded_by.is_none()));
    }
}
