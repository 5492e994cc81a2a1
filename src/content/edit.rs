//! Field-level editing operations.
//!
//! Every operation reads the current document and returns a [`ContentPatch`]
//! naming the sections it rewrites. Applying the patch yields a new document;
//! the input document is never modified.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use super::schema::{Category, ContentDocument, Language, Project, Section};
use super::ContentPatch;
use crate::error::{FolioError, Result};

/// Explicit acknowledgement required by destructive edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Confirmed } else { Self::Unconfirmed }
    }
}

/// A single project field assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    Title(String),
    Category(Category),
    Description(String),
    Technologies(Vec<String>),
    ImageUrl(String),
    DemoUrl(Option<String>),
    RepoUrl(Option<String>),
    Featured(bool),
}

impl ProjectField {
    fn apply(self, project: &mut Project) {
        match self {
            Self::Title(value) => project.title = value,
            Self::Category(value) => project.category = value,
            Self::Description(value) => project.description = value,
            Self::Technologies(value) => project.technologies = value,
            Self::ImageUrl(value) => project.image_url = value,
            Self::DemoUrl(value) => project.demo_url = value,
            Self::RepoUrl(value) => project.repo_url = value,
            Self::Featured(value) => project.featured = Some(value),
        }
    }
}

/// Initial values of a freshly added project card.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub category: Category,
    pub description: String,
    pub technologies: Vec<String>,
    pub image_url: String,
}

impl Default for NewProject {
    fn default() -> Self {
        Self {
            title: "New Project".to_string(),
            category: Category::default(),
            description: "Description here...".to_string(),
            technologies: vec!["Tech 1".to_string()],
            image_url: "https://picsum.photos/800/450".to_string(),
        }
    }
}

/// Append a project to one language's list. Returns the patch and the new id.
#[must_use]
pub fn add_project(
    doc: &ContentDocument,
    lang: Language,
    template: NewProject,
) -> (ContentPatch, String) {
    let mut projects = doc.projects.clone();
    let list = projects.get_mut(lang);
    let id = fresh_id(list);
    list.push(Project {
        id: id.clone(),
        title: template.title,
        category: template.category,
        description: template.description,
        technologies: template.technologies,
        image_url: template.image_url,
        demo_url: None,
        repo_url: None,
        featured: Some(false),
    });
    (projects_patch(projects), id)
}

/// Set one field of the project at `index` in one language's list.
pub fn update_project(
    doc: &ContentDocument,
    lang: Language,
    index: usize,
    field: ProjectField,
) -> Result<ContentPatch> {
    let mut projects = doc.projects.clone();
    let list = projects.get_mut(lang);
    let len = list.len();
    let project = list.get_mut(index).ok_or_else(|| {
        FolioError::InvalidEdit(format!(
            "project index {index} out of range for {lang} ({len} projects)"
        ))
    })?;
    field.apply(project);
    Ok(projects_patch(projects))
}

/// Remove the project with `id` from one language's list.
pub fn remove_project(
    doc: &ContentDocument,
    lang: Language,
    id: &str,
    confirmation: Confirmation,
) -> Result<ContentPatch> {
    let index = project_index(doc, lang, id)?;
    if confirmation != Confirmation::Confirmed {
        return Err(FolioError::ConfirmationRequired(format!(
            "removing project '{id}' ({lang}) cannot be undone"
        )));
    }
    let mut projects = doc.projects.clone();
    projects.get_mut(lang).remove(index);
    Ok(projects_patch(projects))
}

/// Position of the project with `id` in one language's list.
pub fn project_index(doc: &ContentDocument, lang: Language, id: &str) -> Result<usize> {
    doc.projects
        .get(lang)
        .iter()
        .position(|project| project.id == id)
        .ok_or_else(|| FolioError::InvalidEdit(format!("no project with id '{id}' in {lang}")))
}

/// Replace a whole section with a JSON value of the section's shape.
pub fn replace_section(section: Section, value: Value) -> Result<ContentPatch> {
    if value.is_null() {
        return Err(FolioError::InvalidEdit(format!(
            "section {section} cannot be replaced with null"
        )));
    }
    let mut object = Map::new();
    object.insert(section.key().to_string(), value);
    ContentPatch::from_value(Value::Object(object))
        .map_err(|err| FolioError::InvalidEdit(format!("section {section}: {err}")))
}

/// Embed an image file as a `data:` URI usable in `imageUrl`.
pub fn image_data_uri(path: &Path) -> Result<String> {
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => {
            return Err(FolioError::InvalidEdit(format!(
                "unsupported image type: {}",
                path.display()
            )));
        }
    };
    let bytes = std::fs::read(path)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn fresh_id(existing: &[Project]) -> String {
    loop {
        let candidate = uuid::Uuid::new_v4().simple().to_string();
        if existing.iter().all(|project| project.id != candidate) {
            return candidate;
        }
    }
}

fn projects_patch(projects: super::Localized<Vec<Project>>) -> ContentPatch {
    ContentPatch {
        projects: Some(projects),
        ..ContentPatch::default()
    }
}
