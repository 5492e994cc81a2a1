//! folio edit - Edit projects or replace whole sections
//!
//! Every edit starts from the loaded content with the local draft laid over
//! it, and ends by saving the result as the new draft.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::content::edit::{self, Confirmation, NewProject, ProjectField};
use crate::content::{Category, ContentDocument, ContentPatch, Language, Section};
use crate::error::{FolioError, Result};

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(subcommand)]
    pub command: EditCommand,
}

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Add, change or remove project cards
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Replace a whole section with new JSON
    Section(SectionArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Append a project card
    Add(ProjectAddArgs),
    /// Change fields of one project card
    Set(ProjectSetArgs),
    /// Remove a project card
    Remove(ProjectRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ProjectAddArgs {
    /// Language list to add to
    #[arg(long, short, value_enum, default_value = "en")]
    pub lang: Language,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_enum)]
    pub category: Option<Category>,

    #[arg(long)]
    pub description: Option<String>,

    /// Technologies, comma-separated or repeated
    #[arg(long = "tech", value_delimiter = ',')]
    pub technologies: Vec<String>,

    #[command(flatten)]
    pub image: ImageArgs,
}

#[derive(Args, Debug)]
pub struct ProjectSetArgs {
    #[arg(long, short, value_enum, default_value = "en")]
    pub lang: Language,

    /// Position in the language's list
    #[arg(long, conflicts_with = "id", required_unless_present = "id")]
    pub index: Option<usize>,

    /// Project id
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_enum)]
    pub category: Option<Category>,

    #[arg(long)]
    pub description: Option<String>,

    /// Replace the technology list (comma-separated or repeated)
    #[arg(long = "tech", value_delimiter = ',')]
    pub technologies: Option<Vec<String>>,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Demo link; an empty value removes it
    #[arg(long)]
    pub demo_url: Option<String>,

    /// Source repository link; an empty value removes it
    #[arg(long)]
    pub repo_url: Option<String>,

    #[arg(long)]
    pub featured: Option<bool>,
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image URL
    #[arg(long, conflicts_with = "image_file")]
    pub image_url: Option<String>,

    /// Local image to embed as a data URI
    #[arg(long)]
    pub image_file: Option<PathBuf>,
}

impl ImageArgs {
    fn resolve(&self) -> Result<Option<String>> {
        match (&self.image_url, &self.image_file) {
            (_, Some(path)) => edit::image_data_uri(path).map(Some),
            (Some(url), None) => Ok(Some(url.clone())),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Args, Debug)]
pub struct ProjectRemoveArgs {
    #[arg(long, short, value_enum, default_value = "en")]
    pub lang: Language,

    /// Project id
    pub id: String,

    /// Confirm the removal
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct SectionArgs {
    #[arg(value_enum)]
    pub section: Section,

    /// New section value as inline JSON
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,

    /// Read the new section value from a JSON file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &EditArgs) -> Result<()> {
    super::open_session(ctx, true)?;
    let outcome = match &args.command {
        EditCommand::Project(ProjectCommand::Add(args)) => add(ctx, args)?,
        EditCommand::Project(ProjectCommand::Set(args)) => set(ctx, args)?,
        EditCommand::Project(ProjectCommand::Remove(args)) => remove(ctx, args)?,
        EditCommand::Section(args) => section(ctx, args)?,
    };
    ctx.resolver.save_draft()?;
    info!(action = outcome.action, "edit saved as draft");

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "action": outcome.action,
            "lang": outcome.lang,
            "project_id": outcome.project_id,
            "sections": outcome.sections,
            "fingerprint": ctx.resolver.document().fingerprint()?,
        });
        emit_json(&robot_ok(payload))
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Draft Updated").kv("Action", outcome.action);
        if let Some(lang) = outcome.lang {
            layout.kv("Language", lang.code());
        }
        if let Some(id) = &outcome.project_id {
            layout.kv("Project", id);
        }
        let sections: Vec<&str> = outcome.sections.iter().map(|s| s.key()).collect();
        layout
            .kv("Sections", &sections.join(", "))
            .blank()
            .bullet("Run `folio publish` to make the change public");
        emit_human(&layout);
        Ok(())
    }
}

struct EditOutcome {
    action: &'static str,
    lang: Option<Language>,
    project_id: Option<String>,
    sections: Vec<Section>,
}

fn add(ctx: &AppContext, args: &ProjectAddArgs) -> Result<EditOutcome> {
    let defaults = NewProject::default();
    let template = NewProject {
        title: args.title.clone().unwrap_or(defaults.title),
        category: args.category.unwrap_or(defaults.category),
        description: args.description.clone().unwrap_or(defaults.description),
        technologies: if args.technologies.is_empty() {
            defaults.technologies
        } else {
            args.technologies.clone()
        },
        image_url: args.image.resolve()?.unwrap_or(defaults.image_url),
    };
    let (id, sections) = ctx.resolver.edit_with(|doc| {
        let (patch, id) = edit::add_project(doc, args.lang, template);
        let sections = patch.sections();
        Ok((patch, (id, sections)))
    })?;
    Ok(EditOutcome {
        action: "project-add",
        lang: Some(args.lang),
        project_id: Some(id),
        sections,
    })
}

fn set(ctx: &AppContext, args: &ProjectSetArgs) -> Result<EditOutcome> {
    let fields = project_fields(args)?;
    if fields.is_empty() {
        return Err(FolioError::InvalidEdit(
            "nothing to change; pass at least one field flag".to_string(),
        ));
    }
    let (id, sections) = ctx.resolver.edit_with(|doc| {
        let index = match (&args.id, args.index) {
            (Some(id), _) => edit::project_index(doc, args.lang, id)?,
            (None, Some(index)) => index,
            (None, None) => {
                return Err(FolioError::InvalidEdit("pass --index or --id".to_string()));
            }
        };
        let patch = apply_fields(doc, args.lang, index, fields)?;
        let id = patch
            .projects
            .as_ref()
            .and_then(|projects| projects.get(args.lang).get(index))
            .map(|project| project.id.clone());
        let sections = patch.sections();
        Ok((patch, (id, sections)))
    })?;
    Ok(EditOutcome {
        action: "project-set",
        lang: Some(args.lang),
        project_id: id,
        sections,
    })
}

/// Apply `fields` in order; the returned patch carries all of them.
fn apply_fields(
    doc: &ContentDocument,
    lang: Language,
    index: usize,
    fields: Vec<ProjectField>,
) -> Result<ContentPatch> {
    let mut working = doc.clone();
    let mut last = ContentPatch::default();
    for field in fields {
        let patch = edit::update_project(&working, lang, index, field)?;
        working = working.merged(patch.clone());
        last = patch;
    }
    Ok(last)
}

fn project_fields(args: &ProjectSetArgs) -> Result<Vec<ProjectField>> {
    let optional = |value: &Option<String>| {
        value.as_ref().map(|value| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    };

    let mut fields = Vec::new();
    if let Some(title) = &args.title {
        fields.push(ProjectField::Title(title.clone()));
    }
    if let Some(category) = args.category {
        fields.push(ProjectField::Category(category));
    }
    if let Some(description) = &args.description {
        fields.push(ProjectField::Description(description.clone()));
    }
    if let Some(technologies) = &args.technologies {
        fields.push(ProjectField::Technologies(technologies.clone()));
    }
    if let Some(image) = args.image.resolve()? {
        fields.push(ProjectField::ImageUrl(image));
    }
    if let Some(demo) = optional(&args.demo_url) {
        fields.push(ProjectField::DemoUrl(demo));
    }
    if let Some(repo) = optional(&args.repo_url) {
        fields.push(ProjectField::RepoUrl(repo));
    }
    if let Some(featured) = args.featured {
        fields.push(ProjectField::Featured(featured));
    }
    Ok(fields)
}

fn remove(ctx: &AppContext, args: &ProjectRemoveArgs) -> Result<EditOutcome> {
    let confirmation = Confirmation::from(args.yes);
    let sections = ctx.resolver.edit_with(|doc| {
        let patch = edit::remove_project(doc, args.lang, &args.id, confirmation)?;
        let sections = patch.sections();
        Ok((patch, sections))
    })?;
    Ok(EditOutcome {
        action: "project-remove",
        lang: Some(args.lang),
        project_id: Some(args.id.clone()),
        sections,
    })
}

fn section(ctx: &AppContext, args: &SectionArgs) -> Result<EditOutcome> {
    let raw = match (&args.json, &args.file) {
        (_, Some(path)) => std::fs::read_to_string(path)?,
        (Some(json), None) => json.clone(),
        (None, None) => {
            return Err(FolioError::InvalidEdit("pass --json or --file".to_string()));
        }
    };
    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| FolioError::InvalidEdit(format!("section {}: {err}", args.section)))?;
    let patch = edit::replace_section(args.section, value)?;
    let sections = patch.sections();
    ctx.resolver.update(patch);
    Ok(EditOutcome {
        action: "section-replace",
        lang: None,
        project_id: None,
        sections,
    })
}
