//! folio show - Print the resolved content

use clap::Args;
use serde_json::Value;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::content::{ContentDocument, Language, Section};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only this section (e.g. projects, hero, socials)
    #[arg(long, short, value_enum)]
    pub section: Option<Section>,

    /// Only this language of localized sections
    #[arg(long, short, value_enum)]
    pub lang: Option<Language>,

    /// Lay the local draft over the loaded content, as editing does
    #[arg(long)]
    pub draft: bool,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let resolution = super::open_session(ctx, args.draft)?;
    let snapshot = ctx.resolver.current();
    let content = select(&snapshot.document, args.section, args.lang)?;

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "provenance": snapshot.provenance,
            "section": args.section,
            "lang": args.lang,
            "content": content,
        });
        let warnings = resolution
            .failures
            .iter()
            .map(|failure| failure.message.clone())
            .collect();
        return emit_json(&robot_ok(payload).with_warnings(warnings));
    }

    if args.section == Some(Section::Projects) {
        let mut layout = HumanLayout::new();
        layout.title(&format!("Projects ({})", snapshot.provenance));
        for lang in args.lang.map_or(Language::ALL.to_vec(), |lang| vec![lang]) {
            layout.section(lang.code());
            for (index, project) in snapshot.document.projects.get(lang).iter().enumerate() {
                let featured = if project.featured == Some(true) { " *" } else { "" };
                layout.push_line(format!(
                    "{index:>3}  {:<34} {:<6} {}{featured}",
                    project.id,
                    project.category.to_string(),
                    project.title
                ));
            }
            layout.blank();
        }
        emit_human(&layout);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&content)?);
    Ok(())
}

/// The document, one section of it, or one language of that section.
fn select(
    doc: &ContentDocument,
    section: Option<Section>,
    lang: Option<Language>,
) -> Result<Value> {
    match section {
        Some(section) => Ok(localize(doc.section_value(section)?, lang)),
        None => {
            let value = serde_json::to_value(doc)?;
            let Some(lang) = lang else {
                return Ok(value);
            };
            let Value::Object(sections) = value else {
                return Ok(value);
            };
            Ok(Value::Object(
                sections
                    .into_iter()
                    .map(|(key, value)| (key, localize(value, Some(lang))))
                    .collect(),
            ))
        }
    }
}

/// `value[lang]` for localized values; anything else unchanged.
fn localize(value: Value, lang: Option<Language>) -> Value {
    match (lang, value) {
        (Some(lang), Value::Object(mut map)) if map.contains_key(lang.code()) => {
            map.remove(lang.code()).unwrap_or(Value::Null)
        }
        (_, value) => value,
    }
}
