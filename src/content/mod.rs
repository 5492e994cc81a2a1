//! Content model
//!
//! The [`ContentDocument`] is the whole editable record of the site. Sources
//! (static defaults, local draft, remote document) and edits are combined by
//! shallow merge: a [`ContentPatch`] replaces whole top-level sections and
//! leaves every other section untouched.

pub mod defaults;
pub mod edit;
pub mod icons;
pub mod schema;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{FolioError, Result};

pub use icons::{IconId, fill_missing_icons, rehydrate_icons, strip_icons};
pub use schema::{
    Background, Category, Contact, ContentDocument, CurrentFocus, Hero, HeroBadges, Interest,
    Language, Localized, NavLink, Project, Section, SectionTitles, Social,
};

/// A partial document: any subset of top-level sections.
///
/// Unknown keys are ignored so newer or older documents still merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_links: Option<Localized<Vec<NavLink>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Localized<Hero>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_urls: Option<Localized<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_focus: Option<Localized<CurrentFocus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Localized<Background>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Localized<Vec<Project>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Localized<Vec<Interest>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Localized<Contact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_titles: Option<Localized<SectionTitles>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Vec<Social>>,
}

impl ContentPatch {
    /// Parse a JSON document. Anything but a JSON object, or a known section
    /// with the wrong shape, is a [`FolioError::Parse`].
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| FolioError::Parse(format!("invalid JSON: {err}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(FolioError::Parse(
                "content document must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| FolioError::Parse(format!("invalid content section: {err}")))
    }

    /// Sections present in this patch, in document order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        let present = [
            self.nav_links.is_some(),
            self.hero.is_some(),
            self.resume_urls.is_some(),
            self.current_focus.is_some(),
            self.background.is_some(),
            self.projects.is_some(),
            self.interests.is_some(),
            self.contact.is_some(),
            self.section_titles.is_some(),
            self.socials.is_some(),
        ];
        Section::ALL
            .into_iter()
            .zip(present)
            .filter_map(|(section, is_present)| is_present.then_some(section))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    /// The same patch with every Social and Interest icon cleared. Incoming
    /// documents pass through this so icons only ever come from the defaults.
    #[must_use]
    pub fn without_icons(mut self) -> Self {
        if let Some(socials) = &mut self.socials {
            for social in socials.iter_mut() {
                social.icon = None;
            }
        }
        if let Some(interests) = &mut self.interests {
            for list in [&mut interests.en, &mut interests.zh] {
                for interest in list.iter_mut() {
                    interest.icon = None;
                }
            }
        }
        self
    }
}

impl From<ContentDocument> for ContentPatch {
    fn from(doc: ContentDocument) -> Self {
        Self {
            nav_links: Some(doc.nav_links),
            hero: Some(doc.hero),
            resume_urls: Some(doc.resume_urls),
            current_focus: Some(doc.current_focus),
            background: Some(doc.background),
            projects: Some(doc.projects),
            interests: Some(doc.interests),
            contact: Some(doc.contact),
            section_titles: Some(doc.section_titles),
            socials: Some(doc.socials),
        }
    }
}

impl ContentDocument {
    /// Shallow merge: a new document where every section present in `patch`
    /// replaces the corresponding section of `self`.
    #[must_use]
    pub fn merged(&self, patch: ContentPatch) -> Self {
        let mut next = self.clone();
        if let Some(section) = patch.nav_links {
            next.nav_links = section;
        }
        if let Some(section) = patch.hero {
            next.hero = section;
        }
        if let Some(section) = patch.resume_urls {
            next.resume_urls = section;
        }
        if let Some(section) = patch.current_focus {
            next.current_focus = section;
        }
        if let Some(section) = patch.background {
            next.background = section;
        }
        if let Some(section) = patch.projects {
            next.projects = section;
        }
        if let Some(section) = patch.interests {
            next.interests = section;
        }
        if let Some(section) = patch.contact {
            next.contact = section;
        }
        if let Some(section) = patch.section_titles {
            next.section_titles = section;
        }
        if let Some(section) = patch.socials {
            next.socials = section;
        }
        next
    }

    /// JSON value of a single section.
    pub fn section_value(&self, section: Section) -> Result<Value> {
        let value = match section {
            Section::NavLinks => serde_json::to_value(&self.nav_links)?,
            Section::Hero => serde_json::to_value(&self.hero)?,
            Section::ResumeUrls => serde_json::to_value(&self.resume_urls)?,
            Section::CurrentFocus => serde_json::to_value(&self.current_focus)?,
            Section::Background => serde_json::to_value(&self.background)?,
            Section::Projects => serde_json::to_value(&self.projects)?,
            Section::Interests => serde_json::to_value(&self.interests)?,
            Section::Contact => serde_json::to_value(&self.contact)?,
            Section::SectionTitles => serde_json::to_value(&self.section_titles)?,
            Section::Socials => serde_json::to_value(&self.socials)?,
        };
        Ok(value)
    }

    /// SHA-256 over the icon-stripped JSON form, i.e. over exactly what a
    /// draft or a published copy would contain.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&strip_icons(self))?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentDocument {
        defaults::builtin().unwrap()
    }

    #[test]
    fn merge_replaces_named_sections_only() {
        let base = sample();
        let patch = ContentPatch::from_json(
            r#"{"hero": {"en": {"name": "Remote Name"}, "zh": {"name": "远程"}}}"#,
        )
        .unwrap();
        let merged = base.merged(patch);

        assert_eq!(merged.hero.en.name, "Remote Name");
        // Whole-key replacement: fields the patch left out are not kept.
        assert_eq!(merged.hero.en.tagline, "");
        assert_eq!(merged.projects, base.projects);
        assert_eq!(merged.socials, base.socials);
    }

    #[test]
    fn merge_does_not_touch_source_document() {
        let base = sample();
        let before = base.clone();
        let _ = base.merged(ContentPatch {
            socials: Some(Vec::new()),
            ..ContentPatch::default()
        });
        assert_eq!(base, before);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let patch = ContentPatch::from_json(r#"{"themes": [], "resumeUrls": {"en": "/a.pdf", "zh": "/b.pdf"}}"#)
            .unwrap();
        assert_eq!(patch.sections(), vec![Section::ResumeUrls]);
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        for raw in ["{not json", "[1, 2]", r#"{"projects": "nope"}"#, r#"{"projects": {"en": [{"category": "Tool"}]}}"#] {
            let err = ContentPatch::from_json(raw).unwrap_err();
            assert!(matches!(err, FolioError::Parse(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn null_section_counts_as_absent() {
        let patch = ContentPatch::from_json(r#"{"hero": null}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn without_icons_clears_incoming_identifiers() {
        let patch = ContentPatch::from_json(
            r#"{"socials": [{"platform": "GitHub", "url": "u", "icon": "twitter"}],
                "interests": {"en": [{"id": "a", "title": "A", "icon": "Gamepad2"}], "zh": []}}"#,
        )
        .unwrap()
        .without_icons();
        let socials = patch.socials.unwrap();
        assert_eq!(socials[0].icon, None);
        assert_eq!(socials[0].platform, "GitHub");
        assert_eq!(patch.interests.unwrap().en[0].icon, None);
    }

    #[test]
    fn full_patch_round_trips_document() {
        let doc = sample();
        let merged = sample().merged(ContentPatch::from(doc.clone()));
        assert_eq!(merged, doc);
        assert_eq!(ContentPatch::from(doc).sections().len(), Section::ALL.len());
    }

    #[test]
    fn fingerprint_ignores_icons() {
        let doc = sample();
        let stripped = strip_icons(&doc);
        assert_eq!(doc.fingerprint().unwrap(), stripped.fingerprint().unwrap());

        let mut edited = doc.clone();
        edited.hero.en.name = "Changed".into();
        assert_ne!(doc.fingerprint().unwrap(), edited.fingerprint().unwrap());
    }
}
