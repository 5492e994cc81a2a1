//! Typed shape of the editable site content.
//!
//! Field names are camelCase on the wire so documents written by the
//! site's own admin panel parse unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::icons::{self, IconId};
use crate::error::{FolioError, Result};

// =============================================================================
// LANGUAGE
// =============================================================================

/// Supported content languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::En, Self::Zh];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(FolioError::InvalidEdit(format!(
                "unsupported language: {other} (expected en or zh)"
            ))),
        }
    }
}

/// A value held once per supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default)]
    pub en: T,
    #[serde(default)]
    pub zh: T,
}

impl<T> Localized<T> {
    pub const fn new(en: T, zh: T) -> Self {
        Self { en, zh }
    }

    pub fn get(&self, lang: Language) -> &T {
        match lang {
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }

    pub fn get_mut(&mut self, lang: Language) -> &mut T {
        match lang {
            Language::En => &mut self.en,
            Language::Zh => &mut self.zh,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Localized<U> {
        Localized {
            en: f(&self.en),
            zh: f(&self.zh),
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroBadges {
    pub code: String,
    pub design: String,
    pub open_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub greeting: String,
    pub name: String,
    pub role: String,
    pub tagline: String,
    pub view_work: String,
    pub contact_me: String,
    pub badges: HeroBadges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentFocus {
    pub label: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub link: String,
    pub link_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub title: String,
    pub summary: String,
    pub core_focus_title: String,
    pub core_focus_desc: String,
    pub skills_title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub title: String,
    pub text: String,
    pub email_btn: String,
    pub resume_btn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionTitles {
    pub projects: String,
    pub projects_subtitle: String,
    pub interests: String,
    pub interests_subtitle: String,
}

/// Closed set of project categories. The site only knows how to render these.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Category {
    #[default]
    Game,
    Web,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Game => "Game",
            Self::Web => "Web",
            Self::Other => "Other",
        })
    }
}

impl FromStr for Category {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "game" => Ok(Self::Game),
            "web" => Ok(Self::Web),
            "other" => Ok(Self::Other),
            other => Err(FolioError::InvalidEdit(format!(
                "unknown category: {other} (expected Game, Web or Other)"
            ))),
        }
    }
}

/// A project card. `id` is the render key and the join key for edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub technologies: Vec<String>,
    /// URL or embedded `data:` URI.
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interest {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "icons::deserialize_lenient")]
    pub icon: Option<IconId>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub platform: String,
    pub url: String,
    #[serde(deserialize_with = "icons::deserialize_lenient")]
    pub icon: Option<IconId>,
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// The full editable content record for the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub nav_links: Localized<Vec<NavLink>>,
    pub hero: Localized<Hero>,
    pub resume_urls: Localized<String>,
    pub current_focus: Localized<CurrentFocus>,
    pub background: Localized<Background>,
    pub projects: Localized<Vec<Project>>,
    pub interests: Localized<Vec<Interest>>,
    pub contact: Localized<Contact>,
    pub section_titles: Localized<SectionTitles>,
    pub socials: Vec<Social>,
}

/// Top-level keys of a [`ContentDocument`]; the unit of merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    NavLinks,
    Hero,
    ResumeUrls,
    CurrentFocus,
    Background,
    Projects,
    Interests,
    Contact,
    SectionTitles,
    Socials,
}

impl Section {
    pub const ALL: [Self; 10] = [
        Self::NavLinks,
        Self::Hero,
        Self::ResumeUrls,
        Self::CurrentFocus,
        Self::Background,
        Self::Projects,
        Self::Interests,
        Self::Contact,
        Self::SectionTitles,
        Self::Socials,
    ];

    /// Wire key of this section.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NavLinks => "navLinks",
            Self::Hero => "hero",
            Self::ResumeUrls => "resumeUrls",
            Self::CurrentFocus => "currentFocus",
            Self::Background => "background",
            Self::Projects => "projects",
            Self::Interests => "interests",
            Self::Contact => "contact",
            Self::SectionTitles => "sectionTitles",
            Self::Socials => "socials",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
