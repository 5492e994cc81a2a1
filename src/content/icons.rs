//! Icon identifiers and the icon-handling rules for persisted content.
//!
//! Documents only ever carry an [`IconId`], never the renderable icon. Every
//! path that writes content out (drafts, publishing) strips icons entirely;
//! every path that reads content back restores them from the static defaults.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::schema::{ContentDocument, Interest, Localized, Social};

/// Handle into the site's fixed built-in icon pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconId {
    Github,
    Gamepad,
    Linkedin,
    Mail,
    Twitter,
    Terminal,
    Palette,
    Cpu,
    Globe,
    Code,
    Monitor,
}

impl IconId {
    pub const ALL: [Self; 11] = [
        Self::Github,
        Self::Gamepad,
        Self::Linkedin,
        Self::Mail,
        Self::Twitter,
        Self::Terminal,
        Self::Palette,
        Self::Cpu,
        Self::Globe,
        Self::Code,
        Self::Monitor,
    ];

    /// Stable identifier stored in documents.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gamepad => "gamepad",
            Self::Linkedin => "linkedin",
            Self::Mail => "mail",
            Self::Twitter => "twitter",
            Self::Terminal => "terminal",
            Self::Palette => "palette",
            Self::Cpu => "cpu",
            Self::Globe => "globe",
            Self::Code => "code",
            Self::Monitor => "monitor",
        }
    }

    /// Component name in the presentation layer's icon pack.
    #[must_use]
    pub const fn glyph_name(self) -> &'static str {
        match self {
            Self::Github => "Github",
            Self::Gamepad => "Gamepad2",
            Self::Linkedin => "Linkedin",
            Self::Mail => "Mail",
            Self::Twitter => "Twitter",
            Self::Terminal => "Terminal",
            Self::Palette => "Palette",
            Self::Cpu => "Cpu",
            Self::Globe => "Globe",
            Self::Code => "Code",
            Self::Monitor => "Monitor",
        }
    }

    /// Accepts either the identifier or the glyph name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|icon| icon.key() == key || icon.glyph_name() == key)
    }
}

/// Anything that is not a known identifier reads as "no icon". Only the
/// defaults file keeps what this parses; documents from elsewhere go through
/// [`ContentPatch::without_icons`](super::ContentPatch::without_icons).
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<IconId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(IconId::from_key))
}

/// Copy of `doc` with every Social and Interest icon cleared.
#[must_use]
pub fn strip_icons(doc: &ContentDocument) -> ContentDocument {
    let mut stripped = doc.clone();
    for social in &mut stripped.socials {
        social.icon = None;
    }
    for list in [&mut stripped.interests.en, &mut stripped.interests.zh] {
        for interest in list.iter_mut() {
            interest.icon = None;
        }
    }
    stripped
}

/// True when the socials list carries no usable icon at its head.
#[must_use]
pub fn icons_missing(doc: &ContentDocument) -> bool {
    doc.socials.first().is_none_or(|social| social.icon.is_none())
}

/// Restores icon-bearing sections after a load.
///
/// Icons never come from an external source, so when the head of the socials
/// list has lost its icon both `socials` and `interests` are replaced
/// wholesale by the static defaults.
#[must_use]
pub fn rehydrate_icons(mut doc: ContentDocument, defaults: &ContentDocument) -> ContentDocument {
    if icons_missing(&doc) {
        doc.socials = defaults.socials.clone();
        doc.interests = defaults.interests.clone();
    }
    doc
}

/// Entry-level icon restore: each entry without an icon takes the icon of the
/// default entry with the same id (platform for socials), falling back to the
/// default entry at the same position. Text content is kept.
#[must_use]
pub fn fill_missing_icons(mut doc: ContentDocument, defaults: &ContentDocument) -> ContentDocument {
    fill_socials(&mut doc.socials, &defaults.socials);
    fill_interests(&mut doc.interests, &defaults.interests);
    doc
}

fn fill_socials(socials: &mut [Social], defaults: &[Social]) {
    for (index, social) in socials.iter_mut().enumerate() {
        if social.icon.is_some() {
            continue;
        }
        social.icon = defaults
            .iter()
            .find(|candidate| candidate.platform == social.platform)
            .or_else(|| defaults.get(index))
            .and_then(|candidate| candidate.icon);
    }
}

fn fill_interests(interests: &mut Localized<Vec<Interest>>, defaults: &Localized<Vec<Interest>>) {
    for (list, default_list) in [
        (&mut interests.en, &defaults.en),
        (&mut interests.zh, &defaults.zh),
    ] {
        for (index, interest) in list.iter_mut().enumerate() {
            if interest.icon.is_some() {
                continue;
            }
            interest.icon = default_list
                .iter()
                .find(|candidate| candidate.id == interest.id)
                .or_else(|| default_list.get(index))
                .and_then(|candidate| candidate.icon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults;

    #[test]
    fn defaults_file_icons_parse_by_key_or_glyph_name() {
        assert_eq!(IconId::from_key("Gamepad2"), Some(IconId::Gamepad));
        assert_eq!(IconId::from_key("github"), Some(IconId::Github));
        let doc = defaults::builtin().unwrap();
        assert!(doc.socials.iter().all(|social| social.icon.is_some()));
    }

    #[test]
    fn incoming_icons_are_replaced_by_defaults() {
        let doc = defaults::builtin().unwrap();
        let mut foreign = doc.clone();
        foreign.socials[0].icon = Some(IconId::Twitter);
        foreign.socials[1].icon = None;
        let patch = crate::content::ContentPatch::from(foreign).without_icons();
        let restored = fill_missing_icons(rehydrate_icons(doc.merged(patch), &doc), &doc);
        assert_eq!(restored.socials, doc.socials);
    }

    #[test]
    fn lenient_icon_drops_unknown_shapes() {
        for raw in [
            r#"{"platform":"X","url":"u","icon":null}"#,
            r#"{"platform":"X","url":"u","icon":{"$$typeof":"react.forward_ref"}}"#,
            r#"{"platform":"X","url":"u","icon":"Sparkles"}"#,
            r#"{"platform":"X","url":"u"}"#,
        ] {
            let social: Social = serde_json::from_str(raw).unwrap();
            assert_eq!(social.icon, None, "{raw}");
        }
    }

    #[test]
    fn strip_clears_every_icon_and_nothing_else() {
        let doc = defaults::builtin().unwrap();
        let stripped = strip_icons(&doc);
        assert!(stripped.socials.iter().all(|s| s.icon.is_none()));
        assert!(stripped.interests.en.iter().all(|i| i.icon.is_none()));
        assert!(stripped.interests.zh.iter().all(|i| i.icon.is_none()));
        assert_eq!(stripped.socials[0].url, doc.socials[0].url);
        assert_eq!(stripped.projects, doc.projects);
    }

    #[test]
    fn rehydrate_replaces_sections_when_head_icon_missing() {
        let doc = defaults::builtin().unwrap();
        let mut edited = strip_icons(&doc);
        edited.socials[0].url = "https://example.com".into();
        let restored = rehydrate_icons(edited, &doc);
        assert_eq!(restored.socials, doc.socials);
        assert_eq!(restored.interests, doc.interests);
    }

    #[test]
    fn rehydrate_keeps_sections_with_icons() {
        let doc = defaults::builtin().unwrap();
        let mut edited = doc.clone();
        edited.socials[1].url = "https://example.com".into();
        let restored = rehydrate_icons(edited.clone(), &doc);
        assert_eq!(restored, edited);
    }

    #[test]
    fn rehydrate_treats_empty_socials_as_missing() {
        let doc = defaults::builtin().unwrap();
        let mut edited = doc.clone();
        edited.socials.clear();
        let restored = rehydrate_icons(edited, &doc);
        assert_eq!(restored.socials, doc.socials);
    }

    #[test]
    fn fill_missing_matches_by_id_then_position() {
        let doc = defaults::builtin().unwrap();
        let mut edited = strip_icons(&doc);
        edited.interests.en.reverse();
        edited.interests.en[0].title = "Renamed".into();
        edited.socials.push(Social {
            platform: "Mastodon".into(),
            url: "https://mastodon.social/@me".into(),
            icon: None,
        });

        let filled = fill_missing_icons(edited, &doc);
        assert_eq!(filled.interests.en[0].title, "Renamed");
        assert_eq!(filled.interests.en[0].icon, doc.interests.en[3].icon);
        assert_eq!(filled.socials[0].icon, doc.socials[0].icon);
        // No default at index 4: the extra entry stays without an icon.
        assert_eq!(filled.socials[4].icon, None);
    }
}
