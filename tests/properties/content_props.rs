use proptest::prelude::*;

use folio::content::{
    Category, ContentDocument, ContentPatch, IconId, Interest, Language, Project, Social,
    defaults, fill_missing_icons, rehydrate_icons, strip_icons,
};
use folio::content::edit::{self, Confirmation, NewProject};

fn arb_icon() -> impl Strategy<Value = Option<IconId>> {
    prop_oneof![Just(None), prop::sample::select(IconId::ALL.to_vec()).prop_map(Some)]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Game), Just(Category::Web), Just(Category::Other)]
}

fn arb_project() -> impl Strategy<Value = Project> {
    (
        "[a-z0-9]{1,12}",
        ".{0,40}",
        arb_category(),
        ".{0,80}",
        prop::collection::vec("[A-Za-z+#]{1,10}", 0..4),
        prop::option::of("https://[a-z]{3,10}\\.dev/[a-z]{0,8}"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(id, title, category, description, technologies, demo_url, featured)| Project {
                id,
                title,
                category,
                description,
                technologies,
                image_url: "https://picsum.photos/800/450".to_string(),
                demo_url,
                repo_url: None,
                featured,
            },
        )
}

fn arb_social() -> impl Strategy<Value = Social> {
    ("[A-Za-z]{2,10}", "https://[a-z]{3,10}\\.com/[a-z]{0,8}", arb_icon()).prop_map(
        |(platform, url, icon)| Social {
            platform,
            url,
            icon,
        },
    )
}

fn arb_interest() -> impl Strategy<Value = Interest> {
    ("[a-z]{1,8}", ".{0,20}", arb_icon(), ".{0,40}").prop_map(
        |(id, title, icon, description)| Interest {
            id,
            title,
            icon,
            description,
        },
    )
}

/// The built-in document with generated projects, socials and interests.
fn arb_document() -> impl Strategy<Value = ContentDocument> {
    (
        prop::collection::vec(arb_project(), 0..6),
        prop::collection::vec(arb_project(), 0..6),
        prop::collection::vec(arb_social(), 0..5),
        prop::collection::vec(arb_interest(), 0..5),
    )
        .prop_map(|(en, zh, socials, interests)| {
            let mut doc = defaults::builtin().unwrap();
            doc.projects.en = en;
            doc.projects.zh = zh;
            doc.socials = socials;
            doc.interests.en = interests.clone();
            doc.interests.zh = interests;
            doc
        })
}

fn has_any_icon(doc: &ContentDocument) -> bool {
    doc.socials.iter().any(|s| s.icon.is_some())
        || doc
            .interests
            .en
            .iter()
            .chain(&doc.interests.zh)
            .any(|i| i.icon.is_some())
}

proptest! {
    #[test]
    fn stripped_documents_never_carry_icons(doc in arb_document()) {
        let stripped = strip_icons(&doc);
        prop_assert!(!has_any_icon(&stripped));
        // Text survives stripping.
        prop_assert_eq!(stripped.projects, doc.projects);
        prop_assert_eq!(stripped.socials.len(), doc.socials.len());
    }

    #[test]
    fn json_round_trip_preserves_stripped_document(doc in arb_document()) {
        let stripped = strip_icons(&doc);
        let json = serde_json::to_string(&stripped).unwrap();
        let patch = ContentPatch::from_json(&json).unwrap();
        let restored = defaults::builtin().unwrap().merged(patch);
        prop_assert_eq!(restored, stripped);
    }

    #[test]
    fn rehydrated_documents_always_have_icons_at_the_head(doc in arb_document()) {
        let defaults = defaults::builtin().unwrap();
        let rehydrated = rehydrate_icons(strip_icons(&doc), &defaults);
        prop_assert_eq!(&rehydrated.socials, &defaults.socials);
        prop_assert_eq!(&rehydrated.interests, &defaults.interests);
        prop_assert_eq!(rehydrated.projects, doc.projects);
    }

    #[test]
    fn fill_missing_icons_keeps_text(doc in arb_document()) {
        let defaults = defaults::builtin().unwrap();
        let filled = fill_missing_icons(strip_icons(&doc), &defaults);
        let urls: Vec<_> = filled.socials.iter().map(|s| s.url.clone()).collect();
        let expected: Vec<_> = doc.socials.iter().map(|s| s.url.clone()).collect();
        prop_assert_eq!(urls, expected);
        // Positions covered by the defaults always get an icon back.
        for social in filled.socials.iter().take(defaults.socials.len()) {
            prop_assert!(social.icon.is_some());
        }
    }

    #[test]
    fn add_then_remove_is_identity(doc in arb_document(), zh in any::<bool>()) {
        let lang = if zh { Language::Zh } else { Language::En };
        let (patch, id) = edit::add_project(&doc, lang, NewProject::default());
        let added = doc.merged(patch);
        prop_assert_eq!(added.projects.get(lang).len(), doc.projects.get(lang).len() + 1);
        prop_assert!(doc.projects.get(lang).iter().all(|p| p.id != id));

        let patch = edit::remove_project(&added, lang, &id, Confirmation::Confirmed).unwrap();
        prop_assert_eq!(added.merged(patch), doc);
    }
}
