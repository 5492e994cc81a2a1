use folio::content::edit::{self, NewProject};
use folio::content::{ContentPatch, Language};
use folio::error::ErrorCode;
use folio::resolver::{LoadStage, Provenance};
use folio::storage::StateKey;
use httpmock::prelude::*;

use crate::fixture::{Session, defaults_doc, published_json};

fn remote_with_name(name: &str) -> String {
    let mut doc = defaults_doc();
    doc.hero.en.name = name.to_string();
    published_json(&doc)
}

fn save_draft_with_name(session: &Session, name: &str) {
    let mut hero = session.resolver.document().hero.clone();
    hero.en.name = name.to_string();
    session.resolver.update(ContentPatch {
        hero: Some(hero),
        ..ContentPatch::default()
    });
    session.resolver.save_draft().unwrap();
}

#[test]
fn remote_success_ignores_the_draft() {
    let server = MockServer::start();
    let remote = server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(remote_with_name("Remote Name"));
    });

    let session = Session::new(Some(server.url("/content.json")));
    save_draft_with_name(&session, "Draft Name");

    let resolution = session.resolver.load();
    remote.assert();
    assert_eq!(resolution.provenance, Provenance::RemoteFixed);
    assert!(resolution.draft_shadowed);
    assert_eq!(resolution.document.hero.en.name, "Remote Name");
    // Published copies carry no icons; they come back from the defaults.
    assert_eq!(resolution.document.socials, defaults_doc().socials);
    // The draft is still there, just not used.
    assert!(session.resolver.drafts().exists().unwrap());
}

#[test]
fn server_error_falls_back_to_the_draft() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(500).body("boom");
    });

    let session = Session::new(Some(server.url("/content.json")));
    save_draft_with_name(&session, "Draft Name");

    let resolution = session.resolver.load();
    assert_eq!(resolution.provenance, Provenance::LocalDraft);
    assert_eq!(resolution.document.hero.en.name, "Draft Name");
    assert_eq!(resolution.failures.len(), 1);
    assert_eq!(resolution.failures[0].stage, LoadStage::Remote);
    assert_eq!(resolution.failures[0].code, ErrorCode::NetworkUnreachable);
}

#[test]
fn malformed_remote_body_falls_back_to_defaults() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(200).body("{\"hero\": ");
    });

    let session = Session::new(Some(server.url("/content.json")));
    let resolution = session.resolver.load();
    assert_eq!(resolution.provenance, Provenance::StaticDefault);
    assert_eq!(resolution.document, defaults_doc());
    assert_eq!(resolution.failures[0].code, ErrorCode::ContentParseError);
}

#[test]
fn partial_remote_document_keeps_default_sections() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(200)
            .body(r#"{"resumeUrls": {"en": "/remote.pdf", "zh": "/remote_cn.pdf"}}"#);
    });

    let session = Session::new(Some(server.url("/content.json")));
    let resolution = session.resolver.load();
    let defaults = defaults_doc();
    assert_eq!(resolution.provenance, Provenance::RemoteFixed);
    assert_eq!(resolution.document.resume_urls.en, "/remote.pdf");
    assert_eq!(resolution.document.projects, defaults.projects);
    assert_eq!(resolution.document.hero, defaults.hero);
}

#[test]
fn override_url_clears_the_draft_and_persists() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/published.json");
        then.status(200).body(remote_with_name("Published"));
    });

    let session = Session::new(None);
    save_draft_with_name(&session, "Draft Name");

    let resolution = session
        .resolver
        .set_override_url(Some(&server.url("/published.json")))
        .unwrap();
    assert_eq!(resolution.provenance, Provenance::RemoteDynamic);
    assert!(!resolution.draft_shadowed);
    assert!(!session.resolver.drafts().exists().unwrap());

    let session = session.reopen(None);
    assert_eq!(
        session.store.get(StateKey::OverrideUrl).unwrap().as_deref(),
        Some(server.url("/published.json").as_str())
    );
    let resolution = session.resolver.load();
    assert_eq!(resolution.provenance, Provenance::RemoteDynamic);
    assert_eq!(resolution.document.hero.en.name, "Published");
}

#[test]
fn fixed_url_outranks_the_override() {
    let server = MockServer::start();
    let fixed = server.mock(|when, then| {
        when.method(GET).path("/fixed.json");
        then.status(200).body(remote_with_name("Fixed"));
    });
    let dynamic = server.mock(|when, then| {
        when.method(GET).path("/dynamic.json");
        then.status(200).body(remote_with_name("Dynamic"));
    });

    let session = Session::new(Some(server.url("/fixed.json")));
    session
        .store
        .set(StateKey::OverrideUrl, &server.url("/dynamic.json"))
        .unwrap();

    let resolution = session.resolver.load();
    assert_eq!(resolution.provenance, Provenance::RemoteFixed);
    assert_eq!(resolution.document.hero.en.name, "Fixed");
    fixed.assert();
    dynamic.assert_hits(0);
}

#[test]
fn added_project_survives_reopen_through_the_draft() {
    let session = Session::new(None);
    session.resolver.load();
    let id = session
        .resolver
        .edit_with(|doc| {
            let (patch, id) = edit::add_project(doc, Language::En, NewProject::default());
            Ok((patch, id))
        })
        .unwrap();
    assert_eq!(session.resolver.document().projects.en.len(), 5);
    session.resolver.save_draft().unwrap();

    let session = session.reopen(None);
    let resolution = session.resolver.load();
    assert_eq!(resolution.provenance, Provenance::LocalDraft);
    assert_eq!(resolution.document.projects.en.len(), 5);
    assert_eq!(resolution.document.projects.en[4].id, id);
    assert_eq!(resolution.document.projects.zh.len(), 4);
    // Icons were stripped on save and restored on load.
    assert_eq!(resolution.document.interests, defaults_doc().interests);
}
