use folio::FolioError;
use folio::content::ContentPatch;
use folio::publish::Publisher;
use folio::resolver::Provenance;
use folio::storage::StateKey;
use httpmock::prelude::*;
use serde_json::json;

use crate::fixture::Session;

const REV: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn gist_response(server: &MockServer, id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "files": {
            "content.json": {
                "raw_url": server.url(format!("/me/{id}/raw/{REV}/content.json")),
            }
        }
    })
}

fn rename(session: &Session, name: &str) {
    let mut hero = session.resolver.document().hero.clone();
    hero.en.name = name.to_string();
    session.resolver.update(ContentPatch {
        hero: Some(hero),
        ..ContentPatch::default()
    });
}

#[test]
fn publish_then_update_the_same_document() {
    let server = MockServer::start();
    let session = Session::new(None);
    session.resolver.load();
    rename(&session, "First Publish");
    session.resolver.save_draft().unwrap();

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/gists")
            .header("Authorization", "Bearer secret");
        then.status(201).json_body(gist_response(&server, "doc1"));
    });
    let raw = server.mock(|when, then| {
        when.method(GET).path("/me/doc1/raw/content.json");
        then.status(200)
            .body(Publisher::payload(&session.resolver.document()).unwrap());
    });

    let publisher = session.publisher(server.url("/gists"));
    let outcome = publisher
        .publish_session(&session.resolver, Some("secret"), None, true)
        .unwrap();
    create.assert();
    raw.assert();
    assert!(outcome.result.created);
    assert_eq!(outcome.result.doc_id, "doc1");
    assert_eq!(
        outcome.result.fetch_url,
        server.url("/me/doc1/raw/content.json")
    );

    let applied = outcome.applied.unwrap();
    assert_eq!(applied.provenance, Provenance::RemoteDynamic);
    assert_eq!(applied.document.hero.en.name, "First Publish");
    assert!(!session.resolver.drafts().exists().unwrap());
    assert_eq!(
        session.store.get(StateKey::PublishDocId).unwrap().as_deref(),
        Some("doc1")
    );

    // Second publish reuses the saved token and id.
    let update = server.mock(|when, then| {
        when.method(PATCH)
            .path("/gists/doc1")
            .header("Authorization", "Bearer secret");
        then.status(200).json_body(gist_response(&server, "doc1"));
    });
    rename(&session, "Second Publish");
    let outcome = publisher
        .publish_session(&session.resolver, None, None, false)
        .unwrap();
    update.assert();
    assert!(!outcome.result.created);
    assert!(outcome.applied.is_none());

    let history = session.store.publish_history(10).unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history[0].created);
    assert!(history[1].created);
    assert_ne!(history[0].fingerprint, history[1].fingerprint);
}

#[test]
fn rejected_token_persists_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/gists");
        then.status(401).json_body(json!({"message": "Bad credentials"}));
    });

    let session = Session::new(None);
    session.resolver.load();
    let publisher = session.publisher(server.url("/gists"));
    let err = publisher
        .publish_session(&session.resolver, Some("wrong"), None, true)
        .unwrap_err();

    assert!(matches!(err, FolioError::Auth(ref msg) if msg.contains("Bad credentials")));
    assert_eq!(session.store.get(StateKey::PublishToken).unwrap(), None);
    assert_eq!(session.store.get(StateKey::PublishDocId).unwrap(), None);
    assert_eq!(session.store.get(StateKey::OverrideUrl).unwrap(), None);
    assert!(session.store.publish_history(10).unwrap().is_empty());
}

#[test]
fn server_failure_is_a_remote_service_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path("/gists/gone");
        then.status(404).json_body(json!({"message": "Not Found"}));
    });

    let session = Session::new(None);
    session.resolver.load();
    let err = session
        .publisher(server.url("/gists"))
        .publish_session(&session.resolver, Some("tok"), Some("gone"), false)
        .unwrap_err();
    assert!(matches!(err, FolioError::RemoteService { status: 404, .. }));
}
