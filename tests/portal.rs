//! Portal route table.

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

use rauta::config::{PortalConfig, RautaConfig};
use rauta::navigation::{MemoryHistory, Router};
use rauta::portal::{route_table, Page, PageKind};
use rauta::preload::{EchoClient, Preloader, QueryState};

mod common;
use common::{url, CountingClient};

const KEY: &str = "AbCdEfGhIjK";

fn matched(path: &str) -> (String, Page, Vec<(&'static str, serde_json::Value)>) {
    let client = CountingClient::new();
    let preloader = Preloader::new(Arc::new(client.clone()));
    let table = route_table(&PortalConfig::default()).unwrap();

    let result = table.match_route(&url(path), &preloader);
    let route = result.route().to_string();
    let page = result.render();
    result.dispose().unwrap();
    assert_eq!(client.outstanding(), 0);

    let preloads = client.records().into_iter().map(|r| (r.query, r.variables)).collect();
    (route, page, preloads)
}

#[test]
fn test_route_order() {
    let table = route_table(&PortalConfig::default()).unwrap();
    let names: Vec<&str> = table.names().collect();
    assert_eq!(
        names,
        vec![
            "home",
            "about",
            "login",
            "video",
            "series",
            "manage",
            "manage-videos",
            "manage-video",
            "manage-realm",
            "add-child",
            "upload",
            "realm-video",
            "realm",
            "not-found",
        ]
    );
}

#[test]
fn test_static_pages_preload_nothing() {
    let (route, page, preloads) = matched("/~about");
    assert_eq!(route, "about");
    assert_eq!(page.kind, PageKind::About);
    assert!(preloads.is_empty());

    let (route, _, preloads) = matched("/~login/");
    assert_eq!(route, "login");
    assert!(preloads.is_empty());
}

#[test]
fn test_home_and_realms() {
    let (route, page, preloads) = matched("/");
    assert_eq!(route, "home");
    assert_eq!(page.kind, PageKind::Realm { path: String::new() });
    assert_eq!(preloads, vec![("RealmQuery", json!({ "path": "" }))]);

    let (route, page, preloads) = matched("/math/linear-algebra");
    assert_eq!(route, "realm");
    assert_eq!(page.kind, PageKind::Realm { path: "/math/linear-algebra".into() });
    assert_eq!(preloads, vec![("RealmQuery", json!({ "path": "/math/linear-algebra" }))]);
}

#[test]
fn test_direct_video_and_series() {
    let (route, page, preloads) = matched(&format!("/!v/{KEY}"));
    assert_eq!(route, "video");
    assert_eq!(
        page.kind,
        PageKind::Video { id: format!("ev{KEY}"), realm: None }
    );
    assert_eq!(preloads, vec![("VideoPageQuery", json!({ "id": format!("ev{KEY}") }))]);
    assert!(page.is_loading());

    let (route, page, _) = matched(&format!("/!s/{KEY}"));
    assert_eq!(route, "series");
    assert_eq!(page.kind, PageKind::Series { id: format!("sr{KEY}") });
}

#[test]
fn test_invalid_keys_are_not_found() {
    // A declined match falls through to the realm route, which refuses
    // `!` segments, and ends at the fallback. Portal routes validate before
    // preloading, so nothing is fetched on the way.
    let (route, page, preloads) = matched("/!v/short");
    assert_eq!(route, "not-found");
    assert!(preloads.is_empty());
    assert_eq!(page.kind, PageKind::NotFound { path: "/!v/short".into() });

    let (route, _, _) = matched("/~manage/videos/Z__________");
    assert_eq!(route, "not-found");
}

#[test]
fn test_video_inside_realm_preloads_two_queries() {
    let (route, page, preloads) = matched(&format!("/math/la/v/{KEY}"));
    assert_eq!(route, "realm-video");
    assert_eq!(
        page.kind,
        PageKind::Video { id: format!("ev{KEY}"), realm: Some("/math/la".into()) }
    );
    assert_eq!(
        preloads,
        vec![
            ("RealmNavQuery", json!({ "path": "/math/la" })),
            ("VideoPageQuery", json!({ "id": format!("ev{KEY}"), "realmPath": "/math/la" })),
        ]
    );
    assert_eq!(page.data.len(), 2);
}

#[test]
fn test_manage_pages() {
    assert_eq!(matched("/~manage").0, "manage");
    assert_eq!(matched("/~manage/videos").0, "manage-videos");
    assert_eq!(matched(&format!("/~manage/videos/{KEY}")).0, "manage-video");
    assert_eq!(matched("/~manage/upload").0, "upload");

    let (route, page, _) = matched("/~manage/realm?path=%2Fmath");
    assert_eq!(route, "manage-realm");
    assert_eq!(page.kind, PageKind::ManageRealm { path: "/math".into() });

    let (route, page, _) = matched("/~manage/realm/add-child?parent=/math");
    assert_eq!(route, "add-child");
    assert_eq!(page.kind, PageKind::AddChild { parent: "/math".into() });

    // Required query parameter missing.
    assert_eq!(matched("/~manage/realm").0, "not-found");
}

#[test]
fn test_reserved_and_special_paths() {
    assert_eq!(matched("/favicon.ico").0, "not-found");
    assert_eq!(matched("/.well-known/security.txt").0, "not-found");
    assert_eq!(matched("/~unknown").0, "not-found");
    assert_eq!(matched("/math/~x").0, "not-found");
    // Only top-level segments are reserved.
    assert_eq!(matched("/lectures/robots.txt").0, "realm");

    let config = PortalConfig {
        reserved_paths: vec!["/Shibboleth.sso".into()],
    };
    let table = route_table(&config).unwrap();
    let preloader = Preloader::new(Arc::new(CountingClient::new()));
    assert_eq!(table.probe(&url("/Shibboleth.sso"), &preloader), "not-found");
    // Built-in reserved paths stay reserved.
    assert_eq!(table.probe(&url("/robots.txt"), &preloader), "not-found");
}

#[test]
fn test_router_renders_portal_pages() {
    let history = MemoryHistory::new(url("/"));
    let router = Router::start(
        route_table(&PortalConfig::default()).unwrap(),
        Arc::new(EchoClient),
        history,
        &RautaConfig::default(),
    )
    .unwrap();

    router.goto(&format!("/math/v/{KEY}")).unwrap();
    let page = router.active().render().unwrap();
    assert!(!page.is_loading());
    assert!(matches!(page.data[1].1, QueryState::Ready(_)));
    assert_eq!(
        page.to_string(),
        format!("video ev{KEY} in /math [RealmNavQuery: ready, VideoPageQuery: ready]")
    );

    assert_eq!(
        router.url_for("video", &[("id", KEY)]).unwrap().unwrap(),
        url(&format!("/!v/{KEY}"))
    );
    router.shutdown();
}

proptest! {
    #[test]
    fn test_any_path_resolves_and_releases(path in "(/[a-zA-Z0-9~!._-]{1,12}){0,4}") {
        let client = CountingClient::new();
        let preloader = Preloader::new(Arc::new(client.clone()));
        let table = route_table(&PortalConfig::default()).unwrap();

        let target = url(if path.is_empty() { "/" } else { &path });
        let result = table.match_route(&target, &preloader);
        prop_assert!(!result.route().is_empty());
        prop_assert!(client.outstanding() <= 2);
        result.dispose().unwrap();
        prop_assert_eq!(client.outstanding(), 0);
    }
}
