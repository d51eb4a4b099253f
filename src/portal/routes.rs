//! Portal route table.
//!
//! # Responsibilities
//! - Register every portal page in match order
//! - Validate keys and realm paths inside the match factories
//! - Preload each page's queries at match time

use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::PortalConfig;
use crate::error::PatternError;
use crate::portal::{Page, PageKind};
use crate::preload::{QueryHandle, QuerySpec};
use crate::routing::{MatchResult, PathPattern, Route, RouteTable, WithQuery};

/// Top-level paths that are never realms, whatever the configuration says.
const BUILTIN_RESERVED: &[&str] = &["favicon.ico", "robots.txt", ".well-known"];

const KEY_DIGITS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

pub const REALM_QUERY: QuerySpec = QuerySpec::new(
    "RealmQuery",
    "query RealmQuery($path: String!) { realmByPath(path: $path) { id name blocks { id } } }",
);
pub const REALM_NAV_QUERY: QuerySpec = QuerySpec::new(
    "RealmNavQuery",
    "query RealmNavQuery($path: String!) { \
     realmByPath(path: $path) { id name children { path name } } }",
);
pub const VIDEO_QUERY: QuerySpec = QuerySpec::new(
    "VideoPageQuery",
    "query VideoPageQuery($id: ID!) { event: eventById(id: $id) { id title description } }",
);
pub const SERIES_QUERY: QuerySpec = QuerySpec::new(
    "SeriesPageQuery",
    "query SeriesPageQuery($id: ID!) { series: seriesById(id: $id) { id title events { id } } }",
);
pub const MANAGE_QUERY: QuerySpec = QuerySpec::new(
    "ManageQuery",
    "query ManageQuery { currentUser { username canUpload } }",
);
pub const MANAGE_VIDEOS_QUERY: QuerySpec = QuerySpec::new(
    "ManageVideosQuery",
    "query ManageVideosQuery { currentUser { myVideos { id title } } }",
);
pub const MANAGE_VIDEO_QUERY: QuerySpec = QuerySpec::new(
    "ManageVideoQuery",
    "query ManageVideoQuery($id: ID!) { event: eventById(id: $id) { id title canWrite } }",
);
pub const MANAGE_REALM_QUERY: QuerySpec = QuerySpec::new(
    "ManageRealmQuery",
    "query ManageRealmQuery($path: String!) { \
     realm: realmByPath(path: $path) { id name canCurrentUserModerate } }",
);
pub const ADD_CHILD_QUERY: QuerySpec = QuerySpec::new(
    "AddChildQuery",
    "query AddChildQuery($parent: String!) { \
     parent: realmByPath(path: $parent) { id name children { path } } }",
);
pub const UPLOAD_QUERY: QuerySpec = QuerySpec::new(
    "UploadQuery",
    "query UploadQuery { currentUser { canUpload } }",
);

/// Build the portal's route table.
pub fn route_table(config: &PortalConfig) -> Result<RouteTable<Page>, PatternError> {
    let reserved: Arc<HashSet<String>> = Arc::new(
        config
            .reserved_paths
            .iter()
            .map(|p| p.trim_start_matches('/').to_string())
            .chain(BUILTIN_RESERVED.iter().map(|p| p.to_string()))
            .collect(),
    );

    let realm_video_reserved = Arc::clone(&reserved);
    let realm_reserved = Arc::clone(&reserved);

    let table = RouteTable::builder()
        .route(Route::new("home", "/", |_, ctx| {
            let realm = ctx.preload(&REALM_QUERY, json!({ "path": "" }));
            page("home", PageKind::Realm { path: String::new() }, vec![realm])
        })?)
        .route(Route::new("about", "/~about", |_, _| {
            page("about", PageKind::About, Vec::new())
        })?)
        .route(Route::new("login", "/~login", |_, _| {
            page("login", PageKind::Login, Vec::new())
        })?)
        .route(Route::new("video", "/!v/:id", |params, ctx| {
            let key = params.get("id").filter(|k| is_valid_key(k))?;
            let id = format!("ev{key}");
            let video = ctx.preload(&VIDEO_QUERY, json!({ "id": id }));
            Some(page("video", PageKind::Video { id, realm: None }, vec![video]))
        })?)
        .route(Route::new("series", "/!s/:id", |params, ctx| {
            let key = params.get("id").filter(|k| is_valid_key(k))?;
            let id = format!("sr{key}");
            let series = ctx.preload(&SERIES_QUERY, json!({ "id": id }));
            Some(page("series", PageKind::Series { id }, vec![series]))
        })?)
        .route(Route::new("manage", "/~manage", |_, ctx| {
            let data = ctx.preload(&MANAGE_QUERY, json!({}));
            page("manage", PageKind::Manage, vec![data])
        })?)
        .route(Route::new("manage-videos", "/~manage/videos", |_, ctx| {
            let data = ctx.preload(&MANAGE_VIDEOS_QUERY, json!({}));
            page("manage-videos", PageKind::ManageVideos, vec![data])
        })?)
        .route(Route::new("manage-video", "/~manage/videos/:id", |params, ctx| {
            let key = params.get("id").filter(|k| is_valid_key(k))?;
            let id = format!("ev{key}");
            let data = ctx.preload(&MANAGE_VIDEO_QUERY, json!({ "id": id }));
            Some(page("manage-video", PageKind::ManageVideo { id }, vec![data]))
        })?)
        .route(Route::with_matcher(
            "manage-realm",
            WithQuery::new(PathPattern::parse("/~manage/realm")?, "path"),
            |params, ctx| {
                let path = params.get("path")?.to_string();
                let data = ctx.preload(&MANAGE_REALM_QUERY, json!({ "path": path }));
                Some(page("manage-realm", PageKind::ManageRealm { path }, vec![data]))
            },
        ))
        .route(Route::with_matcher(
            "add-child",
            WithQuery::new(PathPattern::parse("/~manage/realm/add-child")?, "parent"),
            |params, ctx| {
                let parent = params.get("parent")?.to_string();
                let data = ctx.preload(&ADD_CHILD_QUERY, json!({ "parent": parent }));
                Some(page("add-child", PageKind::AddChild { parent }, vec![data]))
            },
        ))
        .route(Route::new("upload", "/~manage/upload", |_, ctx| {
            let data = ctx.preload(&UPLOAD_QUERY, json!({}));
            page("upload", PageKind::Upload, vec![data])
        })?)
        .route(Route::new("realm-video", "/*realm/v/:id", move |params, ctx| {
            let realm = realm_path(params.get("realm")?, &realm_video_reserved)?;
            let key = params.get("id").filter(|k| is_valid_key(k))?;
            let id = format!("ev{key}");
            // Two independent queries: the realm's navigation and the video.
            let nav = ctx.preload(&REALM_NAV_QUERY, json!({ "path": realm }));
            let video = ctx.preload(&VIDEO_QUERY, json!({ "id": id, "realmPath": realm }));
            Some(page(
                "realm-video",
                PageKind::Video { id, realm: Some(realm) },
                vec![nav, video],
            ))
        })?)
        .route(Route::new("realm", "/*path", move |params, ctx| {
            let path = realm_path(params.get("path")?, &realm_reserved)?;
            let realm = ctx.preload(&REALM_QUERY, json!({ "path": path }));
            Some(page("realm", PageKind::Realm { path }, vec![realm]))
        })?)
        .fallback("not-found", |ctx| {
            let path = ctx.url().path().to_string();
            page("not-found", PageKind::NotFound { path }, Vec::new())
        });

    Ok(table)
}

/// An 11 digit base64url key as used in video and series URLs.
pub fn is_valid_key(key: &str) -> bool {
    // Anything above `P__________` overflows 64 bits.
    key.len() == 11
        && matches!(key.as_bytes()[0], b'A'..=b'P')
        && key.bytes().all(|b| KEY_DIGITS.as_bytes().contains(&b))
}

/// Whether `path` (`/a/b`, without trailing slash) can name a realm.
pub fn is_valid_realm_path(path: &str, reserved: &[&str]) -> bool {
    let reserved: HashSet<String> = reserved
        .iter()
        .map(|p| p.to_string())
        .chain(BUILTIN_RESERVED.iter().map(|p| p.to_string()))
        .collect();
    path.strip_prefix('/')
        .and_then(|rest| realm_path(rest, &reserved))
        .is_some()
}

/// Normalize a `/`-joined wildcard capture to a realm path, or `None` if
/// any segment cannot belong to a realm.
fn realm_path(segments: &str, reserved: &HashSet<String>) -> Option<String> {
    let mut path = String::new();
    for (i, segment) in segments.split('/').enumerate() {
        let valid = !segment.is_empty()
            && !segment.starts_with(['~', '!'])
            && !segment.chars().any(|c| c.is_control() || c.is_whitespace())
            && !(i == 0 && reserved.contains(segment));
        if !valid {
            return None;
        }
        path.push('/');
        path.push_str(segment);
    }
    Some(path)
}

fn page(route: &'static str, kind: PageKind, queries: Vec<QueryHandle>) -> MatchResult<Page> {
    let readers: Vec<_> = queries.iter().map(QueryHandle::reader).collect();
    let result = MatchResult::new(route, move || Page {
        kind: kind.clone(),
        data: readers.iter().map(|r| (r.query(), r.state())).collect(),
    });
    queries.into_iter().fold(result, MatchResult::with_query)
}
