//! Common test utilities for integration tests.
//!
//! JSON bodies shaped like the Mirage API's, and a helper that points a
//! [`MirageApp`] at a wiremock server with its data in a temp directory.

#![allow(dead_code)]

use mirage::{ClientConfig, MirageApp};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

pub fn profile_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "displayName": format!("{} name", username),
        "image": format!("https://img.test/{}.png", id),
        "bio": null,
        "banner": null,
        "followers": 0,
        "followee": 0,
        "following": false,
        "created_at": "2020-01-01T00:00:00Z"
    })
}

pub fn post_json(id: &str, author: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "text": format!("post {}", id),
        "likes": 0,
        "liked": false,
        "retweets": 0,
        "retweeted": false,
        "isRetweet": false,
        "file": null,
        "files": [],
        "author": profile_json(&format!("id-{}", author), author),
        "created_at": created_at
    })
}

pub fn account_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}@mirage.test", username),
        "username": username,
        "displayName": format!("{} name", username),
        "bio": null,
        "banner": null,
        "image": format!("https://img.test/{}.png", id)
    })
}

pub fn page_json(posts: Vec<Value>, has_more: bool) -> Value {
    json!({ "posts": posts, "hasMore": has_more })
}

/// API root on the mock server.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/v1/", server.uri())
}

pub fn config_for(server: &MockServer, dir: &TempDir) -> ClientConfig {
    ClientConfig::new()
        .with_api_url(api_url(server))
        .with_data_dir(dir.path())
}

/// App talking to `server`, storing its data in `dir`.
pub fn app_for(server: &MockServer, dir: &TempDir) -> MirageApp {
    MirageApp::new(config_for(server, dir)).expect("app should open its cache")
}
