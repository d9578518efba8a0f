//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the portal and run logins,
//! CSRF-protected posts, downloads and full crawls end-to-end.

use portal_chef::config::Config;
use portal_chef::crawler::{DownloadCache, DownloadOutcome};
use portal_chef::storage::{SqliteStorage, Storage};
use portal_chef::tree::{ChannelNode, Node};
use portal_chef::{ChefError, Crawler, PortalClient};
use std::path::Path;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><body>
    <form id="form-login" method="post" action="/portal/auth/login">
        <input type="hidden" name="next" value="/portal">
        <input type="email" name="email">
        <input type="password" name="password">
        <button type="submit">Log in</button>
    </form>
</body></html>"#;

/// Creates a test configuration against `base_url`
fn create_test_config(base_url: &str, downloads: &Path, extra_crawler: &str) -> Config {
    let toml = format!(
        r#"
[portal]
base-url = "{base_url}"

[credentials]
email = "jordan@example.org"
password = "kolibri"

[channel]
name = "Overcoming Obstacles"
source-id = "portal-chef-example-en"
source-domain = "example.org"
language = "en"
license = "All Rights Reserved"
copyright-holder = "Community for Education Foundation"

[crawler]
download-directory = "{downloads}"
{extra_crawler}

[user-agent]
crawler-name = "TestChef"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
database-path = "chef.db"
summary-path = "outline.md"
"#,
        base_url = base_url,
        downloads = downloads.display(),
        extra_crawler = extra_crawler,
    );
    toml::from_str(&toml).unwrap()
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

fn detail_pane(n: u32) -> String {
    format!(
        r#"<div class="reveal">
            <a href="/portal/share/{n}">Share</a>
            <a data-id="{n}" data-token="t{n}" href="/portal/favorite/{n}">Favorite</a>
            <span id="module-large-title">Resource {n}</span>
            <span id="module-large-description">About resource {n}.</span>
            <a id="module-dl" href="/files/{n}.pdf">Download</a>
        </div>"#,
        n = n
    )
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/portal/auth/login"))
        .respond_with(html(LOGIN_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/portal/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "sessionid=abc; Path=/"),
        )
        .mount(server)
        .await;
}

/// Mounts a landing page with two tabs, four resources and their downloads
///
/// Each download expects exactly `downloads` requests.
async fn mount_portal(server: &MockServer, downloads: u64) {
    mount_login(server).await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(html(
            r#"<ul class="tabs">
                <li class="tab-title"><a href="/portal/curriculum/elementary">Elementary</a></li>
                <li class="tab-title"><a href="/portal/curriculum/middle">Middle School</a></li>
            </ul>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/elementary"))
        .respond_with(html(
            r#"<div class="columns">
                <h2>Unit 1: Intro</h2>
                <dl>
                    <dt>Goals</dt>
                    <dd><a data-reveal-ajax="/portal/module/1">R1</a></dd>
                    <dd><a data-reveal-ajax="/portal/module/2">R2</a></dd>
                </dl>
            </div>
            <div class="columns">
                <dl><dt>Extras</dt><dd><a data-reveal-ajax="/portal/module/3">R3</a></dd></dl>
            </div>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/middle"))
        .respond_with(html(
            r#"<div class="columns">
                <dl><dt>Wrap Up</dt><dd><a data-reveal-ajax="/portal/module/4">R4</a></dd></dl>
            </div>"#,
        ))
        .mount(server)
        .await;

    for n in 1..=4 {
        Mock::given(method("GET"))
            .and(path(format!("/portal/module/{}", n)))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .respond_with(html(detail_pane(n)))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/files/{}.pdf", n)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(format!("%PDF-1.4 resource {}", n).into_bytes())
                    .insert_header("content-type", "application/pdf"),
            )
            .expect(downloads)
            .mount(server)
            .await;
    }
}

fn ids(children: &[Node]) -> Vec<&str> {
    children.iter().map(|c| c.source_id()).collect()
}

fn document_ids(channel: &ChannelNode) -> Vec<String> {
    fn walk(nodes: &[Node], out: &mut Vec<String>) {
        for node in nodes {
            match node {
                Node::Document(d) => out.push(d.source_id.clone()),
                Node::Topic(t) => walk(t.children(), out),
            }
        }
    }
    let mut out = Vec::new();
    walk(channel.children(), &mut out);
    out
}

#[tokio::test]
async fn test_login_establishes_session() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .and(header("cookie", "sessionid=abc"))
        .respond_with(html("<p>Welcome back</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();

    let login_url = format!("{}/portal/auth/login", mock_server.uri());
    client.login(&login_url).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    let submitted = received
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .expect("login form was not submitted");
    let body = String::from_utf8_lossy(&submitted.body);
    assert!(body.contains("email=jordan%40example.org"));
    assert!(body.contains("password=kolibri"));
    assert!(body.contains("next=%2Fportal"));

    let page = client
        .read(&format!("{}/portal", mock_server.uri()), false)
        .await
        .unwrap();
    assert!(page.contains("Welcome back"));
}

#[tokio::test]
async fn test_missing_login_form_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/portal/auth/login"))
        .respond_with(html("<p>Maintenance in progress</p>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(html("<ul></ul>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), r#"branch-errors = "skip""#);
    let client = PortalClient::from_config(&config).unwrap();
    let mut crawler = Crawler::new(config, client).unwrap();

    let result = crawler.run().await;
    assert!(matches!(result, Err(ChefError::LoginFormMissing { .. })));
    assert!(crawler.last_step().starts_with("login "));
}

#[tokio::test]
async fn test_csrf_token_propagated_on_post() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let referer = format!("{}/portal/settings", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/portal/settings"))
        .respond_with(
            html("<form></form>").insert_header("set-cookie", "csrftoken=tok123; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/portal/settings"))
        .and(header("x-csrftoken", "tok123"))
        .and(header("referer", referer.as_str()))
        .and(body_string_contains("csrfmiddlewaretoken=tok123"))
        .and(body_string_contains("language=en"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();

    let response = client
        .post(
            &referer,
            vec![("language".to_string(), "en".to_string())],
            Some(&referer),
            true,
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_no_csrf_cookie_sends_no_token() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let referer = format!("{}/portal/settings", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/portal/settings"))
        .respond_with(html("<form></form>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(header_exists("x-csrftoken"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("csrfmiddlewaretoken"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/portal/settings"))
        .and(header("referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();

    let response = client
        .post(
            &referer,
            vec![("language".to_string(), "en".to_string())],
            Some(&referer),
            true,
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_download_is_idempotent() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/worksheet.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 worksheet".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();
    let cache = DownloadCache::new(dir.path()).unwrap();
    let destination = cache.path_for("Worksheet");
    let url = format!("{}/files/worksheet.pdf", mock_server.uri());

    let first = cache
        .ensure_downloaded(&client, &url, &destination)
        .await
        .unwrap();
    match first {
        DownloadOutcome::Fetched { bytes, sha256 } => {
            assert_eq!(bytes, 18);
            assert_eq!(sha256.len(), 64);
        }
        other => panic!("expected a fetch, got {:?}", other),
    }

    let second = cache
        .ensure_downloaded(&client, &url, &destination)
        .await
        .unwrap();
    assert_eq!(second, DownloadOutcome::Cached);
    assert_eq!(std::fs::read(&destination).unwrap(), b"%PDF-1.4 worksheet");
}

#[tokio::test]
async fn test_failed_download_commits_nothing() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();
    let cache = DownloadCache::new(dir.path()).unwrap();
    let destination = cache.path_for("Missing");

    let result = cache
        .ensure_downloaded(
            &client,
            &format!("{}/files/missing.pdf", mock_server.uri()),
            &destination,
        )
        .await;

    assert!(matches!(
        result,
        Err(ChefError::HttpStatus { status: 404, .. })
    ));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_full_crawl_builds_tree_in_order() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let downloads = dir.path().join("downloads");
    mount_portal(&mock_server, 1).await;

    let config = create_test_config(&mock_server.uri(), &downloads, "");
    let client = PortalClient::from_config(&config).unwrap();
    let ledger = SqliteStorage::new_in_memory().unwrap();
    let mut crawler = Crawler::new(config, client)
        .unwrap()
        .with_ledger(ledger, "hash");

    let channel = crawler.run().await.unwrap();

    assert_eq!(channel.source_id, "portal-chef-example-en");
    assert_eq!(ids(channel.children()), vec!["Elementary", "Middle-School"]);

    let elementary = &channel.children()[0];
    assert_eq!(
        ids(elementary.children()),
        vec!["Elementary-Unit-1-Intro", "Elementary-Extras"]
    );

    // Headed column becomes a topic holding its sections
    let unit = &elementary.children()[0];
    assert_eq!(unit.title(), "Unit 1: Intro");
    assert_eq!(ids(unit.children()), vec!["Elementary-Unit-1-Intro-Goals"]);
    assert_eq!(ids(unit.children()[0].children()), vec!["1-t1", "2-t2"]);

    // Heading-less column is flattened into the curriculum
    let extras = &elementary.children()[1];
    assert_eq!(extras.title(), "Extras");
    assert_eq!(ids(extras.children()), vec!["3-t3"]);

    let middle = &channel.children()[1];
    assert_eq!(ids(middle.children()), vec!["Middle-School-Wrap-Up"]);

    match &unit.children()[0].children()[0] {
        Node::Document(document) => {
            assert_eq!(document.title, "Resource 1");
            assert_eq!(document.description, "About resource 1.");
            assert_eq!(
                document.copyright_holder,
                "Community for Education Foundation"
            );
            assert_eq!(document.file.path(), downloads.join("Resource 1.pdf"));
            assert_eq!(
                std::fs::read(document.file.path()).unwrap(),
                b"%PDF-1.4 resource 1"
            );
        }
        other => panic!("expected a document, got {:?}", other),
    }

    let ledger = crawler.into_ledger().unwrap();
    assert_eq!(ledger.count_assets().unwrap(), 4);
    let run = ledger.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status.to_db_string(), "completed");
}

#[tokio::test]
async fn test_second_run_uses_cached_downloads() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let downloads = dir.path().join("downloads");
    mount_portal(&mock_server, 1).await;

    let mut trees = Vec::new();
    for _ in 0..2 {
        let config = create_test_config(&mock_server.uri(), &downloads, "");
        let client = PortalClient::from_config(&config).unwrap();
        let mut crawler = Crawler::new(config, client).unwrap();
        trees.push(crawler.run().await.unwrap());
    }

    assert_eq!(document_ids(&trees[0]), document_ids(&trees[1]));
    assert_eq!(std::fs::read_dir(&downloads).unwrap().count(), 4);
}

#[tokio::test]
async fn test_skip_policy_drops_failing_branches() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(html(
            r#"<li class="tab-title"><a href="/portal/curriculum/broken">Broken</a></li>
               <li class="tab-title"><a href="/portal/curriculum/working">Working</a></li>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/working"))
        .respond_with(html(
            r#"<div class="columns"><dl><dt>Goals</dt>
                <dd><a data-reveal-ajax="/portal/module/anonymous">No id</a></dd>
                <dd><a data-reveal-ajax="/portal/module/1">R1</a></dd>
            </dl></div>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/module/anonymous"))
        .respond_with(html(
            r#"<span id="module-large-title">Anonymous</span>
               <span id="module-large-description">No identifier.</span>
               <a id="module-dl" href="/files/anonymous.pdf">Download</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/module/1"))
        .respond_with(html(detail_pane(1)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&mock_server)
        .await;

    let downloads = dir.path().join("downloads");

    let config = create_test_config(&mock_server.uri(), &downloads, r#"branch-errors = "skip""#);
    let client = PortalClient::from_config(&config).unwrap();
    let channel = Crawler::new(config, client).unwrap().run().await.unwrap();

    assert_eq!(ids(channel.children()), vec!["Working"]);
    assert_eq!(document_ids(&channel), vec!["1-t1"]);

    let config = create_test_config(&mock_server.uri(), &downloads, "");
    let client = PortalClient::from_config(&config).unwrap();
    let result = Crawler::new(config, client).unwrap().run().await;
    assert!(matches!(
        result,
        Err(ChefError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_duplicate_identifiers() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(html(
            r#"<li class="tab-title"><a href="/portal/curriculum/a">Elementary</a></li>
               <li class="tab-title"><a href="/portal/curriculum/a">Elementary</a></li>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/a"))
        .respond_with(html(
            r#"<div class="columns"><dl><dt>Goals</dt>
                <dd><a data-reveal-ajax="/portal/module/1">R1</a></dd>
            </dl></div>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/module/1"))
        .respond_with(html(detail_pane(1)))
        .mount(&mock_server)
        .await;

    // Same title, same destination: fetched once
    Mock::given(method("GET"))
        .and(path("/files/1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let downloads = dir.path().join("downloads");

    let config = create_test_config(&mock_server.uri(), &downloads, "");
    let client = PortalClient::from_config(&config).unwrap();
    match Crawler::new(config, client).unwrap().run().await {
        Err(ChefError::Tree(error)) => {
            assert!(error.problems().iter().any(|p| p.contains("Elementary")));
        }
        other => panic!("expected tree validation failure, got {:?}", other),
    }

    let config = create_test_config(
        &mock_server.uri(),
        &downloads,
        r#"id-collisions = "suffix""#,
    );
    let client = PortalClient::from_config(&config).unwrap();
    let channel = Crawler::new(config, client).unwrap().run().await.unwrap();

    assert_eq!(ids(channel.children()), vec!["Elementary", "Elementary-2"]);
    assert_eq!(document_ids(&channel), vec!["1-t1", "1-t1-2"]);
}

#[tokio::test]
async fn test_csrf_header_without_body_token() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let referer = format!("{}/portal/settings", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/portal/settings"))
        .respond_with(
            html("<form></form>").insert_header("set-cookie", "csrftoken=tok123; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("csrfmiddlewaretoken"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/portal/settings"))
        .and(header("x-csrftoken", "tok123"))
        .and(body_string_contains("language=en"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();

    let response = client
        .post(
            &referer,
            vec![("language".to_string(), "en".to_string())],
            Some(&referer),
            false,
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_stale_body_token_is_replaced() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let referer = format!("{}/portal/settings", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/portal/settings"))
        .respond_with(
            html("<form></form>").insert_header("set-cookie", "csrftoken=fresh; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("stale"))
        .respond_with(ResponseTemplate::new(403))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/portal/settings"))
        .and(header("x-csrftoken", "fresh"))
        .and(body_string_contains("csrfmiddlewaretoken=fresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path(), "");
    let client = PortalClient::from_config(&config).unwrap();

    let response = client
        .post(
            &referer,
            vec![
                ("csrfmiddlewaretoken".to_string(), "stale".to_string()),
                ("language".to_string(), "en".to_string()),
            ],
            Some(&referer),
            true,
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let received = mock_server.received_requests().await.unwrap();
    let submitted = received
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .unwrap();
    let body = String::from_utf8_lossy(&submitted.body);
    assert_eq!(body.matches("csrfmiddlewaretoken").count(), 1);
}

/// Mounts one section whose two resources share the title "Worksheet"
async fn mount_shared_title(server: &MockServer, second_download: u64) {
    mount_login(server).await;

    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(html(
            r#"<li class="tab-title"><a href="/portal/curriculum/a">Elementary</a></li>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portal/curriculum/a"))
        .respond_with(html(
            r#"<div class="columns"><dl><dt>Goals</dt>
                <dd><a data-reveal-ajax="/portal/module/1">First</a></dd>
                <dd><a data-reveal-ajax="/portal/module/2">Second</a></dd>
            </dl></div>"#,
        ))
        .mount(server)
        .await;

    for n in 1..=2 {
        Mock::given(method("GET"))
            .and(path(format!("/portal/module/{}", n)))
            .respond_with(html(format!(
                r#"<a data-id="{n}" data-token="t"></a>
                   <span id="module-large-title">Worksheet</span>
                   <span id="module-large-description">Worksheet {n}.</span>
                   <a id="module-dl" href="/f/{n}.pdf">Download</a>"#,
                n = n
            )))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/f/1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"content-of-1".to_vec()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/f/2.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"content-of-2".to_vec()))
        .expect(second_download)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_shared_title_with_different_links_is_rejected() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let downloads = dir.path().join("downloads");
    mount_shared_title(&mock_server, 0).await;

    let config = create_test_config(&mock_server.uri(), &downloads, "");
    let client = PortalClient::from_config(&config).unwrap();
    match Crawler::new(config, client).unwrap().run().await {
        Err(ChefError::DestinationConflict {
            url, claimed_by, ..
        }) => {
            assert!(url.ends_with("/f/2.pdf"));
            assert!(claimed_by.ends_with("/f/1.pdf"));
        }
        other => panic!("expected a destination conflict, got {:?}", other),
    }

    let config = create_test_config(&mock_server.uri(), &downloads, r#"branch-errors = "skip""#);
    let client = PortalClient::from_config(&config).unwrap();
    let channel = Crawler::new(config, client).unwrap().run().await.unwrap();

    assert_eq!(document_ids(&channel), vec!["1-t"]);
    assert_eq!(
        std::fs::read(downloads.join("Worksheet.pdf")).unwrap(),
        b"content-of-1"
    );
}
