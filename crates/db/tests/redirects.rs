//! Integration tests for the redirect ledger.
//!
//! - Upsert is keyed by `from_path` and overwrites in place
//! - Resolution is a single exact-match hop
//! - Page moves write 301s automatically
//! - Manual upserts are validated

use assert_matches::assert_matches;
use lectern_core::error::CoreError;
use lectern_core::page_path::PagePath;
use lectern_core::redirect::RedirectStatus;
use lectern_db::error::StoreError;
use lectern_db::models::page::{CreatePage, UpdatePage};
use lectern_db::models::redirect::{RedirectTarget, UpsertRedirect};
use lectern_db::repositories::{PageRepo, RedirectRepo};
use sqlx::PgPool;

fn path(raw: &str) -> PagePath {
    PagePath::parse(raw).unwrap()
}

fn manual(from: &str, to: &str, status_code: Option<i16>) -> UpsertRedirect {
    UpsertRedirect {
        from_path: from.to_string(),
        to_path: to.to_string(),
        status_code,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_overwrites_by_from_path(pool: PgPool) {
    let first = RedirectRepo::upsert(&pool, &path("/a"), &path("/b"), RedirectStatus::Permanent)
        .await
        .unwrap();
    let second = RedirectRepo::upsert(&pool, &path("/a"), &path("/c"), RedirectStatus::Temporary)
        .await
        .unwrap();

    assert_eq!(first.id, second.id, "same row is reused");
    assert_eq!(second.to_path, "/c");
    assert_eq!(second.status_code, 302);

    let (all, total) = RedirectRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(all[0].to_path, "/c");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resolve_is_single_hop(pool: PgPool) {
    RedirectRepo::upsert(&pool, &path("/a"), &path("/b"), RedirectStatus::Permanent)
        .await
        .unwrap();
    RedirectRepo::upsert(&pool, &path("/b"), &path("/c"), RedirectStatus::Permanent)
        .await
        .unwrap();

    let target = RedirectRepo::resolve(&pool, &path("/a")).await.unwrap();
    assert_eq!(
        target,
        Some(RedirectTarget {
            to_path: "/b".to_string(),
            status_code: 301,
        })
    );
    assert!(RedirectRepo::resolve(&pool, &path("/c")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_successive_moves_repoint_nothing_upstream(pool: PgPool) {
    let page = PageRepo::create(
        &pool,
        &CreatePage {
            title: "Wanderer".to_string(),
            path: Some("/one".to_string()),
            ..Default::default()
        },
        "mover",
    )
    .await
    .unwrap();

    for (expected_version, to) in [(1, "/two"), (2, "/three")] {
        let input = UpdatePage {
            expected_version,
            path: Some(to.to_string()),
            ..Default::default()
        };
        PageRepo::update(&pool, page.id, &input, "mover").await.unwrap();
    }

    let one = RedirectRepo::resolve(&pool, &path("/one")).await.unwrap().unwrap();
    let two = RedirectRepo::resolve(&pool, &path("/two")).await.unwrap().unwrap();
    assert_eq!(one.to_path, "/two", "the ledger does not collapse chains");
    assert_eq!(two.to_path, "/three");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manual_upsert_validation(pool: PgPool) {
    let ok = RedirectRepo::upsert_manual(&pool, &manual("Old-Page", "/new-page", None))
        .await
        .unwrap();
    assert_eq!(ok.from_path, "/old-page");
    assert_eq!(ok.status_code, 301);

    assert_matches!(
        RedirectRepo::upsert_manual(&pool, &manual("/x", "/x", None)).await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        RedirectRepo::upsert_manual(&pool, &manual("/x", "/y", Some(307))).await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        RedirectRepo::upsert_manual(&pool, &manual("/bad path", "/y", None)).await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_and_delete(pool: PgPool) {
    let redirect =
        RedirectRepo::upsert(&pool, &path("/gone"), &path("/here"), RedirectStatus::Permanent)
            .await
            .unwrap();

    let found = RedirectRepo::find_by_id(&pool, redirect.id).await.unwrap();
    assert_eq!(found.map(|r| r.from_path).as_deref(), Some("/gone"));

    assert!(RedirectRepo::delete(&pool, redirect.id).await.unwrap());
    assert!(!RedirectRepo::delete(&pool, redirect.id).await.unwrap());
    assert!(RedirectRepo::resolve(&pool, &path("/gone")).await.unwrap().is_none());
}
