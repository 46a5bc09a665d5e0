//! Integration tests for version snapshots, rollback and optimistic
//! concurrency.
//!
//! - N versioned writes leave exactly N snapshots numbered 1..N
//! - Rollback mints a new version and snapshots the state it overwrites
//! - Stale `expected_version` fails with `VersionConflict`
//! - Concurrent writers against the same version: exactly one wins
//! - The full create/update/publish/move/rollback walkthrough

use assert_matches::assert_matches;
use lectern_core::content_tree::SeoMetadata;
use lectern_core::error::CoreError;
use lectern_core::page_path::PagePath;
use lectern_db::error::StoreError;
use lectern_db::models::page::{CreatePage, UpdatePage};
use lectern_db::repositories::{PageRepo, PageVersionRepo, RedirectRepo};
use serde_json::json;
use sqlx::PgPool;

const ACTOR: &str = "editor";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_page(pool: &PgPool, title: &str, path: &str) -> i64 {
    let input = CreatePage {
        title: title.to_string(),
        path: Some(path.to_string()),
        ..Default::default()
    };
    PageRepo::create(pool, &input, ACTOR).await.unwrap().id
}

fn retitle(expected_version: i32, title: &str) -> UpdatePage {
    UpdatePage {
        expected_version,
        title: Some(title.to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Snapshot bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_n_writes_leave_n_contiguous_snapshots(pool: PgPool) {
    let id = create_page(&pool, "Counter", "/counter").await;

    for n in 1..=4 {
        let page = PageRepo::update(&pool, id, &retitle(n, &format!("Counter {n}")), ACTOR)
            .await
            .unwrap();
        assert_eq!(page.version, n + 1);
    }
    let page = PageRepo::rollback(&pool, id, 2, 5, ACTOR).await.unwrap();
    assert_eq!(page.version, 6);

    let (versions, total) = PageVersionRepo::list_by_page(&pool, id, 100, 0)
        .await
        .unwrap();
    assert_eq!(total, 5);
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![5, 4, 3, 2, 1], "newest first, no gaps, no repeats");

    // Each snapshot holds the title the page had *at* that version.
    assert_eq!(versions[4].title, "Counter");
    assert_eq!(versions[3].title, "Counter 1");
    assert_eq!(versions[0].title, "Counter 4");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_versions_paginates(pool: PgPool) {
    let id = create_page(&pool, "Paged", "/paged").await;
    for n in 1..=5 {
        PageRepo::update(&pool, id, &retitle(n, "Paged"), ACTOR).await.unwrap();
    }

    let (page_one, total) = PageVersionRepo::list_by_page(&pool, id, 2, 0).await.unwrap();
    let (page_two, _) = PageVersionRepo::list_by_page(&pool, id, 2, 2).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(page_one.iter().map(|v| v.version).collect::<Vec<_>>(), vec![5, 4]);
    assert_eq!(page_two.iter().map(|v| v.version).collect::<Vec<_>>(), vec![3, 2]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_version_and_compare(pool: PgPool) {
    let id = create_page(&pool, "Compare", "/compare").await;

    let content_only = UpdatePage {
        expected_version: 1,
        content_tree: Some(json!({"type": "root", "children": [{"type": "text"}]})),
        ..Default::default()
    };
    PageRepo::update(&pool, id, &content_only, ACTOR).await.unwrap();
    PageRepo::update(&pool, id, &retitle(2, "Compare Again"), ACTOR).await.unwrap();

    let (versions, _) = PageVersionRepo::list_by_page(&pool, id, 10, 0).await.unwrap();
    let v2 = &versions[0];
    let v1 = &versions[1];
    assert_eq!((v1.version, v2.version), (1, 2));

    let fetched = PageVersionRepo::get_by_id(&pool, v1.id).await.unwrap();
    assert_eq!(fetched.page_id, id);

    let diff = PageVersionRepo::compare(&pool, v1.id, v2.id).await.unwrap();
    assert!(!diff.title_changed);
    assert!(diff.content_tree_changed);
    assert!(!diff.seo_changed);

    let same = PageVersionRepo::compare(&pool, v1.id, v1.id).await.unwrap();
    assert!(same.is_identical());

    assert_matches!(
        PageVersionRepo::compare(&pool, v1.id, v2.id + 1000).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
    assert_matches!(
        PageVersionRepo::get_by_id(&pool, v2.id + 1000).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_rollback_twice_is_not_idempotent_in_history(pool: PgPool) {
    let id = create_page(&pool, "Original", "/orig").await;
    let seo = UpdatePage {
        expected_version: 1,
        title: Some("Changed".to_string()),
        seo_metadata: Some(Some(SeoMetadata {
            description: Some("new".to_string()),
            ..Default::default()
        })),
        ..Default::default()
    };
    PageRepo::update(&pool, id, &seo, ACTOR).await.unwrap();

    let first = PageRepo::rollback(&pool, id, 1, 2, ACTOR).await.unwrap();
    let second = PageRepo::rollback(&pool, id, 1, 3, ACTOR).await.unwrap();

    assert_eq!(first.title, "Original");
    assert_eq!(second.title, first.title);
    assert_eq!(second.content_tree, first.content_tree);
    assert!(first.seo().is_none());
    assert!(second.seo().is_none());

    assert_eq!(first.version, 3);
    assert_eq!(second.version, 4);
    assert_eq!(PageVersionRepo::count_by_page(&pool, id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rollback_is_reversible(pool: PgPool) {
    let id = create_page(&pool, "A", "/rev").await;
    PageRepo::update(&pool, id, &retitle(1, "B"), ACTOR).await.unwrap();

    let rolled = PageRepo::rollback(&pool, id, 1, 2, ACTOR).await.unwrap();
    assert_eq!(rolled.title, "A");

    // Version 2 was snapshotted by the rollback; restore it.
    let restored = PageRepo::rollback(&pool, id, 2, 3, ACTOR).await.unwrap();
    assert_eq!(restored.title, "B");
    assert_eq!(restored.version, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rollback_to_unknown_version_changes_nothing(pool: PgPool) {
    let id = create_page(&pool, "Solo", "/solo").await;
    PageRepo::update(&pool, id, &retitle(1, "Solo 2"), ACTOR).await.unwrap();

    assert_matches!(
        PageRepo::rollback(&pool, id, 7, 2, ACTOR).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
    // The current version (2) has no snapshot of its own yet.
    assert_matches!(
        PageRepo::rollback(&pool, id, 2, 2, ACTOR).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );

    let page = PageRepo::get_by_id(&pool, id).await.unwrap();
    assert_eq!(page.version, 2);
    assert_eq!(PageVersionRepo::count_by_page(&pool, id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rollback_missing_page_is_not_found(pool: PgPool) {
    assert_matches!(
        PageRepo::rollback(&pool, 123_456, 1, 1, ACTOR).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Optimistic concurrency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_expected_version_is_rejected(pool: PgPool) {
    let id = create_page(&pool, "Stale", "/stale").await;
    PageRepo::update(&pool, id, &retitle(1, "Fresh"), ACTOR).await.unwrap();

    let result = PageRepo::update(&pool, id, &retitle(1, "Clobber"), ACTOR).await;
    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::VersionConflict { expected: 1, actual: 2 }))
    );
    assert_matches!(
        PageRepo::rollback(&pool, id, 1, 1, ACTOR).await,
        Err(StoreError::Core(CoreError::VersionConflict { expected: 1, actual: 2 }))
    );

    let page = PageRepo::get_by_id(&pool, id).await.unwrap();
    assert_eq!(page.title, "Fresh");
    assert_eq!(PageVersionRepo::count_by_page(&pool, id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_updates_exactly_one_wins(pool: PgPool) {
    let id = create_page(&pool, "Race", "/race").await;
    for n in 1..=4 {
        PageRepo::update(&pool, id, &retitle(n, "Race"), ACTOR).await.unwrap();
    }
    let page = PageRepo::get_by_id(&pool, id).await.unwrap();
    assert_eq!(page.version, 5);

    let left = retitle(5, "Left");
    let right = retitle(5, "Right");
    let (a, b) = tokio::join!(
        PageRepo::update(&pool, id, &left, "alice"),
        PageRepo::update(&pool, id, &right, "bob"),
    );

    let (winner, loser) = match (a, b) {
        (Ok(page), Err(err)) | (Err(err), Ok(page)) => (page, err),
        (a, b) => panic!("expected exactly one success, got {a:?} and {b:?}"),
    };
    assert_eq!(winner.version, 6);
    assert_matches!(
        loser,
        StoreError::Core(CoreError::VersionConflict { expected: 5, actual: 6 })
    );

    let final_page = PageRepo::get_by_id(&pool, id).await.unwrap();
    assert_eq!(final_page.title, winner.title);
    assert_eq!(PageVersionRepo::count_by_page(&pool, id).await.unwrap(), 5);
}

// ---------------------------------------------------------------------------
// End-to-end walkthrough
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_end_to_end_lifecycle(pool: PgPool) {
    // create
    let input = CreatePage {
        title: "Home".to_string(),
        path: Some("/a".to_string()),
        ..Default::default()
    };
    let page = PageRepo::create(&pool, &input, ACTOR).await.unwrap();
    assert_eq!(page.version, 1);
    assert_eq!(page.status, "draft");
    let id = page.id;

    // retitle
    let page = PageRepo::update(&pool, id, &retitle(1, "Home Page"), ACTOR).await.unwrap();
    assert_eq!(page.version, 2);
    let (versions, _) = PageVersionRepo::list_by_page(&pool, id, 10, 0).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!((versions[0].version, versions[0].title.as_str()), (1, "Home"));

    // publish
    let page = PageRepo::publish(&pool, id).await.unwrap();
    assert_eq!(page.status, "published");
    assert_eq!(page.version, 2);

    // move
    let moved = UpdatePage {
        expected_version: 2,
        path: Some("/a2".to_string()),
        ..Default::default()
    };
    let page = PageRepo::update(&pool, id, &moved, ACTOR).await.unwrap();
    assert_eq!(page.version, 3);
    assert_eq!(page.path, "/a2");
    let v2 = PageVersionRepo::find_by_page_and_version(&pool, id, 2)
        .await
        .unwrap()
        .expect("snapshot of version 2");
    assert_eq!(v2.title, "Home Page");

    let old = PagePath::parse("/a").unwrap();
    let target = RedirectRepo::resolve(&pool, &old).await.unwrap().unwrap();
    assert_eq!(target.to_path, "/a2");
    assert_eq!(target.status_code, 301);

    // rollback
    let page = PageRepo::rollback(&pool, id, 1, 3, ACTOR).await.unwrap();
    assert_eq!(page.title, "Home");
    assert_eq!(page.version, 4);
    assert_eq!(page.path, "/a2", "path is not part of a snapshot");
    assert_eq!(page.status, "published");

    let v3 = PageVersionRepo::find_by_page_and_version(&pool, id, 3)
        .await
        .unwrap()
        .expect("snapshot of version 3");
    assert_eq!(v3.title, "Home Page");
    assert_eq!(PageVersionRepo::count_by_page(&pool, id).await.unwrap(), 3);
}
