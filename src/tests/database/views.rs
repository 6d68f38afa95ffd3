//! Link, Leaderboard and Tag View Tests

use crate::core::categories::CatCount;
use crate::core::query::{QueryError, TopLinks};
use crate::core::views::{
    detailed_tag_rankings, global_cat_counts, links_page, tag_page_link, tag_rankings,
    GlobalCatsOptions, LinksPageOptions, ViewError,
};
use crate::database::LinkOps;
use crate::tests::common::{backdate_link, create_test_db, create_test_link, create_test_user};

// =============================================================================
// Trending Links
// =============================================================================

#[tokio::test]
async fn test_links_page_matches_spelling_variants() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "flower,test").await;
    create_test_link(&db, "https://b.com", "jlk", "Flowers,coding").await;
    create_test_link(&db, "https://c.com", "jlk", "coding").await;

    let page = links_page(
        &db,
        &LinksPageOptions {
            cats: "flower".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut urls: Vec<&str> = page.links.iter().map(|l| l.url.as_str()).collect();
    urls.sort();
    assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
    assert_eq!(page.merged_cats, vec!["Flowers"]);
    assert_eq!(page.next_page, None);
}

#[tokio::test]
async fn test_links_page_requires_every_category() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "rust,coding").await;
    create_test_link(&db, "https://b.com", "jlk", "rust").await;

    let page = links_page(
        &db,
        &LinksPageOptions {
            cats: "rust, coding".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].url, "https://a.com");
}

#[tokio::test]
async fn test_links_page_hides_and_counts_nsfw() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "rust").await;
    create_test_link(&db, "https://b.com", "jlk", "rust,NSFW").await;
    create_test_link(&db, "https://c.com", "jlk", "go,nsfw").await;
    create_test_link(&db, "https://d.com", "jlk", "nsfwish").await;

    let page = links_page(&db, &LinksPageOptions::default()).await.unwrap();
    let mut urls: Vec<&str> = page.links.iter().map(|l| l.url.as_str()).collect();
    urls.sort();
    assert_eq!(urls, vec!["https://a.com", "https://d.com"]);
    assert_eq!(page.nsfw_links, 2);

    let rust_only = LinksPageOptions {
        cats: "rust".into(),
        ..Default::default()
    };
    let page = links_page(&db, &rust_only).await.unwrap();
    assert_eq!(page.links.len(), 1);
    assert_eq!(page.nsfw_links, 1);

    let with_nsfw = LinksPageOptions {
        nsfw: true,
        ..rust_only
    };
    let page = links_page(&db, &with_nsfw).await.unwrap();
    assert_eq!(page.links.len(), 2);
    assert_eq!(page.nsfw_links, 1);
}

#[tokio::test]
async fn test_links_page_orders_by_likes_and_paginates() {
    let (db, _temp) = create_test_db().await;
    let fan = create_test_user(&db, "fan").await;

    let mut ids = Vec::new();
    for i in 0..23 {
        ids.push(create_test_link(&db, &format!("https://{i}.com"), "jlk", "test").await);
    }
    db.like_link(&ids[22], &fan.id).await.unwrap();

    let first = links_page(&db, &LinksPageOptions::default()).await.unwrap();
    assert_eq!(first.links.len(), 20);
    assert_eq!(first.next_page, Some(2));
    assert_eq!(first.links[0].id, ids[22]);
    assert_eq!(first.links[0].like_count, 1);

    let second = links_page(
        &db,
        &LinksPageOptions {
            page: 2,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second.links.len(), 3);
    assert_eq!(second.next_page, None);
}

#[tokio::test]
async fn test_links_page_period_and_signed_in_fields() {
    let (db, _temp) = create_test_db().await;
    let fan = create_test_user(&db, "fan").await;

    let fresh = create_test_link(&db, "https://fresh.com", "jlk", "news").await;
    let old = create_test_link(&db, "https://old.com", "jlk", "news").await;
    backdate_link(&db, &old, 10).await;
    db.like_link(&fresh, &fan.id).await.unwrap();

    let page = links_page(
        &db,
        &LinksPageOptions {
            period: Some("week".into()),
            signed_in_user: Some(fan.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.links.len(), 1);
    assert!(page.links[0].is_liked);
    assert!(!page.links[0].is_copied);
}

#[tokio::test]
async fn test_links_page_invalid_options() {
    let (db, _temp) = create_test_db().await;

    let err = links_page(
        &db,
        &LinksPageOptions {
            period: Some("fortnight".into()),
            page: -1,
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    // Page is applied first when building
    assert!(matches!(err, ViewError::Query(QueryError::InvalidPage(-1))));
}

#[tokio::test]
async fn test_fetch_count() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "rust").await;
    create_test_link(&db, "https://b.com", "jlk", "go").await;

    let query = TopLinks::new().from_cats(&["rust"]).build().unwrap();
    assert_eq!(db.fetch_count(&query).await.unwrap(), 1);
}

// =============================================================================
// Global Category Leaderboard
// =============================================================================

#[tokio::test]
async fn test_global_cat_counts_prefers_lowercase() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "Music,jazz").await;
    create_test_link(&db, "https://b.com", "jlk", "music").await;
    create_test_link(&db, "https://c.com", "jlk", "MUSIC,rock").await;

    let counts = global_cat_counts(&db, &GlobalCatsOptions::default()).await.unwrap();

    assert_eq!(
        counts,
        vec![
            CatCount::new("music", 3),
            CatCount::new("jazz", 1),
            CatCount::new("rock", 1),
        ]
    );
}

#[tokio::test]
async fn test_global_cat_counts_subcats() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "music,jazz").await;
    create_test_link(&db, "https://b.com", "jlk", "Musics,jazz,live").await;
    create_test_link(&db, "https://c.com", "jlk", "rock").await;

    let counts = global_cat_counts(
        &db,
        &GlobalCatsOptions {
            cats: "music".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(counts, vec![CatCount::new("jazz", 2), CatCount::new("live", 1)]);
}

#[tokio::test]
async fn test_global_cat_counts_period() {
    let (db, _temp) = create_test_db().await;
    create_test_link(&db, "https://a.com", "jlk", "new").await;
    let old = create_test_link(&db, "https://b.com", "jlk", "old").await;
    backdate_link(&db, &old, 40).await;

    let counts = global_cat_counts(
        &db,
        &GlobalCatsOptions {
            period: Some("month".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(counts, vec![CatCount::new("new", 1)]);
}

#[tokio::test]
async fn test_global_cat_counts_limit() {
    let (db, _temp) = create_test_db().await;
    let cats: Vec<String> = (0..30).map(|i| format!("cat{i:02}")).collect();
    create_test_link(&db, "https://a.com", "jlk", &cats.join(",")).await;

    let default = global_cat_counts(&db, &GlobalCatsOptions::default()).await.unwrap();
    assert_eq!(default.len(), 20);

    let more = global_cat_counts(
        &db,
        &GlobalCatsOptions {
            more: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(more.len(), 30);
}

// =============================================================================
// Tag Rankings and Tag Page
// =============================================================================

#[tokio::test]
async fn test_tag_rankings() {
    let (db, _temp) = create_test_db().await;
    let id = create_test_link(&db, "https://a.com", "jlk", "coding").await;
    db.tag_link(&id, "bob", "rust,coding").await.unwrap();

    let rankings = tag_rankings(&db, &id).await.unwrap();
    assert_eq!(rankings.len(), 2);
    assert!(rankings.iter().all(|r| r.lifespan_overlap >= 0.0));
    assert!(rankings.iter().any(|r| r.cats == "rust,coding"));

    let detailed = detailed_tag_rankings(&db, &id).await.unwrap();
    let mut submitters: Vec<&str> = detailed.iter().map(|r| r.submitted_by.as_str()).collect();
    submitters.sort();
    assert_eq!(submitters, vec!["bob", "jlk"]);
}

#[tokio::test]
async fn test_tag_rankings_need_link_id() {
    let (db, _temp) = create_test_db().await;

    let err = tag_rankings(&db, "").await.unwrap_err();
    assert!(matches!(err, ViewError::Query(QueryError::NoLinkId)));
}

#[tokio::test]
async fn test_tag_page_link() {
    let (db, _temp) = create_test_db().await;
    let fan = create_test_user(&db, "fan").await;
    let id = create_test_link(&db, "https://a.com", "jlk", "coding").await;
    db.copy_link(&id, &fan.id).await.unwrap();

    let link = tag_page_link(&db, &id, Some(&fan.id)).await.unwrap().unwrap();
    assert_eq!(link.cats, "coding");
    assert_eq!(link.tag_count, 1);
    assert_eq!(link.copy_count, 1);
    assert!(link.is_copied);

    assert!(tag_page_link(&db, "missing", None).await.unwrap().is_none());
}
