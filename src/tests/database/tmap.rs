//! Treasure Map Tests

use crate::core::categories::CatCount;
use crate::core::query::QueryError;
use crate::core::views::{build_tmap, TmapOptions, TreasureMap, ViewError};
use crate::database::{Database, LinkOps, UserRecord};
use crate::tests::common::{backdate_link, create_test_db, create_test_link, create_test_user};

struct TmapFixture {
    alice: UserRecord,
    own: String,
    copied: String,
    tagged: String,
}

/// alice submits one link, copies one of bob's and tags another of bob's.
async fn seed_tmap(db: &Database) -> TmapFixture {
    let alice = create_test_user(db, "alice").await;
    create_test_user(db, "bob").await;

    let own = create_test_link(db, "https://alice.dev", "alice", "rust").await;
    let copied = create_test_link(db, "https://bob.dev/1", "bob", "rust,coding").await;
    let tagged = create_test_link(db, "https://bob.dev/2", "bob", "cooking").await;

    db.copy_link(&copied, &alice.id).await.unwrap();
    db.tag_link(&tagged, "alice", "food,Rust").await.unwrap();

    TmapFixture {
        alice,
        own,
        copied,
        tagged,
    }
}

fn opts(owner: &str) -> TmapOptions {
    TmapOptions {
        owner_login_name: owner.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_all_sections() {
    let (db, _temp) = create_test_db().await;
    let fx = seed_tmap(&db).await;

    let TreasureMap::Sections(tmap) = build_tmap(&db, &opts("alice")).await.unwrap() else {
        panic!("expected all sections");
    };

    assert_eq!(tmap.submitted.len(), 1);
    assert_eq!(tmap.submitted[0].id, fx.own);
    assert!(tmap.submitted[0].cats_from_user);

    assert_eq!(tmap.copied.len(), 1);
    assert_eq!(tmap.copied[0].id, fx.copied);
    assert!(!tmap.copied[0].cats_from_user);
    assert_eq!(tmap.copied[0].cats, "rust,coding");

    assert_eq!(tmap.tagged.len(), 1);
    assert_eq!(tmap.tagged[0].id, fx.tagged);
    assert_eq!(tmap.tagged[0].cats, "food,Rust");

    assert!(tmap.sections_with_more.is_empty());
    assert_eq!(
        tmap.cats,
        vec![
            CatCount::new("rust", 3),
            CatCount::new("coding", 1),
            CatCount::new("food", 1),
        ]
    );
}

#[tokio::test]
async fn test_copied_link_leaves_tagged_section() {
    let (db, _temp) = create_test_db().await;
    let fx = seed_tmap(&db).await;
    db.copy_link(&fx.tagged, &fx.alice.id).await.unwrap();

    let TreasureMap::Sections(tmap) = build_tmap(&db, &opts("alice")).await.unwrap() else {
        panic!("expected all sections");
    };

    assert!(tmap.tagged.is_empty());
    assert_eq!(tmap.copied.len(), 2);
    // alice's own tag wins over the global categories
    let copied_tagged = tmap.copied.iter().find(|l| l.id == fx.tagged).unwrap();
    assert!(copied_tagged.cats_from_user);
}

#[tokio::test]
async fn test_single_section_with_cat_filter() {
    let (db, _temp) = create_test_db().await;
    seed_tmap(&db).await;
    let extra = create_test_link(&db, "https://alice.dev/flowers", "alice", "Flowers,flowers,test,coding").await;

    let options = TmapOptions {
        section: Some("submitted".into()),
        raw_cats: "flower,tests".into(),
        ..opts("alice")
    };
    let TreasureMap::Section(page) = build_tmap(&db, &options).await.unwrap() else {
        panic!("expected one section");
    };

    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].id, extra);
    assert_eq!(page.cats, vec![CatCount::new("coding", 1)]);
    assert_eq!(page.next_page, None);
}

#[tokio::test]
async fn test_sections_truncate_and_report_more() {
    let (db, _temp) = create_test_db().await;
    create_test_user(&db, "alice").await;
    for i in 0..22 {
        create_test_link(&db, &format!("https://alice.dev/{i}"), "alice", "bulk").await;
    }

    let TreasureMap::Sections(tmap) = build_tmap(&db, &opts("alice")).await.unwrap() else {
        panic!("expected all sections");
    };

    assert_eq!(tmap.submitted.len(), 20);
    assert_eq!(tmap.sections_with_more, vec!["submitted"]);
    // counted before truncation
    assert_eq!(tmap.cats, vec![CatCount::new("bulk", 22)]);
}

#[tokio::test]
async fn test_sort_by_newest() {
    let (db, _temp) = create_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let liked_old = create_test_link(&db, "https://alice.dev/old", "alice", "a").await;
    let fresh = create_test_link(&db, "https://alice.dev/new", "alice", "a").await;
    backdate_link(&db, &liked_old, 3).await;
    db.like_link(&liked_old, &alice.id).await.unwrap();

    let section = |newest: bool| TmapOptions {
        section: Some("submitted".into()),
        sort_by_newest: newest,
        ..opts("alice")
    };

    let TreasureMap::Section(popular) = build_tmap(&db, &section(false)).await.unwrap() else {
        panic!("expected one section");
    };
    assert_eq!(popular.links[0].id, liked_old);

    let TreasureMap::Section(newest) = build_tmap(&db, &section(true)).await.unwrap() else {
        panic!("expected one section");
    };
    assert_eq!(newest.links[0].id, fresh);
}

#[tokio::test]
async fn test_tmap_errors() {
    let (db, _temp) = create_test_db().await;
    create_test_user(&db, "alice").await;

    let err = build_tmap(&db, &opts(" ")).await.unwrap_err();
    assert!(matches!(err, ViewError::Query(QueryError::NoTmapOwner)));

    let err = build_tmap(&db, &opts("nobody")).await.unwrap_err();
    assert!(matches!(err, ViewError::UnknownOwner(name) if name == "nobody"));

    let bad_section = TmapOptions {
        section: Some("liked".into()),
        ..opts("alice")
    };
    let err = build_tmap(&db, &bad_section).await.unwrap_err();
    assert!(matches!(err, ViewError::Query(QueryError::InvalidSection(_))));

    let bad_page = TmapOptions {
        section: Some("copied".into()),
        page: -3,
        ..opts("alice")
    };
    let err = build_tmap(&db, &bad_page).await.unwrap_err();
    assert!(matches!(err, ViewError::Query(QueryError::InvalidPage(-3))));

    let bad_period = TmapOptions {
        period: Some("decade".into()),
        ..opts("alice")
    };
    let err = build_tmap(&db, &bad_period).await.unwrap_err();
    assert!(matches!(err, ViewError::Query(QueryError::InvalidPeriod(_))));
}

#[tokio::test]
async fn test_nsfw_links_follow_the_owners_categories() {
    let (db, _temp) = create_test_db().await;
    let fx = seed_tmap(&db).await;

    let own_nsfw = create_test_link(&db, "https://alice.dev/late", "alice", "rust,NSFW").await;
    let copied_nsfw = create_test_link(&db, "https://bob.dev/3", "bob", "art,nsfw").await;
    db.copy_link(&copied_nsfw, &fx.alice.id).await.unwrap();
    // NSFW globally, but alice's own tag is what her map uses
    let retagged = create_test_link(&db, "https://bob.dev/4", "bob", "nsfw").await;
    db.tag_link(&retagged, "alice", "art").await.unwrap();

    let TreasureMap::Sections(hidden) = build_tmap(&db, &opts("alice")).await.unwrap() else {
        panic!("expected all sections");
    };
    assert_eq!(hidden.submitted.len(), 1);
    assert_eq!(hidden.copied.len(), 1);
    assert_eq!(hidden.tagged.len(), 2);
    assert_eq!(hidden.nsfw_links_count, 2);

    let included = TmapOptions {
        include_nsfw: true,
        ..opts("alice")
    };
    let TreasureMap::Sections(shown) = build_tmap(&db, &included).await.unwrap() else {
        panic!("expected all sections");
    };
    assert!(shown.submitted.iter().any(|l| l.id == own_nsfw));
    assert!(shown.copied.iter().any(|l| l.id == copied_nsfw));
    assert_eq!(shown.nsfw_links_count, 2);

    let copied_art = TmapOptions {
        section: Some("copied".into()),
        raw_cats: "art".into(),
        ..opts("alice")
    };
    let TreasureMap::Section(section) = build_tmap(&db, &copied_art).await.unwrap() else {
        panic!("expected a single section");
    };
    assert!(section.links.is_empty());
    assert_eq!(section.nsfw_links_count, 1);
}

