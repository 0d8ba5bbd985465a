//! Integration tests for the Postgres-backed catalog store.
//!
//! Each test gets a fresh database with the crate's migrations applied.

use std::sync::Arc;

use soundshelf_core::category::Category;
use soundshelf_core::pagination::PageRequest;
use soundshelf_core::track::{Collaborator, TrackFields};
use soundshelf_core::types::DbId;
use soundshelf_db::models::album::{AlbumFilter, CreateAlbum, UpdateAlbum};
use soundshelf_db::models::track::{CreateTrack, TrackFilter};
use soundshelf_db::store::{AlbumStore, CatalogStore, TrackStore};
use soundshelf_db::PgCatalogStore;
use sqlx::PgPool;

fn new_track(title: &str, artist: &str, extra: &[(&str, &str)]) -> CreateTrack {
    let mut fields = TrackFields::default();
    fields.set("title", title.into());
    fields.set("artist", artist.into());
    fields.set("artistAvatar", "http://img.test/a.png".into());
    fields.set("duration", "180".into());
    for (name, value) in extra {
        fields.set(name, (*value).to_string());
    }
    CreateTrack {
        metadata: fields.validate().unwrap(),
        url: format!("http://media.test/audios/{title}.mp3"),
    }
}

async fn seed(store: &PgCatalogStore, title: &str, artist: &str, extra: &[(&str, &str)]) -> DbId {
    store
        .create_track(&new_track(title, artist, extra))
        .await
        .unwrap()
        .id
}

fn new_album(artist: &str, track_ids: Vec<DbId>) -> CreateAlbum {
    CreateAlbum {
        title: "Kind of Blue".into(),
        artist: artist.into(),
        artist_avatar: "http://img.test/a.png".into(),
        genre: "Jazz".into(),
        release_date: None,
        cover: Some("http://img.test/cover.png".into()),
        track_ids,
    }
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_track_round_trips_all_columns(pool: PgPool) {
    let store = PgCatalogStore::new(pool);

    let created = store
        .create_track(&new_track(
            "Blue in Green",
            "Miles",
            &[
                ("category", "Hip-hop"),
                ("collaborators", r#"[{"role":"piano","name":"Bill"}]"#),
                ("trackNumber", "3"),
                ("releaseDate", "1959-08-17"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(created.play_count, 0);
    assert_eq!(created.category, Category::HipHop);

    let found = store.find_track(created.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Blue in Green");
    assert_eq!(found.category, Category::HipHop);
    assert_eq!(
        found.collaborators.0,
        vec![Collaborator {
            role: "piano".into(),
            name: "Bill".into(),
        }]
    );
    assert_eq!(found.track_number, Some(3));
    assert_eq!(found.release_date.date_naive().to_string(), "1959-08-17");
    assert_eq!(found.url, "http://media.test/audios/Blue in Green.mp3");

    assert!(store.find_track(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_sorts_and_pages(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let mut x_ids = Vec::new();
    for i in 0..7 {
        x_ids.push(seed(&store, &format!("X{i}"), "X", &[]).await);
    }
    for i in 0..3 {
        seed(&store, &format!("Y{i}"), "Y", &[]).await;
    }

    let filter = TrackFilter {
        artist: Some("X".into()),
        ..Default::default()
    };
    let page = store
        .list_tracks(&filter, PageRequest { page: 2, limit: 5 })
        .await
        .unwrap();

    assert_eq!(page.total, 7);
    let ids: Vec<DbId> = page.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![x_ids[1], x_ids[0]]);
    assert!(page.items.iter().all(|t| t.artist == "X"));

    let all = store
        .list_tracks(&TrackFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total, 10);
    assert_eq!(all.items.len(), 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_combines_genre_album_and_category(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let hit = seed(
        &store,
        "Hit",
        "P",
        &[("genre", "Bebop"), ("album", "LP"), ("category", "Jazz")],
    )
    .await;
    seed(&store, "Miss1", "P", &[("genre", "Bebop"), ("album", "LP")]).await;
    seed(&store, "Miss2", "P", &[("genre", "Bebop"), ("category", "Jazz")]).await;

    let filter = TrackFilter {
        genre: Some("Bebop".into()),
        album: Some("LP".into()),
        category: Some("Jazz".into()),
        ..Default::default()
    };
    let page = store.list_tracks(&filter, PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, hit);

    let unknown = TrackFilter {
        category: Some("Polka".into()),
        ..Default::default()
    };
    let page = store.list_tracks(&unknown, PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_with_maximum_limit(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    seed(&store, "One", "A", &[]).await;
    seed(&store, "Two", "A", &[]).await;

    let page = store
        .list_tracks(
            &TrackFilter::default(),
            PageRequest {
                page: 1,
                limit: i64::MAX,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn increment_play_count_is_atomic(pool: PgPool) {
    let store = Arc::new(PgCatalogStore::new(pool));
    let id = seed(&store, "Hot", "A", &[]).await;

    assert_eq!(store.increment_play_count(id).await.unwrap(), Some(1));
    assert_eq!(store.increment_play_count(id).await.unwrap(), Some(2));
    assert_eq!(store.increment_play_count(id + 1000).await.unwrap(), None);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.increment_play_count(id).await.unwrap() })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }

    let track = store.find_track(id).await.unwrap().unwrap();
    assert_eq!(track.play_count, 22);
}

#[sqlx::test(migrations = "./migrations")]
async fn existing_ids_and_refs_skip_unknown(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let a = seed(&store, "A", "P", &[]).await;
    let b = seed(&store, "B", "Q", &[]).await;

    let mut found = store.existing_track_ids(&[b, 999, a]).await.unwrap();
    found.sort_unstable();
    let mut expected = vec![a, b];
    expected.sort_unstable();
    assert_eq!(found, expected);

    let refs = store.track_refs(&[a, 999]).await.unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].id, a);
    assert_eq!(refs[0].title, "A");
    assert_eq!(refs[0].artist, "P");
    assert_eq!(refs[0].duration, 180.0);
}

// ---------------------------------------------------------------------------
// Albums
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_album_keeps_track_order_and_defaults_release_date(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let a = seed(&store, "A", "P", &[]).await;
    let b = seed(&store, "B", "P", &[]).await;

    let album = store.create_album(&new_album("alice", vec![b, a])).await.unwrap();

    assert_eq!(album.tracks, vec![b, a]);
    assert_eq!(album.artist, "alice");
    assert_eq!(album.created_at, album.updated_at);

    let found = store.find_album(album.id).await.unwrap().unwrap();
    assert_eq!(found.tracks, vec![b, a]);
    assert_eq!(found.release_date, album.release_date);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_album_applies_only_present_fields(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let a = seed(&store, "A", "P", &[]).await;
    let b = seed(&store, "B", "P", &[]).await;
    let album = store.create_album(&new_album("alice", vec![a])).await.unwrap();

    let updated = store
        .update_album(
            album.id,
            &UpdateAlbum {
                title: Some("Renamed".into()),
                track_ids: Some(vec![b, a]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.genre, "Jazz");
    assert_eq!(updated.cover.as_deref(), Some("http://img.test/cover.png"));
    assert_eq!(updated.release_date, album.release_date);
    assert_eq!(updated.tracks, vec![b, a]);
    assert!(updated.updated_at >= album.updated_at);

    let unchanged = store
        .update_album(album.id, &UpdateAlbum::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "Renamed");
    assert_eq!(unchanged.cover, updated.cover);

    assert!(store
        .update_album(album.id + 1000, &UpdateAlbum::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_and_delete_albums(pool: PgPool) {
    let store = PgCatalogStore::new(pool);
    let a = seed(&store, "A", "P", &[]).await;
    let first = store.create_album(&new_album("alice", vec![a])).await.unwrap();
    let second = store.create_album(&new_album("bob", vec![a])).await.unwrap();

    let all = store.list_albums(&AlbumFilter::default()).await.unwrap();
    let ids: Vec<DbId> = all.iter().map(|album| album.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let bobs = store
        .list_albums(&AlbumFilter {
            artist: Some("bob".into()),
        })
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].id, second.id);

    assert!(store.delete_album(first.id).await.unwrap());
    assert!(!store.delete_album(first.id).await.unwrap());
    assert!(store.find_track(a).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn health_check_reaches_database(pool: PgPool) {
    let store = PgCatalogStore::new(pool);

    store.health_check().await.unwrap();
    assert_eq!(store.backend_name(), "postgres");
}
