//! Upsert loader integration tests
//!
//! Exercises the five-pass load against in-memory databases: idempotent
//! re-runs, multi-artist linking, release-date composition, and per-entity
//! error isolation.

use chartlens_ingest::normalize::{RecordSet, Row};
use chartlens_ingest::UpsertLoader;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    chartlens_common::db::create_schema(&pool)
        .await
        .expect("Schema initialization failed");
    pool
}

fn row(cells: &[(&str, &str)]) -> Row {
    cells.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn records(rows: Vec<Row>) -> RecordSet {
    let columns = vec![
        "track_name",
        "artist(s)_name",
        "artist_count",
        "released_year",
        "released_month",
        "released_day",
        "streams",
        "in_spotify_playlists",
        "bpm",
        "key",
        "mode",
        "danceability_%",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    RecordSet { columns, rows }
}

fn sample_rows() -> Vec<Row> {
    vec![
        row(&[
            ("track_name", "Blinding Lights"),
            ("artist(s)_name", "The Weeknd"),
            ("artist_count", "1"),
            ("released_year", "2019"),
            ("released_month", "11"),
            ("released_day", "29"),
            ("streams", "3703895074"),
            ("in_spotify_playlists", "43899"),
            ("bpm", "171"),
            ("key", "C#"),
            ("mode", "Major"),
            ("danceability_%", "50"),
        ]),
        row(&[
            ("track_name", "Seven"),
            ("artist(s)_name", "Latto, Jung Kook"),
            ("artist_count", "2"),
            ("released_year", "2023"),
            ("released_month", "7"),
            ("released_day", "14"),
            ("streams", "141381703"),
            ("in_spotify_playlists", "553"),
            ("bpm", "125"),
            ("key", "B"),
            ("mode", "Major"),
            ("danceability_%", "80"),
        ]),
    ]
}

#[tokio::test]
async fn multi_artist_row_produces_one_link_per_artist() {
    let pool = test_pool().await;

    let report = UpsertLoader::new().load(&pool, &records(sample_rows())).await;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.artists, 3);
    assert_eq!(report.tracks, 2);
    assert_eq!(report.links, 3);

    let seven_links: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM artist_tracks at
        JOIN tracks t ON t.track_id = at.track_id
        WHERE t.track_name = 'Seven'
        "#,
    )
    .fetch_one(&pool)
    .await
    .expect("Count failed");
    assert_eq!(seven_links, 2);

    let linked_artists: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT a.artist_name FROM artists a
        JOIN artist_tracks at ON at.artist_id = a.artist_id
        JOIN tracks t ON t.track_id = at.track_id
        WHERE t.track_name = 'Seven'
        ORDER BY a.artist_name
        "#,
    )
    .fetch_all(&pool)
    .await
    .expect("Select failed");
    let names: Vec<&str> = linked_artists.iter().map(|(n,)| n.as_str()).collect();
    assert_eq!(names, vec!["Jung Kook", "Latto"]);
}

#[tokio::test]
async fn reloading_the_same_rows_is_idempotent() {
    let pool = test_pool().await;
    let set = records(sample_rows());

    UpsertLoader::new().load(&pool, &set).await;

    let id_before: i64 = sqlx::query_scalar("SELECT track_id FROM tracks WHERE track_name = 'Seven'")
        .fetch_one(&pool)
        .await
        .expect("Select failed");

    // Second run with a fresh loader (empty caches, storage round-trips only)
    let report = UpsertLoader::new().load(&pool, &set).await;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);

    let id_after: i64 = sqlx::query_scalar("SELECT track_id FROM tracks WHERE track_name = 'Seven'")
        .fetch_one(&pool)
        .await
        .expect("Select failed");
    assert_eq!(id_before, id_after);

    for (table, expected) in [
        ("artists", 3i64),
        ("tracks", 2),
        ("artist_tracks", 3),
        ("streaming_metrics", 2),
        ("musical_attributes", 2),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&pool)
            .await
            .expect("Count failed");
        assert_eq!(count, expected, "row count of {}", table);
    }
}

#[tokio::test]
async fn second_run_refreshes_metrics_values() {
    let pool = test_pool().await;

    let mut rows = sample_rows();
    UpsertLoader::new().load(&pool, &records(rows.clone())).await;

    rows[0].insert("streams".to_string(), "4000000000".to_string());
    let report = UpsertLoader::new().load(&pool, &records(rows)).await;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);

    let streams: i64 = sqlx::query_scalar(
        r#"
        SELECT sm.streams FROM streaming_metrics sm
        JOIN tracks t ON t.track_id = sm.track_id
        WHERE t.track_name = 'Blinding Lights'
        "#,
    )
    .fetch_one(&pool)
    .await
    .expect("Select failed");
    assert_eq!(streams, 4_000_000_000);
}

#[tokio::test]
async fn partial_release_date_is_stored_as_null() {
    let pool = test_pool().await;

    let rows = vec![row(&[
        ("track_name", "No Day"),
        ("artist(s)_name", "Someone"),
        ("artist_count", "1"),
        ("released_year", "2020"),
        ("released_month", "5"),
        ("released_day", ""),
        ("streams", "10"),
    ])];
    let report = UpsertLoader::new().load(&pool, &records(rows)).await;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);

    let release_date: Option<String> =
        sqlx::query_scalar("SELECT release_date FROM tracks WHERE track_name = 'No Day'")
            .fetch_one(&pool)
            .await
            .expect("Select failed");
    assert_eq!(release_date, None);
}

#[tokio::test]
async fn one_failing_artist_does_not_block_the_other_link() {
    let pool = test_pool().await;

    // Reject one specific artist at the storage level
    sqlx::query(
        r#"
        CREATE TRIGGER reject_artist BEFORE INSERT ON artists
        WHEN NEW.artist_name = 'Bad Artist'
        BEGIN
            SELECT RAISE(ABORT, 'artist rejected by storage');
        END
        "#,
    )
    .execute(&pool)
    .await
    .expect("Trigger creation failed");

    let rows = vec![row(&[
        ("track_name", "Duet"),
        ("artist(s)_name", "Good Artist, Bad Artist"),
        ("artist_count", "2"),
        ("streams", "100"),
    ])];
    let report = UpsertLoader::new().load(&pool, &records(rows)).await;

    assert_eq!(report.errors.len(), 1, "errors: {:?}", report.errors);
    assert!(report.errors[0].contains("Bad Artist"));
    assert!(report.errors[0].starts_with("Error inserting artist"));

    // The surviving artist is linked; the rejected one is absent entirely
    let links: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT a.artist_name FROM artist_tracks at
        JOIN artists a ON a.artist_id = at.artist_id
        JOIN tracks t ON t.track_id = at.track_id
        WHERE t.track_name = 'Duet'
        "#,
    )
    .fetch_all(&pool)
    .await
    .expect("Select failed");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].0, "Good Artist");

    let bad_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM artists WHERE artist_name = 'Bad Artist'")
            .fetch_one(&pool)
            .await
            .expect("Count failed");
    assert_eq!(bad_count, 0);
}

#[tokio::test]
async fn later_passes_survive_a_missing_table() {
    let pool = test_pool().await;

    // Simulate a broken storage target for one pass only
    sqlx::query("DROP TABLE streaming_metrics")
        .execute(&pool)
        .await
        .expect("Drop failed");

    let report = UpsertLoader::new().load(&pool, &records(sample_rows())).await;

    // Both metrics upserts fail and are reported; attributes still land
    assert_eq!(report.errors.len(), 2, "errors: {:?}", report.errors);
    assert!(report.errors.iter().all(|e| e.contains("streaming metrics")));
    assert_eq!(report.metrics_rows, 0);
    assert_eq!(report.attribute_rows, 2);

    let attr_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM musical_attributes")
        .fetch_one(&pool)
        .await
        .expect("Count failed");
    assert_eq!(attr_count, 2);
}
