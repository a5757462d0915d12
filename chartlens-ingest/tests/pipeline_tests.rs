//! End-to-end pipeline tests: CSV file on disk -> read -> normalize -> load

use chartlens_ingest::csv_reader::read_csv;
use chartlens_ingest::{normalize, UpsertLoader, NUMERIC_COLUMNS};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::io::Write;

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

#[tokio::test]
async fn csv_export_loads_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "track_name,artist(s)_name,artist_count,released_year,released_month,released_day,streams,in_spotify_playlists,bpm,key,mode,danceability_%"
    )
    .unwrap();
    // comma-grouped streams value, quoted
    writeln!(
        file,
        "Flowers,Miley Cyrus,1,2023,1,12,\"1,316,855,716\",12211,118,G,Major,71"
    )
    .unwrap();
    // multi-artist credit
    writeln!(
        file,
        "Seven,\"Latto, Jung Kook\",2,2023,7,14,141381703,553,125,B,Major,80"
    )
    .unwrap();
    // missing track name: dropped by normalization
    writeln!(file, ",Nobody,1,2020,1,1,5,1,100,C,Minor,10").unwrap();
    // malformed bpm and absent release day
    writeln!(file, "Odd One,Somebody,1,2021,3,,77,2,fast,D,Minor,44").unwrap();

    let raw = read_csv(file.path()).expect("read_csv failed");
    assert_eq!(raw.rows.len(), 4);

    let cleaned = normalize(raw, NUMERIC_COLUMNS);
    assert_eq!(cleaned.rows.len(), 3);

    let pool = test_pool().await;
    let report = UpsertLoader::new().load(&pool, &cleaned).await;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.tracks, 3);
    assert_eq!(report.artists, 4);
    assert_eq!(report.links, 4);

    let flowers_streams: i64 = sqlx::query_scalar(
        r#"
        SELECT sm.streams FROM streaming_metrics sm
        JOIN tracks t ON t.track_id = sm.track_id
        WHERE t.track_name = 'Flowers'
        "#,
    )
    .fetch_one(&pool)
    .await
    .expect("Select failed");
    assert_eq!(flowers_streams, 1_316_855_716);

    // Malformed bpm defaulted to zero, missing day left the date NULL
    let (bpm, release_date): (i64, Option<String>) = sqlx::query_as(
        r#"
        SELECT ma.bpm, t.release_date FROM tracks t
        JOIN musical_attributes ma ON ma.track_id = t.track_id
        WHERE t.track_name = 'Odd One'
        "#,
    )
    .fetch_one(&pool)
    .await
    .expect("Select failed");
    assert_eq!(bpm, 0);
    assert_eq!(release_date, None);

    let flowers_date: Option<String> =
        sqlx::query_scalar("SELECT release_date FROM tracks WHERE track_name = 'Flowers'")
            .fetch_one(&pool)
            .await
            .expect("Select failed");
    assert_eq!(flowers_date.as_deref(), Some("2023-01-12"));
}
