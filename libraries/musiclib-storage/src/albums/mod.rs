use musiclib_core::{Album, AlbumId, ArtistId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

fn from_row(row: &SqliteRow) -> Album {
    let mut album = Album::new(row.get::<String, _>("title"), row.get::<String, _>("sort_title"));
    album.id = Some(row.get("id"));
    album
}

/// Every album paired with its owning artist id.
pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<(ArtistId, Album)>> {
    let rows = sqlx::query(
        "SELECT id, artist, title, sort_title
         FROM albums
         ORDER BY sort_title, title",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get::<ArtistId, _>("artist"), from_row(row)))
        .collect())
}

pub async fn get_by_artist(conn: &mut SqliteConnection, artist_id: ArtistId) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT id, artist, title, sort_title
         FROM albums
         WHERE artist = ?
         ORDER BY sort_title, title",
    )
    .bind(artist_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

pub async fn find(
    conn: &mut SqliteConnection,
    artist_id: ArtistId,
    title: &str,
) -> Result<Option<AlbumId>> {
    let id = sqlx::query_scalar("SELECT id FROM albums WHERE artist = ? AND title = ?")
        .bind(artist_id)
        .bind(title)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(id)
}

pub async fn create(
    conn: &mut SqliteConnection,
    artist_id: ArtistId,
    title: &str,
    sort_title: &str,
) -> Result<AlbumId> {
    let result = sqlx::query("INSERT INTO albums (artist, title, sort_title) VALUES (?, ?, ?)")
        .bind(artist_id)
        .bind(title)
        .bind(sort_title)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Existing album id for `(artist_id, title)`, or a newly created one.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    artist_id: ArtistId,
    title: &str,
    sort_title: &str,
) -> Result<AlbumId> {
    match find(conn, artist_id, title).await? {
        Some(id) => Ok(id),
        None => create(conn, artist_id, title, sort_title).await,
    }
}

/// Delete albums that own no songs. Returns the number removed.
pub async fn delete_empty(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM albums
         WHERE NOT EXISTS (SELECT 1 FROM songs WHERE songs.album = albums.id)",
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
