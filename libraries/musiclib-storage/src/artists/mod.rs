use musiclib_core::{Artist, ArtistId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

fn from_row(row: &SqliteRow) -> Artist {
    let mut artist = Artist::new(row.get::<String, _>("name"), row.get::<String, _>("sort_name"));
    artist.id = Some(row.get("id"));
    artist
}

pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<Artist>> {
    let rows = sqlx::query(
        "SELECT id, name, sort_name
         FROM artists
         ORDER BY sort_name, name",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Artist>> {
    let row = sqlx::query("SELECT id, name, sort_name FROM artists WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn create(conn: &mut SqliteConnection, name: &str, sort_name: &str) -> Result<ArtistId> {
    let result = sqlx::query("INSERT INTO artists (name, sort_name) VALUES (?, ?)")
        .bind(name)
        .bind(sort_name)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Existing artist id for `name`, or a newly created one.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    name: &str,
    sort_name: &str,
) -> Result<ArtistId> {
    if let Some(Artist { id: Some(id), .. }) = find_by_name(conn, name).await? {
        return Ok(id);
    }
    create(conn, name, sort_name).await
}

/// Delete artists that own no albums. Returns the number removed.
pub async fn delete_empty(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM artists
         WHERE NOT EXISTS (SELECT 1 FROM albums WHERE albums.artist = artists.id)",
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
