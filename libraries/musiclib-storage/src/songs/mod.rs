use musiclib_core::{AlbumId, LibraryError, Result, Song, SongId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const COLUMNS: &str = "id, album, title, track_number, disc_number, duration, flags,
    relative_path, base_path, mime, extension, encoded_extension, is_encoded,
    fingerprint, encoded_source";

fn from_row(row: &SqliteRow) -> Song {
    Song {
        id: Some(row.get("id")),
        title: row.get("title"),
        track_number: row.get::<i64, _>("track_number") as u32,
        disc_number: row.get::<i64, _>("disc_number") as u32,
        duration: row.get("duration"),
        flags: row.get("flags"),
        relative_path: row.get("relative_path"),
        base_path: row.get("base_path"),
        mime: row.get("mime"),
        extension: row.get("extension"),
        encoded_extension: row.get("encoded_extension"),
        is_encoded: row.get("is_encoded"),
        fingerprint: row.get("fingerprint"),
        encoded_source: row.get("encoded_source"),
    }
}

/// Every song paired with its owning album id, in album play order.
pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<(AlbumId, Song)>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM songs ORDER BY album, disc_number, track_number, id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get::<AlbumId, _>("album"), from_row(row)))
        .collect())
}

pub async fn get_by_album(conn: &mut SqliteConnection, album_id: AlbumId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM songs WHERE album = ? ORDER BY disc_number, track_number, id"
    ))
    .bind(album_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

pub async fn create(conn: &mut SqliteConnection, album_id: AlbumId, song: &Song) -> Result<SongId> {
    let result = sqlx::query(
        "INSERT INTO songs (album, title, track_number, disc_number, duration, flags,
                            relative_path, base_path, mime, extension, encoded_extension,
                            is_encoded, fingerprint, encoded_source)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(album_id)
    .bind(&song.title)
    .bind(i64::from(song.track_number))
    .bind(i64::from(song.disc_number))
    .bind(&song.duration)
    .bind(&song.flags)
    .bind(&song.relative_path)
    .bind(&song.base_path)
    .bind(&song.mime)
    .bind(&song.extension)
    .bind(&song.encoded_extension)
    .bind(song.is_encoded)
    .bind(&song.fingerprint)
    .bind(&song.encoded_source)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite a song's metadata and parent album; `encoded_source` is kept.
pub async fn update(
    conn: &mut SqliteConnection,
    id: SongId,
    album_id: AlbumId,
    song: &Song,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE songs
         SET album = ?, title = ?, track_number = ?, disc_number = ?, duration = ?,
             flags = ?, relative_path = ?, base_path = ?, mime = ?, extension = ?,
             encoded_extension = ?, is_encoded = ?, fingerprint = ?
         WHERE id = ?",
    )
    .bind(album_id)
    .bind(&song.title)
    .bind(i64::from(song.track_number))
    .bind(i64::from(song.disc_number))
    .bind(&song.duration)
    .bind(&song.flags)
    .bind(&song.relative_path)
    .bind(&song.base_path)
    .bind(&song.mime)
    .bind(&song.extension)
    .bind(&song.encoded_extension)
    .bind(song.is_encoded)
    .bind(&song.fingerprint)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::not_found("Song", id));
    }
    Ok(())
}

pub async fn update_paths(
    conn: &mut SqliteConnection,
    id: SongId,
    relative_path: &str,
    base_path: &str,
) -> Result<()> {
    let result = sqlx::query("UPDATE songs SET relative_path = ?, base_path = ? WHERE id = ?")
        .bind(relative_path)
        .bind(base_path)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::not_found("Song", id));
    }
    Ok(())
}

pub async fn set_encoded_source(
    conn: &mut SqliteConnection,
    id: SongId,
    fingerprint: &str,
) -> Result<()> {
    let result = sqlx::query("UPDATE songs SET encoded_source = ? WHERE id = ?")
        .bind(fingerprint)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::not_found("Song", id));
    }
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: SongId) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::not_found("Song", id));
    }
    Ok(())
}
