//! Album operations

use crate::domain::{Album, NewAlbum};

use super::{Repository, RepositoryError, RepositoryResult};

impl Repository {
    /// All albums, ascending by id
    pub async fn list_albums(&self) -> RepositoryResult<Vec<Album>> {
        let albums = sqlx::query_as::<_, Album>(
            "SELECT id, title, artist, price, stock FROM albums ORDER BY id",
        )
        .fetch_all(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to query albums"))?;

        Ok(albums)
    }

    /// Albums by the given artist (exact match)
    pub async fn albums_by_artist(&self, artist: &str) -> RepositoryResult<Vec<Album>> {
        let albums = sqlx::query_as::<_, Album>(
            "SELECT id, title, artist, price, stock FROM albums WHERE artist = $1 ORDER BY id",
        )
        .bind(artist)
        .fetch_all(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(artist, error = %e, "Failed to query albums by artist"))?;

        Ok(albums)
    }

    /// Album with the given id
    pub async fn album_by_id(&self, id: i64) -> RepositoryResult<Album> {
        sqlx::query_as::<_, Album>("SELECT id, title, artist, price, stock FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(self.store.pool())
            .await?
            .ok_or_else(|| RepositoryError::album_not_found(id))
    }

    /// Insert an album, returning its store-assigned id
    pub async fn add_album(&self, album: &NewAlbum) -> RepositoryResult<i64> {
        tracing::info!(
            title = %album.title,
            artist = %album.artist,
            price = %album.price,
            stock = album.stock,
            "Adding new album"
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO albums (title, artist, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(album.price.value())
        .bind(album.stock)
        .fetch_one(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(title = %album.title, error = %e, "Failed to insert album"))?;

        tracing::info!(album_id = id, title = %album.title, "Album created");
        Ok(id)
    }
}
