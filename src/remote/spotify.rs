use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, Method, StatusCode};
use serde::Deserialize;

use super::{ItemKind, PlaybackService, PlaybackSnapshot};
use crate::config::SpotifyConfig;

// API Response models
#[derive(Debug, Deserialize)]
struct PlaybackStateResponse {
    is_playing: bool,
    progress_ms: Option<u64>,
    device: Option<DeviceResponse>,
    currently_playing_type: Option<String>,
    item: Option<ItemResponse>,
}

#[derive(Debug, Deserialize)]
struct DeviceResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    name: String,
    duration_ms: u64,
    #[serde(default)]
    artists: Vec<ArtistResponse>,
    album: Option<AlbumResponse>,
    show: Option<ShowResponse>,
}

#[derive(Debug, Deserialize)]
struct ArtistResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    name: String,
    #[serde(default)]
    images: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ShowResponse {
    name: String,
}

impl PlaybackStateResponse {
    /// Convert to a snapshot. Ads, unknown item types and an empty item
    /// all count as "nothing playing".
    fn into_snapshot(self) -> Option<PlaybackSnapshot> {
        let item_kind: ItemKind = self.currently_playing_type.as_deref()?.parse().ok()?;
        let item = self.item?;

        let (subtitle, album_name, album_art_url) = match item_kind {
            ItemKind::Track => {
                let artists = item
                    .artists
                    .iter()
                    .map(|artist| artist.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let album_art_url = item
                    .album
                    .as_ref()
                    .and_then(|album| album.images.first())
                    .map(|image| image.url.clone());
                (artists, item.album.map(|album| album.name), album_art_url)
            }
            ItemKind::Episode => {
                let show = item.show.map(|show| show.name).unwrap_or_default();
                (show, None, None)
            }
        };

        Some(PlaybackSnapshot {
            is_playing: self.is_playing,
            device_id: self.device.and_then(|device| device.id).unwrap_or_default(),
            item_kind,
            item_name: item.name,
            subtitle,
            album_name,
            album_art_url,
            progress_ms: self.progress_ms.unwrap_or(0),
            duration_ms: item.duration_ms,
        })
    }
}

/// Spotify Web API player client
pub struct SpotifyClient {
    http_client: HttpClient,
    api_base: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig) -> Result<Self> {
        let access_token = config
            .resolve_access_token()
            .ok_or_else(|| anyhow!("No Spotify access token (set spotify.access_token or SPOTIFY_ACCESS_TOKEN)"))?;

        // No timeout: a hanging call only delays its own refresh cycle
        let http_client = HttpClient::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn send_player_command(&self, method: Method, path: &str, device_id: &str) -> Result<()> {
        tracing::debug!("{} {} (device {:?})", method, path, device_id);

        self.http_client
            .request(method, self.url(path))
            .bearer_auth(&self.access_token)
            .query(&[("device_id", device_id)])
            .header(header::CONTENT_LENGTH, "0")
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", path))?
            .error_for_status()
            .with_context(|| format!("Spotify rejected {}", path))?;

        Ok(())
    }
}

#[async_trait]
impl PlaybackService for SpotifyClient {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn get_playback_state(&self) -> Result<Option<PlaybackSnapshot>> {
        let response = self
            .http_client
            .get(self.url("me/player"))
            .bearer_auth(&self.access_token)
            .query(&[("additional_types", "episode")])
            .send()
            .await
            .context("Failed to fetch playback state")?
            .error_for_status()
            .context("Spotify rejected playback state request")?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body: PlaybackStateResponse = response
            .json()
            .await
            .context("Failed to parse playback state")?;

        Ok(body.into_snapshot())
    }

    async fn skip_to_next(&self, device_id: &str) -> Result<()> {
        self.send_player_command(Method::POST, "me/player/next", device_id).await
    }

    async fn skip_to_previous(&self, device_id: &str) -> Result<()> {
        self.send_player_command(Method::POST, "me/player/previous", device_id).await
    }

    async fn pause_playback(&self, device_id: &str) -> Result<()> {
        self.send_player_command(Method::PUT, "me/player/pause", device_id).await
    }

    async fn start_resume_playback(&self, device_id: &str) -> Result<()> {
        self.send_player_command(Method::PUT, "me/player/play", device_id).await
    }
}
