//! Image assets and the image library.
//!
//! Assets are what image cells point at through `imageAssetId`. An upload
//! is keyed by the SHA-256 of its data URL, so uploading the same picture
//! twice yields the same asset. Deleting an asset only hides it from the
//! listing; cells that already reference it keep resolving.
//!
//! The library is a separate, user-curated collection of named images
//! grouped by category.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{Record, Records, StoreError};
use crate::error::{CanvasError, Result};

pub const DEFAULT_MIME_TYPE: &str = "image/png";
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub id: String,
    /// Hex SHA-256 of `image_data`.
    pub hash: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Length of the data URL in bytes.
    pub size: usize,
    /// The uploaded `data:<mime>;base64,<payload>` string.
    pub image_data: String,
    #[serde(default)]
    pub deleted: bool,
}

impl ImageAsset {
    /// What an image cell stores in `imageUrl` for this asset.
    pub fn url(&self) -> &str {
        &self.image_data
    }
}

impl Record for ImageAsset {
    const KIND: &'static str = "Image asset";

    fn id(&self) -> &str {
        &self.id
    }
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = std::fmt::Write::write_fmt(&mut hex, format_args!("{:02x}", byte));
    }
    hex
}

/// Split `data:<mime>;base64,<payload>` into mime type and payload.
pub fn parse_data_url(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let split = rest.rfind(";base64,")?;
    let mime = &rest[..split];
    if mime.is_empty() {
        return None;
    }
    Some((mime, &rest[split + ";base64,".len()..]))
}

fn decode_image_payload(data_url: &str) -> Result<(&str, Vec<u8>)> {
    let (mime, payload) = parse_data_url(data_url)
        .ok_or_else(|| CanvasError::Image("expected a base64 data URL".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CanvasError::Image(format!("invalid base64 payload: {}", e)))?;
    Ok((mime, bytes))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetStore {
    records: Records<ImageAsset>,
}

impl AssetStore {
    /// Store a data URL, or return the asset that already holds it.
    ///
    /// The payload must be valid base64; its content is not checked, so
    /// formats the sniffer doesn't know (SVG) are stored as given. The
    /// stored mime type is `mime_type` if given, else the data URL's.
    pub fn upload(&mut self, image_data: &str, mime_type: Option<&str>) -> Result<&ImageAsset> {
        let (url_mime, bytes) = decode_image_payload(image_data)?;
        match image::guess_format(&bytes) {
            Ok(format) => debug!(?format, declared = url_mime, "sniffed upload format"),
            Err(_) => debug!(declared = url_mime, "upload format not sniffable; storing as declared"),
        }

        let hash = sha256_hex(image_data.as_bytes());
        if let Some(index) = self.records.records.iter().position(|a| a.hash == hash) {
            let asset = &mut self.records.records[index];
            if asset.deleted {
                asset.deleted = false;
                info!(id = %asset.id, "deleted asset restored by re-upload");
            } else {
                debug!(id = %asset.id, "upload matched existing asset");
            }
            return Ok(&self.records.records[index]);
        }

        let mime_type = mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or(url_mime)
            .to_string();
        let id = self.records.allocate_id();
        info!(%id, %mime_type, size = image_data.len(), "image asset stored");
        Ok(self.records.insert(ImageAsset {
            id,
            hash,
            mime_type,
            size: image_data.len(),
            image_data: image_data.to_string(),
            deleted: false,
        }))
    }

    /// Fetch by id, including soft-deleted assets.
    pub fn get(&self, id: &str) -> Result<&ImageAsset> {
        Ok(self.records.get(id)?)
    }

    /// The decoded image bytes and the mime type to serve them with (the
    /// data URL's, which wins over the stored one).
    pub fn raw_bytes(&self, id: &str) -> Result<(Vec<u8>, String)> {
        let asset = self.get(id)?;
        let (url_mime, bytes) = decode_image_payload(&asset.image_data)?;
        Ok((bytes, url_mime.to_string()))
    }

    /// Hide an asset from [`list`](Self::list). It stays fetchable by id.
    pub fn delete(&mut self, id: &str) -> Result<&ImageAsset> {
        let asset = self.records.get_mut(id)?;
        asset.deleted = true;
        info!(id, "image asset soft-deleted");
        Ok(asset)
    }

    /// Non-deleted assets, newest first.
    pub fn list(&self) -> impl Iterator<Item = &ImageAsset> {
        self.records.iter().filter(|a| !a.deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryImage {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 image data.
    pub data: String,
    pub mime_type: String,
    /// Byte length of `data`.
    pub size: usize,
    pub category: String,
}

impl Record for LibraryImage {
    const KIND: &'static str = "Image";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A library entry without its data, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryImageSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mime_type: String,
    pub size: usize,
    pub category: String,
}

impl From<&LibraryImage> for LibraryImageSummary {
    fn from(image: &LibraryImage) -> Self {
        Self {
            id: image.id.clone(),
            name: image.name.clone(),
            description: image.description.clone(),
            mime_type: image.mime_type.clone(),
            size: image.size,
            category: image.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLibraryImage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageLibrary {
    records: Records<LibraryImage>,
}

impl ImageLibrary {
    pub fn add(&mut self, input: NewLibraryImage) -> Result<LibraryImageSummary> {
        if input.name.is_empty() {
            return Err(StoreError::MissingField("name").into());
        }
        if input.data.is_empty() {
            return Err(StoreError::MissingField("data").into());
        }
        if input.mime_type.is_empty() {
            return Err(StoreError::MissingField("mimeType").into());
        }

        let id = self.records.allocate_id();
        let category = input
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        info!(%id, name = %input.name, %category, "library image added");
        let image = self.records.insert(LibraryImage {
            id,
            name: input.name,
            description: input.description,
            size: input.data.len(),
            data: input.data,
            mime_type: input.mime_type,
            category,
        });
        Ok(image.into())
    }

    pub fn get(&self, id: &str) -> Result<&LibraryImage> {
        Ok(self.records.get(id)?)
    }

    /// Rename, re-describe or re-categorize an image. The data is fixed.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<LibraryImageSummary> {
        let image = self.records.get_mut(id)?;
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            image.name = name;
        }
        if description.is_some() {
            image.description = description;
        }
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            image.category = category;
        }
        info!(id, "library image updated");
        Ok(LibraryImageSummary::from(&*image))
    }

    pub fn delete(&mut self, id: &str) -> Result<LibraryImage> {
        let image = self.records.remove(id)?;
        info!(id, "library image deleted");
        Ok(image)
    }

    /// Metadata of every image, optionally in one category, newest first.
    pub fn list(&self, category: Option<&str>) -> Vec<LibraryImageSummary> {
        self.records
            .iter()
            .filter(|img| category.map_or(true, |c| img.category == c))
            .map(LibraryImageSummary::from)
            .collect()
    }
}
