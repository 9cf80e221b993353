use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the backend when a listing is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Penthouse,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Apartment, Self::House, Self::Villa, Self::Penthouse]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Villa => "villa",
            Self::Penthouse => "penthouse",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Квартира",
            Self::House => "Дом",
            Self::Villa => "Вилла",
            Self::Penthouse => "Пентхаус",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Available,
    Sold,
}

impl ListingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "В продаже",
            Self::Sold => "Продано",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }
}

/// A real-estate listing as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub property_type: PropertyType,
    pub area: f64,
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub plot_size: Option<f64>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tour_3d_url: Option<String>,
    #[serde(default)]
    pub krisha_url: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn from_draft(id: PropertyId, draft: PropertyDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            location: draft.location,
            property_type: draft.property_type,
            area: draft.area,
            rooms: draft.rooms,
            bathrooms: draft.bathrooms,
            plot_size: draft.plot_size,
            purpose: draft.purpose,
            images: draft.images,
            features: draft.features,
            tour_3d_url: draft.tour_3d_url,
            krisha_url: draft.krisha_url,
            status: draft.status,
            created_at,
        }
    }

    /// First image, if the record carries any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Applies only the supplied fields of `patch`.
    pub fn apply(&mut self, patch: PropertyPatch) {
        let PropertyPatch {
            title,
            description,
            price,
            location,
            property_type,
            area,
            rooms,
            bathrooms,
            plot_size,
            purpose,
            images,
            features,
            tour_3d_url,
            krisha_url,
            status,
        } = patch;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = price {
            self.price = value;
        }
        if let Some(value) = location {
            self.location = value;
        }
        if let Some(value) = property_type {
            self.property_type = value;
        }
        if let Some(value) = area {
            self.area = value;
        }
        if let Some(value) = rooms {
            self.rooms = value;
        }
        if let Some(value) = bathrooms {
            self.bathrooms = value;
        }
        if let Some(value) = plot_size {
            self.plot_size = value;
        }
        if let Some(value) = purpose {
            self.purpose = value;
        }
        if let Some(value) = images {
            self.images = value;
        }
        if let Some(value) = features {
            self.features = value;
        }
        if let Some(value) = tour_3d_url {
            self.tour_3d_url = value;
        }
        if let Some(value) = krisha_url {
            self.krisha_url = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
    }
}

/// Payload for creating a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub property_type: PropertyType,
    pub area: f64,
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub plot_size: Option<f64>,
    #[serde(default)]
    pub purpose: Option<String>,
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tour_3d_url: Option<String>,
    #[serde(default)]
    pub krisha_url: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
}

impl PropertyDraft {
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        check_title(&self.title)?;
        check_price(self.price)?;
        check_area(self.area)?;
        check_plot_size(self.plot_size)?;
        check_images(&self.images)
    }
}

impl From<PropertyDraft> for PropertyPatch {
    fn from(draft: PropertyDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            price: Some(draft.price),
            location: Some(draft.location),
            property_type: Some(draft.property_type),
            area: Some(draft.area),
            rooms: Some(draft.rooms),
            bathrooms: Some(draft.bathrooms),
            plot_size: Some(draft.plot_size),
            purpose: Some(draft.purpose),
            images: Some(draft.images),
            features: Some(draft.features),
            tour_3d_url: Some(draft.tour_3d_url),
            krisha_url: Some(draft.krisha_url),
            status: Some(draft.status),
        }
    }
}

/// Partial update; `None` leaves the stored value untouched. Nullable fields use
/// `Some(None)` to clear the stored value, which is how an explicit JSON `null` decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub bathrooms: Option<Option<u32>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub plot_size: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub purpose: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub tour_3d_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub krisha_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
}

impl PropertyPatch {
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(area) = self.area {
            check_area(area)?;
        }
        check_plot_size(self.plot_size.flatten())?;
        if let Some(images) = &self.images {
            check_images(images)?;
        }
        Ok(())
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rejections applied at the write boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("title must not be blank")]
    BlankTitle,
    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("area must be a positive number, got {0}")]
    InvalidArea(f64),
    #[error("plot size must be non-negative, got {0}")]
    InvalidPlotSize(f64),
    #[error("at least one image URL is required")]
    MissingImages,
}

fn check_title(title: &str) -> Result<(), ListingValidationError> {
    if title.trim().is_empty() {
        return Err(ListingValidationError::BlankTitle);
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ListingValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ListingValidationError::InvalidPrice(price));
    }
    Ok(())
}

fn check_area(area: f64) -> Result<(), ListingValidationError> {
    if !area.is_finite() || area <= 0.0 {
        return Err(ListingValidationError::InvalidArea(area));
    }
    Ok(())
}

fn check_plot_size(plot_size: Option<f64>) -> Result<(), ListingValidationError> {
    match plot_size {
        Some(size) if !size.is_finite() || size < 0.0 => {
            Err(ListingValidationError::InvalidPlotSize(size))
        }
        _ => Ok(()),
    }
}

fn check_images(images: &[String]) -> Result<(), ListingValidationError> {
    if images.iter().all(|url| url.trim().is_empty()) {
        return Err(ListingValidationError::MissingImages);
    }
    Ok(())
}
