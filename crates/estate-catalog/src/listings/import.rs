use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::{ListingStatus, ListingValidationError, PropertyDraft, PropertyType};

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownType { line: usize, value: String },
    UnknownStatus { line: usize, value: String },
    Invalid { line: usize, source: ListingValidationError },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing CSV: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
            ListingImportError::UnknownType { line, value } => {
                write!(f, "line {line}: unknown property type '{value}'")
            }
            ListingImportError::UnknownStatus { line, value } => {
                write!(f, "line {line}: unknown listing status '{value}'")
            }
            ListingImportError::Invalid { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Invalid { source, .. } => Some(source),
            ListingImportError::UnknownType { .. } | ListingImportError::UnknownStatus { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads listing drafts from a CSV export; `images` and `features` are `|`-separated.
pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyDraft>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PropertyDraft>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut drafts = Vec::new();

        for (index, row) in csv_reader.deserialize::<ListingRow>().enumerate() {
            // Header occupies line 1.
            let line = index + 2;
            let draft = row?.into_draft(line)?;
            draft
                .validate()
                .map_err(|source| ListingImportError::Invalid { line, source })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    title: String,
    #[serde(default)]
    description: String,
    price: f64,
    location: String,
    property_type: String,
    area: f64,
    rooms: u32,
    #[serde(default)]
    bathrooms: Option<u32>,
    #[serde(default)]
    plot_size: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    purpose: Option<String>,
    #[serde(default)]
    images: String,
    #[serde(default)]
    features: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tour_3d_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    krisha_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl ListingRow {
    fn into_draft(self, line: usize) -> Result<PropertyDraft, ListingImportError> {
        let property_type = PropertyType::parse(&self.property_type).ok_or_else(|| {
            ListingImportError::UnknownType {
                line,
                value: self.property_type.clone(),
            }
        })?;
        let status = match self.status {
            None => ListingStatus::default(),
            Some(raw) => ListingStatus::parse(&raw)
                .ok_or(ListingImportError::UnknownStatus { line, value: raw })?,
        };

        Ok(PropertyDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            property_type,
            area: self.area,
            rooms: self.rooms,
            bathrooms: self.bathrooms,
            plot_size: self.plot_size,
            purpose: self.purpose,
            images: split_list(&self.images),
            features: split_list(&self.features),
            tour_3d_url: self.tour_3d_url,
            krisha_url: self.krisha_url,
            status,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
