use serde::{Deserialize, Serialize};

use crate::listings::{ListingStatus, Property, PropertyDraft, PropertyType};

/// Raw admin form state: every input is text, lists are comma-separated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub location: String,
    pub property_type: String,
    pub area: String,
    pub rooms: String,
    pub bathrooms: String,
    pub plot_size: String,
    pub purpose: String,
    pub images: String,
    pub features: String,
    pub tour_3d_url: String,
    pub krisha_url: String,
    pub status: String,
}

impl Default for AdminForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            location: String::new(),
            property_type: PropertyType::Apartment.as_str().to_string(),
            area: String::new(),
            rooms: String::new(),
            bathrooms: String::new(),
            plot_size: String::new(),
            purpose: String::new(),
            images: String::new(),
            features: String::new(),
            tour_3d_url: String::new(),
            krisha_url: String::new(),
            status: ListingStatus::Available.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("field `{field}` expects a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown property type '{0}'")]
    UnknownType(String),
    #[error("unknown listing status '{0}'")]
    UnknownStatus(String),
}

impl AdminForm {
    /// Prefills the form for editing an existing listing.
    pub fn from_property(property: &Property) -> Self {
        Self {
            title: property.title.clone(),
            description: property.description.clone(),
            price: property.price.to_string(),
            location: property.location.clone(),
            property_type: property.property_type.as_str().to_string(),
            area: property.area.to_string(),
            rooms: property.rooms.to_string(),
            bathrooms: property.bathrooms.map(|n| n.to_string()).unwrap_or_default(),
            plot_size: property.plot_size.map(|n| n.to_string()).unwrap_or_default(),
            purpose: property.purpose.clone().unwrap_or_default(),
            images: property.images.join(", "),
            features: property.features.join(", "),
            tour_3d_url: property.tour_3d_url.clone().unwrap_or_default(),
            krisha_url: property.krisha_url.clone().unwrap_or_default(),
            status: property.status.as_str().to_string(),
        }
    }

    /// Converts the form into the payload sent to the backend. Range checks
    /// stay with the backend; this only rejects text that cannot be parsed.
    pub fn to_draft(&self) -> Result<PropertyDraft, FormError> {
        let property_type = PropertyType::parse(&self.property_type)
            .ok_or_else(|| FormError::UnknownType(self.property_type.clone()))?;
        let status = if self.status.trim().is_empty() {
            ListingStatus::default()
        } else {
            ListingStatus::parse(&self.status)
                .ok_or_else(|| FormError::UnknownStatus(self.status.clone()))?
        };

        Ok(PropertyDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            price: parse_required("price", &self.price)?,
            location: self.location.clone(),
            property_type,
            area: parse_required("area", &self.area)?,
            rooms: parse_required("rooms", &self.rooms)?,
            bathrooms: parse_optional("bathrooms", &self.bathrooms)?,
            plot_size: parse_optional("plot_size", &self.plot_size)?,
            purpose: non_blank(&self.purpose),
            images: split_commas(&self.images),
            features: split_commas(&self.features),
            tour_3d_url: non_blank(&self.tour_3d_url),
            krisha_url: non_blank(&self.krisha_url),
            status,
        })
    }
}

fn parse_required<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, FormError> {
    raw.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_optional<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<Option<T>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_required(field, raw).map(Some)
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn split_commas(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::tests::sample_properties;

    fn filled() -> AdminForm {
        AdminForm {
            title: "Дом в Талгаре".to_string(),
            price: "72000000".to_string(),
            location: "Талгар".to_string(),
            property_type: "house".to_string(),
            area: "140.5".to_string(),
            rooms: "4".to_string(),
            images: " https://cdn.example.kz/1.jpg , ,https://cdn.example.kz/2.jpg".to_string(),
            features: "Сад, Гараж,".to_string(),
            purpose: "   ".to_string(),
            ..AdminForm::default()
        }
    }

    #[test]
    fn blank_optionals_become_none() {
        let draft = filled().to_draft().expect("form converts");
        assert_eq!(draft.property_type, PropertyType::House);
        assert_eq!(draft.area, 140.5);
        assert_eq!(draft.rooms, 4);
        assert_eq!(draft.bathrooms, None);
        assert_eq!(draft.plot_size, None);
        assert_eq!(draft.purpose, None);
        assert_eq!(draft.tour_3d_url, None);
        assert_eq!(draft.status, ListingStatus::Available);
    }

    #[test]
    fn comma_lists_are_trimmed_and_compacted() {
        let draft = filled().to_draft().expect("form converts");
        assert_eq!(
            draft.images,
            vec!["https://cdn.example.kz/1.jpg", "https://cdn.example.kz/2.jpg"]
        );
        assert_eq!(draft.features, vec!["Сад", "Гараж"]);
    }

    #[test]
    fn non_numeric_price_names_the_field() {
        let form = AdminForm {
            price: "дорого".to_string(),
            ..filled()
        };
        assert_eq!(
            form.to_draft(),
            Err(FormError::InvalidNumber {
                field: "price",
                value: "дорого".to_string()
            })
        );
    }

    #[test]
    fn editing_prefills_from_property() {
        let mut property = sample_properties(1).remove(0);
        property.plot_size = Some(8.0);
        let form = AdminForm::from_property(&property);

        assert_eq!(form.images, property.images.join(", "));
        assert_eq!(form.plot_size, "8");

        let draft = form.to_draft().expect("round trip");
        assert_eq!(draft.images, property.images);
        assert_eq!(draft.price, property.price);
        assert_eq!(draft.plot_size, Some(8.0));
    }
}
