use serde::Serialize;

use super::profile::SiteProfile;
use crate::listings::{format_measure, CatalogSections, ListingFilter, Property};

/// Compact listing tile used by the landing page, catalog, and admin table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCard {
    pub id: String,
    pub href: String,
    pub title: String,
    pub location: String,
    pub cover_image: String,
    pub price_label: String,
    pub property_type_label: &'static str,
    pub status_label: &'static str,
    pub details: Vec<String>,
}

impl ListingCard {
    pub fn from_property(property: &Property, profile: &SiteProfile) -> Self {
        let mut details = vec![
            format!("{} комн.", property.rooms),
            format!("{} м²", format_measure(property.area)),
        ];
        if profile.show_plot_size {
            if let Some(plot) = property.plot_size {
                details.push(format!("{} сот.", format_measure(plot)));
            }
        }
        if profile.show_purpose {
            if let Some(purpose) = property.purpose.as_deref().filter(|p| !p.trim().is_empty()) {
                details.push(purpose.to_string());
            }
        }

        Self {
            id: property.id.0.clone(),
            href: format!("/property/{}", property.id),
            title: property.title.clone(),
            location: property.location.clone(),
            cover_image: property
                .cover_image()
                .unwrap_or(&profile.placeholder_image)
                .to_string(),
            price_label: profile.price_label(property.price),
            property_type_label: property.property_type.label(),
            status_label: property.status.label(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePageView {
    pub brand_name: String,
    pub tagline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<ListingCard>,
    pub banner: Vec<ListingCard>,
    pub hot: Vec<ListingCard>,
}

impl HomePageView {
    pub fn from_sections(sections: &CatalogSections<'_>, profile: &SiteProfile) -> Self {
        let card = |property: &Property| ListingCard::from_property(property, profile);
        Self {
            brand_name: profile.brand_name.clone(),
            tagline: profile.tagline.clone(),
            featured: sections.featured.map(card),
            banner: sections.banner.iter().map(card).collect(),
            hot: sections.hot.iter().copied().map(card).collect(),
        }
    }

    pub fn empty(profile: &SiteProfile) -> Self {
        Self::from_sections(&crate::listings::segment(&[]), profile)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub filter: ListingFilter,
    pub total: usize,
    pub listings: Vec<ListingCard>,
}

impl CatalogView {
    pub fn from_matches(filter: ListingFilter, matches: &[&Property], profile: &SiteProfile) -> Self {
        Self {
            filter,
            total: matches.len(),
            listings: matches
                .iter()
                .map(|property| ListingCard::from_property(property, profile))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactView {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDetailView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_label: String,
    pub property_type_label: &'static str,
    pub status_label: &'static str,
    pub images: Vec<String>,
    pub facts: Vec<FactView>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_3d_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub krisha_url: Option<String>,
}

impl PropertyDetailView {
    pub fn from_property(property: &Property, profile: &SiteProfile) -> Self {
        let mut facts = vec![
            FactView {
                label: "Тип",
                value: property.property_type.label().to_string(),
            },
            FactView {
                label: "Площадь",
                value: format!("{} м²", format_measure(property.area)),
            },
            FactView {
                label: "Комнаты",
                value: property.rooms.to_string(),
            },
        ];
        if let Some(bathrooms) = property.bathrooms {
            facts.push(FactView {
                label: "Санузлы",
                value: bathrooms.to_string(),
            });
        }
        if profile.show_plot_size {
            if let Some(plot) = property.plot_size {
                facts.push(FactView {
                    label: "Участок",
                    value: format!("{} сот.", format_measure(plot)),
                });
            }
        }
        if profile.show_purpose {
            if let Some(purpose) = property.purpose.as_deref().filter(|p| !p.trim().is_empty()) {
                facts.push(FactView {
                    label: "Назначение",
                    value: purpose.to_string(),
                });
            }
        }

        let images = if property.images.is_empty() {
            vec![profile.placeholder_image.clone()]
        } else {
            property.images.clone()
        };

        Self {
            id: property.id.0.clone(),
            title: property.title.clone(),
            description: property.description.clone(),
            location: property.location.clone(),
            price_label: profile.price_label(property.price),
            property_type_label: property.property_type.label(),
            status_label: property.status.label(),
            images,
            facts,
            features: property.features.clone(),
            tour_3d_url: property.tour_3d_url.clone(),
            krisha_url: property.krisha_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFoundView {
    pub message: &'static str,
    pub back_label: &'static str,
    pub back_href: &'static str,
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self {
            message: "Объект не найден",
            back_label: "Вернуться на главную",
            back_href: "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    Found(PropertyDetailView),
    NotFound(NotFoundView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminPanelView {
    pub total: usize,
    pub rows: Vec<ListingCard>,
}
