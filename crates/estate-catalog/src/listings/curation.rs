//! Landing-page curation: splits a fetched listing collection into the
//! featured, banner, and hot-deal sections.
//!
//! Every section borrows from the input slice; nothing is copied or reordered.

use super::domain::Property;

const BANNER_END: usize = 5;
const HOT_DEALS: usize = 3;

/// How the hot-deal row is filled when fewer than six listings exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotDealFill {
    /// Always show three cards, cycling through listings after the featured one.
    #[default]
    Cyclic,
    /// Show each listing after the featured one at most once.
    Distinct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSections<'a> {
    pub featured: Option<&'a Property>,
    pub banner: &'a [Property],
    pub hot: Vec<&'a Property>,
}

impl<'a> CatalogSections<'a> {
    pub fn is_empty(&self) -> bool {
        self.featured.is_none() && self.banner.is_empty() && self.hot.is_empty()
    }
}

pub fn segment(properties: &[Property]) -> CatalogSections<'_> {
    segment_with(properties, HotDealFill::default())
}

pub fn segment_with(properties: &[Property], fill: HotDealFill) -> CatalogSections<'_> {
    let len = properties.len();
    let featured = properties.first();
    let banner = if len >= 2 {
        &properties[1..len.min(BANNER_END)]
    } else {
        &properties[..0]
    };

    let hot = if len > BANNER_END {
        properties[BANNER_END..len.min(BANNER_END + HOT_DEALS)]
            .iter()
            .collect()
    } else if len >= 2 {
        let pool = &properties[1..];
        let wanted = match fill {
            HotDealFill::Cyclic => HOT_DEALS,
            HotDealFill::Distinct => HOT_DEALS.min(pool.len()),
        };
        (0..wanted).map(|index| &pool[index % pool.len()]).collect()
    } else {
        Vec::new()
    };

    CatalogSections {
        featured,
        banner,
        hot,
    }
}
