use serde::Serialize;

use crate::config::SitePreset;
use crate::listings::Currency;

/// Everything that differs between the storefront's page variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteProfile {
    pub brand_name: String,
    pub tagline: String,
    pub currency: Currency,
    pub show_plot_size: bool,
    pub show_purpose: bool,
    /// Shown for legacy listings that arrive without any image.
    pub placeholder_image: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub whatsapp_url: Option<String>,
    pub instagram_url: Option<String>,
}

impl SiteProfile {
    pub fn dars_capital() -> Self {
        Self {
            brand_name: "DARS CAPITAL".to_string(),
            tagline: "Эксклюзивные предложения премиальной недвижимости".to_string(),
            currency: Currency::Tenge,
            show_plot_size: true,
            show_purpose: true,
            placeholder_image: "/static/placeholder-property.jpg".to_string(),
            contact_phone: "+7 707 715 72 49".to_string(),
            contact_email: "Darsinnovator@gmail.com".to_string(),
            whatsapp_url: Some("https://wa.me/77077157249".to_string()),
            instagram_url: Some("https://www.instagram.com/d.darsil".to_string()),
        }
    }

    pub fn classic() -> Self {
        Self {
            brand_name: "DARS CAPITAL".to_string(),
            tagline: "Premium Real Estate".to_string(),
            currency: Currency::Ruble,
            show_plot_size: false,
            show_purpose: false,
            placeholder_image: "/static/placeholder-property.jpg".to_string(),
            contact_phone: "+7 707 715 72 49".to_string(),
            contact_email: "darscapital@gmail.com".to_string(),
            whatsapp_url: None,
            instagram_url: None,
        }
    }

    pub fn from_preset(preset: SitePreset) -> Self {
        match preset {
            SitePreset::DarsCapital => Self::dars_capital(),
            SitePreset::Classic => Self::classic(),
        }
    }

    pub fn price_label(&self, price: f64) -> String {
        self.currency.format(price)
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::dars_capital()
    }
}
