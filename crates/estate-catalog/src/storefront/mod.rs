//! The public site and admin area, expressed as page controllers that talk to
//! the listings API through [`CatalogBackend`] and return serializable views.

pub mod client;
pub mod form;
pub mod pages;
pub mod profile;
pub mod views;

pub use client::{CatalogBackend, ClientError, HttpCatalogBackend};
pub use form::{AdminForm, FormError};
pub use pages::{ActionOutcome, NoticeLevel, Notification, Page, Route, Storefront};
pub use profile::SiteProfile;
pub use views::{
    AdminPanelView, CatalogView, DetailView, FactView, HomePageView, ListingCard, NotFoundView,
    PropertyDetailView,
};
