use serde::Serialize;
use tracing::{error, info, warn};

use super::client::{CatalogBackend, ClientError};
use super::form::AdminForm;
use super::profile::SiteProfile;
use super::views::{
    AdminPanelView, CatalogView, DetailView, HomePageView, ListingCard, NotFoundView,
    PropertyDetailView,
};
use crate::admin::{AdminSession, LoginRequest, TokenStore};
use crate::listings::{segment, ListingFilter, PropertyId, PropertyPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    Property(PropertyId),
    AdminLogin,
    AdminPanel,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Property(id) => format!("/property/{id}"),
            Route::AdminLogin => "/admin-login".to_string(),
            Route::AdminPanel => "/admin".to_string(),
        }
    }
}

/// A rendered page plus whatever the visit produced on the side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<V> {
    pub view: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Route>,
}

impl<V> Page<V> {
    fn plain(view: V) -> Self {
        Self {
            view,
            notice: None,
            redirect: None,
        }
    }
}

/// Result of an admin action that renders no view of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub notice: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Route>,
}

const LOAD_FAILED: &str = "Ошибка при загрузке объектов";
const SAVE_FAILED: &str = "Ошибка при сохранении объекта";
const DELETE_FAILED: &str = "Ошибка при удалении объекта";
const SESSION_EXPIRED: &str = "Сессия истекла. Пожалуйста, войдите снова";

/// Page controllers of the public site and the admin area.
#[derive(Debug, Clone)]
pub struct Storefront<B> {
    backend: B,
    profile: SiteProfile,
}

impl<B: CatalogBackend> Storefront<B> {
    pub fn new(backend: B, profile: SiteProfile) -> Self {
        Self { backend, profile }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn home(&self) -> Page<HomePageView> {
        match self.backend.list_properties(&ListingFilter::default()).await {
            Ok(properties) => Page::plain(HomePageView::from_sections(
                &segment(&properties),
                &self.profile,
            )),
            Err(err) => {
                error!(error = %err, "failed to load listings for the home page");
                Page {
                    view: HomePageView::empty(&self.profile),
                    notice: Some(Notification::error(LOAD_FAILED)),
                    redirect: None,
                }
            }
        }
    }

    /// Fetches the full collection once and narrows it locally, so changing
    /// filters never needs another round trip.
    pub async fn catalog(&self, filter: ListingFilter) -> Page<CatalogView> {
        match self.backend.list_properties(&ListingFilter::default()).await {
            Ok(properties) => {
                let matches = filter.apply(&properties);
                Page::plain(CatalogView::from_matches(filter, &matches, &self.profile))
            }
            Err(err) => {
                error!(error = %err, "failed to load catalog");
                Page {
                    view: CatalogView::from_matches(filter, &[], &self.profile),
                    notice: Some(Notification::error(LOAD_FAILED)),
                    redirect: None,
                }
            }
        }
    }

    pub async fn property(&self, id: &PropertyId) -> Page<DetailView> {
        match self.backend.get_property(id).await {
            Ok(property) => Page::plain(DetailView::Found(PropertyDetailView::from_property(
                &property,
                &self.profile,
            ))),
            Err(ClientError::NotFound) => Page::plain(DetailView::NotFound(NotFoundView::default())),
            Err(err) => {
                error!(error = %err, property_id = %id, "failed to load listing");
                Page {
                    view: DetailView::NotFound(NotFoundView::default()),
                    notice: Some(Notification::error("Ошибка при загрузке объекта")),
                    redirect: None,
                }
            }
        }
    }

    pub async fn login<S: TokenStore>(
        &self,
        session: &mut AdminSession<S>,
        credentials: &LoginRequest,
    ) -> ActionOutcome {
        let token = match self.backend.login(credentials).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "admin login failed");
                return ActionOutcome {
                    notice: Notification::error("Неверный логин или пароль"),
                    redirect: None,
                };
            }
        };

        if let Err(err) = session.sign_in(token.access_token) {
            error!(error = %err, "could not persist admin token");
            return ActionOutcome {
                notice: Notification::error("Не удалось сохранить сессию"),
                redirect: None,
            };
        }

        info!("admin signed in");
        ActionOutcome {
            notice: Notification::success("Успешный вход!"),
            redirect: Some(Route::AdminPanel),
        }
    }

    pub fn logout<S: TokenStore>(&self, session: &mut AdminSession<S>) -> ActionOutcome {
        session.sign_out();
        ActionOutcome {
            notice: Notification::success("Вы вышли из системы"),
            redirect: Some(Route::Home),
        }
    }

    pub async fn admin_panel<S: TokenStore>(
        &self,
        session: &AdminSession<S>,
    ) -> Page<AdminPanelView> {
        let empty = AdminPanelView {
            total: 0,
            rows: Vec::new(),
        };
        if !session.is_authenticated() {
            return Page {
                view: empty,
                notice: None,
                redirect: Some(Route::AdminLogin),
            };
        }

        match self.backend.list_properties(&ListingFilter::default()).await {
            Ok(properties) => Page::plain(AdminPanelView {
                total: properties.len(),
                rows: properties
                    .iter()
                    .map(|property| ListingCard::from_property(property, &self.profile))
                    .collect(),
            }),
            Err(err) => {
                error!(error = %err, "failed to load admin listings");
                Page {
                    view: empty,
                    notice: Some(Notification::error(LOAD_FAILED)),
                    redirect: None,
                }
            }
        }
    }

    /// Loads a listing into the edit form.
    pub async fn edit_form(&self, id: &PropertyId) -> Result<AdminForm, ClientError> {
        let property = self.backend.get_property(id).await?;
        Ok(AdminForm::from_property(&property))
    }

    /// Creates a listing, or updates `editing` when set.
    pub async fn save_listing<S: TokenStore>(
        &self,
        session: &mut AdminSession<S>,
        editing: Option<&PropertyId>,
        form: &AdminForm,
    ) -> ActionOutcome {
        let Some(token) = session.bearer().map(str::to_string) else {
            return expired(session);
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                warn!(error = %err, "admin form rejected");
                return failure(SAVE_FAILED);
            }
        };

        let result = match editing {
            Some(id) => self
                .backend
                .update_property(&token, id, &PropertyPatch::from(draft))
                .await
                .map(|_| "Объект успешно обновлен"),
            None => self
                .backend
                .create_property(&token, &draft)
                .await
                .map(|_| "Объект успешно создан"),
        };

        match result {
            Ok(message) => ActionOutcome {
                notice: Notification::success(message),
                redirect: None,
            },
            Err(ClientError::Unauthorized) => expired(session),
            Err(err) => {
                error!(error = %err, "failed to save listing");
                failure(SAVE_FAILED)
            }
        }
    }

    pub async fn delete_listing<S: TokenStore>(
        &self,
        session: &mut AdminSession<S>,
        id: &PropertyId,
    ) -> ActionOutcome {
        let Some(token) = session.bearer().map(str::to_string) else {
            return expired(session);
        };

        match self.backend.delete_property(&token, id).await {
            Ok(()) => ActionOutcome {
                notice: Notification::success("Объект успешно удален"),
                redirect: None,
            },
            Err(ClientError::Unauthorized) => expired(session),
            Err(err) => {
                error!(error = %err, property_id = %id, "failed to delete listing");
                failure(DELETE_FAILED)
            }
        }
    }
}

fn expired<S: TokenStore>(session: &mut AdminSession<S>) -> ActionOutcome {
    warn!("admin token rejected, clearing session");
    session.expire();
    ActionOutcome {
        notice: Notification::error(SESSION_EXPIRED),
        redirect: Some(Route::AdminLogin),
    }
}

fn failure(message: &str) -> ActionOutcome {
    ActionOutcome {
        notice: Notification::error(message),
        redirect: None,
    }
}
