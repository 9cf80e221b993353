use crate::infra::{parse_property_type, parse_status};
use clap::Args;
use estate_catalog::admin::{AdminSession, FileTokenStore, LoginRequest};
use estate_catalog::config::AppConfig;
use estate_catalog::error::AppError;
use estate_catalog::listings::{
    ListingFilter, ListingImporter, ListingStatus, PropertyId, PropertyType,
};
use estate_catalog::storefront::{
    ActionOutcome, AdminPanelView, CatalogBackend, CatalogView, ClientError, DetailView,
    HomePageView, HttpCatalogBackend, ListingCard, NoticeLevel, Notification, Page, SiteProfile,
    Storefront,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Property type: apartment, house, villa, or penthouse
    #[arg(long = "type", value_parser = parse_property_type)]
    pub(crate) property_type: Option<PropertyType>,
    /// Lowest acceptable price
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    /// Highest acceptable price
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    /// Case-insensitive substring of the location
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Listing status: available or sold
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ListingStatus>,
}

impl SearchArgs {
    fn into_filter(self) -> ListingFilter {
        ListingFilter {
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
            location: self.location.filter(|value| !value.trim().is_empty()),
            status: self.status,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file with one listing per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

struct Console {
    site: Storefront<HttpCatalogBackend>,
    token_path: PathBuf,
}

impl Console {
    fn connect() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        let backend = HttpCatalogBackend::new(config.backend.base_url.clone());
        Ok(Self {
            site: Storefront::new(backend, SiteProfile::from_preset(config.site)),
            token_path: config.backend.token_path,
        })
    }

    fn session(&self) -> AdminSession<FileTokenStore> {
        AdminSession::restore(FileTokenStore::new(&self.token_path))
    }
}

pub(crate) async fn run_home() -> Result<(), AppError> {
    let console = Console::connect()?;
    let page = console.site.home().await;
    print!("{}", render_home(&page));
    Ok(())
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let console = Console::connect()?;
    let page = console.site.catalog(args.into_filter()).await;
    print!("{}", render_catalog(&page));
    Ok(())
}

pub(crate) async fn run_show(id: String) -> Result<(), AppError> {
    let console = Console::connect()?;
    let page = console.site.property(&PropertyId(id)).await;
    print!("{}", render_detail(&page));
    Ok(())
}

pub(crate) async fn run_login(args: LoginArgs) -> Result<(), AppError> {
    let console = Console::connect()?;
    let mut session = console.session();
    let credentials = LoginRequest {
        username: args.username,
        password: args.password,
    };
    let outcome = console.site.login(&mut session, &credentials).await;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

pub(crate) async fn run_logout() -> Result<(), AppError> {
    let console = Console::connect()?;
    let mut session = console.session();
    let outcome = console.site.logout(&mut session);
    print!("{}", render_outcome(&outcome));
    Ok(())
}

pub(crate) async fn run_admin_list() -> Result<(), AppError> {
    let console = Console::connect()?;
    let session = console.session();
    let page = console.site.admin_panel(&session).await;
    print!("{}", render_admin_panel(&page));
    Ok(())
}

pub(crate) async fn run_delete(id: String) -> Result<(), AppError> {
    let console = Console::connect()?;
    let mut session = console.session();
    let outcome = console
        .site
        .delete_listing(&mut session, &PropertyId(id))
        .await;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

/// Pushes every row of a listing CSV through the admin API.
pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let console = Console::connect()?;
    let mut session = console.session();
    let drafts = ListingImporter::from_path(&args.csv)?;

    let Some(token) = session.bearer().map(str::to_string) else {
        println!("Требуется вход: выполните `admin login`");
        return Err(ClientError::Unauthorized.into());
    };

    let mut created = 0;
    for draft in &drafts {
        match console.site.backend().create_property(&token, draft).await {
            Ok(property) => {
                created += 1;
                println!("+ {} ({})", property.title, property.id);
            }
            Err(ClientError::Unauthorized) => {
                session.expire();
                println!("Сессия истекла. Пожалуйста, войдите снова");
                return Err(ClientError::Unauthorized.into());
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("Импортировано объектов: {created} из {}", drafts.len());
    Ok(())
}

fn card_line(card: &ListingCard) -> String {
    let mut line = format!("{} | {} | {}", card.title, card.price_label, card.location);
    if !card.details.is_empty() {
        let _ = write!(line, " | {}", card.details.join(", "));
    }
    let _ = write!(line, " | {} | {}", card.status_label, card.href);
    line
}

fn notice_line(notice: &Notification) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{marker}] {}\n", notice.message)
}

fn page_footer<V>(out: &mut String, page: &Page<V>) {
    if let Some(notice) = &page.notice {
        out.push_str(&notice_line(notice));
    }
    if let Some(route) = &page.redirect {
        let _ = writeln!(out, "-> {}", route.path());
    }
}

pub(crate) fn render_home(page: &Page<HomePageView>) -> String {
    let view = &page.view;
    let mut out = format!("{}\n{}\n", view.brand_name, view.tagline);

    if let Some(featured) = &view.featured {
        let _ = writeln!(out, "\nГлавное предложение\n  {}", card_line(featured));
    }
    if !view.banner.is_empty() {
        out.push_str("\nЭксклюзивные объекты\n");
        for card in &view.banner {
            let _ = writeln!(out, "  {}", card_line(card));
        }
    }
    if !view.hot.is_empty() {
        out.push_str("\nГорячие предложения\n");
        for card in &view.hot {
            let _ = writeln!(out, "  {}", card_line(card));
        }
    }
    if view.featured.is_none() {
        out.push_str("\nОбъекты не найдены\n");
    }

    page_footer(&mut out, page);
    out
}

pub(crate) fn render_catalog(page: &Page<CatalogView>) -> String {
    let mut out = format!("Найдено объектов: {}\n", page.view.total);
    for card in &page.view.listings {
        let _ = writeln!(out, "  {}", card_line(card));
    }
    page_footer(&mut out, page);
    out
}

pub(crate) fn render_detail(page: &Page<DetailView>) -> String {
    let mut out = String::new();
    match &page.view {
        DetailView::Found(detail) => {
            let _ = writeln!(out, "{}", detail.title);
            let _ = writeln!(
                out,
                "{} | {} | {}",
                detail.price_label, detail.property_type_label, detail.status_label
            );
            let _ = writeln!(out, "{}", detail.location);
            for fact in &detail.facts {
                let _ = writeln!(out, "  {}: {}", fact.label, fact.value);
            }
            if !detail.description.is_empty() {
                let _ = writeln!(out, "\n{}", detail.description);
            }
            if !detail.features.is_empty() {
                let _ = writeln!(out, "\nОсобенности: {}", detail.features.join(", "));
            }
            let _ = writeln!(out, "\nФото:");
            for image in &detail.images {
                let _ = writeln!(out, "  {image}");
            }
            if let Some(url) = &detail.tour_3d_url {
                let _ = writeln!(out, "3D тур: {url}");
            }
            if let Some(url) = &detail.krisha_url {
                let _ = writeln!(out, "Krisha.kz: {url}");
            }
        }
        DetailView::NotFound(missing) => {
            let _ = writeln!(
                out,
                "{}\n{}: {}",
                missing.message, missing.back_label, missing.back_href
            );
        }
    }
    page_footer(&mut out, page);
    out
}

pub(crate) fn render_admin_panel(page: &Page<AdminPanelView>) -> String {
    let mut out = String::new();
    if page.redirect.is_none() {
        let _ = writeln!(out, "Всего объектов: {}", page.view.total);
        for card in &page.view.rows {
            let _ = writeln!(out, "  {} | {}", card.id, card_line(card));
        }
    }
    page_footer(&mut out, page);
    out
}

pub(crate) fn render_outcome(outcome: &ActionOutcome) -> String {
    let mut out = notice_line(&outcome.notice);
    if let Some(route) = &outcome.redirect {
        let _ = writeln!(out, "-> {}", route.path());
    }
    out
}
