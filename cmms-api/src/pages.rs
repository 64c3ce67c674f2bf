//! Public marketing pages.
//!
//! Each page is a fixed Handlebars template with no data behind it. The
//! rendered template's name is echoed in the `X-Template` response header.

use rocket::{Route, http::Header};
use rocket_dyn_templates::Template;
use serde::Serialize;

/// The five public pages: `(template, path, menu label)`.
pub const PAGES: &[(&str, &str, &str)] = &[
    ("home", "/", "Home"),
    ("services", "/services/", "Services"),
    ("gallery", "/gallery/", "Gallery"),
    ("contact", "/contact/", "Contact"),
    ("login", "/login/", "Login"),
];

#[derive(Responder)]
pub struct PageResponse {
    template: Template,
    template_name: Header<'static>,
}

#[derive(Serialize)]
struct NavLink {
    href: &'static str,
    label: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct PageContext {
    page: &'static str,
    title: &'static str,
    nav: Vec<NavLink>,
    version: &'static str,
}

fn render(name: &'static str) -> PageResponse {
    let title = PAGES
        .iter()
        .find(|&&(template, _, _)| template == name)
        .map(|&(_, _, label)| label)
        .unwrap_or(name);

    let nav = PAGES
        .iter()
        .map(|&(template, href, label)| NavLink { href, label, active: template == name })
        .collect();

    PageResponse {
        template: Template::render(
            name,
            PageContext { page: name, title, nav, version: env!("CARGO_PKG_VERSION") },
        ),
        template_name: Header::new("X-Template", name),
    }
}

#[get("/")]
pub fn home() -> PageResponse {
    render("home")
}

#[get("/login")]
pub fn login() -> PageResponse {
    render("login")
}

#[get("/contact")]
pub fn contact() -> PageResponse {
    render("contact")
}

#[get("/services")]
pub fn services() -> PageResponse {
    render("services")
}

#[get("/gallery")]
pub fn gallery() -> PageResponse {
    render("gallery")
}

pub fn routes() -> Vec<Route> {
    routes![home, login, contact, services, gallery]
}
