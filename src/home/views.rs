use askama::Template;
use derive_more::Constructor;
use serde::Serialize;

use crate::sites::Site;

#[derive(Template, Constructor)]
#[template(path = "landing.html")]
pub struct Landing<'a> {
    pub title: &'a str,
}

#[derive(Template, Constructor)]
#[template(path = "site.html")]
pub struct SitePage<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub domain: &'a str,
}

#[derive(Serialize, Constructor)]
#[serde(rename_all = "camelCase")]
pub struct ShowView<'a> {
    pub domain: &'a str,
    pub is_subdomain: bool,
    pub current_site: Option<&'a Site>,
}
