use actix_web::http::header::{self, Accept, Header};
use actix_web::{mime, web, HttpRequest, HttpResponse};
use askama::Template;

use crate::errors::{AppError, AppResponse};
use crate::home::views;
use crate::host::{HostResolver, PageData, RenderDecision, RequestContext};
use crate::sites::SiteLookup;

/// True when `application/json` is the client's most preferred media type.
fn accepts_json(req: &HttpRequest) -> bool {
    Accept::parse(req).is_ok_and(|accept| {
        accept.preference().essence_str() == mime::APPLICATION_JSON.essence_str()
    })
}

fn render_json(page: &PageData) -> AppResponse {
    let view = views::ShowView::new(
        &page.domain,
        page.is_subdomain,
        page.current_site.as_ref(),
    );
    let body = serde_json::to_string(&view)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

fn render_html(page: &PageData) -> AppResponse {
    let body = if page.is_subdomain {
        let site = page.current_site.as_ref();
        views::SitePage::new(
            site.and_then(|s| s.name.as_deref()).unwrap_or_default(),
            site.and_then(|s| s.description.as_deref()).unwrap_or_default(),
            &page.domain,
        )
        .render()?
    } else {
        views::Landing::new("Welcome to MyDomain").render()?
    };
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

#[allow(clippy::future_not_send)]
pub async fn show<L: SiteLookup + 'static>(
    req: HttpRequest,
    sites: web::Data<L>,
    resolver: web::Data<HostResolver>,
) -> AppResponse {
    let ctx = RequestContext::from_request(&req);
    match resolver.route(sites.get_ref(), &ctx).await? {
        RenderDecision::Redirect { location } => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()),
        RenderDecision::NotFound => Err(AppError::NotFound),
        RenderDecision::Render(page) if accepts_json(&req) => render_json(&page),
        RenderDecision::Render(page) => render_html(&page),
    }
}

pub fn urls<L: SiteLookup + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("").default_service(web::to(show::<L>)));
}
