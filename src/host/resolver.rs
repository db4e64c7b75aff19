use tracing::debug;

use super::RequestContext;
use crate::errors::AppError;
use crate::settings;
use crate::sites::{Site, SiteLookup};

const LOCALHOST_PREFIX: &str = "localhost:";

/// Payload handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    pub domain: String,
    pub is_subdomain: bool,
    pub current_site: Option<Site>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDecision {
    /// 302 to a protocol-relative location.
    Redirect { location: String },
    NotFound,
    Render(PageData),
}

/// Maps request hosts onto the primary domain or a tenant subdomain.
#[derive(Debug, Clone)]
pub struct HostResolver {
    domain: String,
    local_alias: String,
}

impl HostResolver {
    pub fn new(domain: impl Into<String>, local_alias: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            local_alias: local_alias.into(),
        }
    }

    pub fn from_settings(site: &settings::Site) -> Self {
        Self::new(site.domain.clone(), site.local_alias.clone())
    }

    /// Canonical host: the primary domain, the local alias, or a bare subdomain label.
    pub fn normalize(&self, raw_host: Option<&str>) -> Result<String, AppError> {
        let host = raw_host
            .filter(|host| !host.is_empty())
            .ok_or(AppError::MissingHost)?;

        let host = replace_localhost_port(host, &self.domain);
        let suffix = format!(".{}", self.domain);

        Ok(match host.strip_suffix(&suffix) {
            Some(subdomain) => subdomain.to_owned(),
            None => host,
        })
    }

    pub fn is_subdomain(&self, host: &str) -> bool {
        ![self.local_alias.as_str(), self.domain.as_str()].contains(&host)
    }

    pub async fn resolve_site<L>(
        &self,
        lookup: &L,
        host: &str,
        is_subdomain: bool,
    ) -> Result<Option<Site>, AppError>
    where
        L: SiteLookup + ?Sized,
    {
        if !is_subdomain {
            return Ok(None);
        }
        lookup.find_by_slug(host).await
    }

    pub async fn route<L>(
        &self,
        lookup: &L,
        ctx: &RequestContext,
    ) -> Result<RenderDecision, AppError>
    where
        L: SiteLookup + ?Sized,
    {
        let host = self.normalize(ctx.host.as_deref())?;
        let is_subdomain = self.is_subdomain(&host);
        debug!("route: host {host:?} subdomain {is_subdomain} path {:?}", ctx.path);

        if is_subdomain && ctx.path != "/" {
            return Ok(RenderDecision::Redirect {
                location: format!("//{host}"),
            });
        }

        let current_site = self.resolve_site(lookup, &host, is_subdomain).await?;
        if is_subdomain && current_site.is_none() {
            return Ok(RenderDecision::NotFound);
        }

        Ok(RenderDecision::Render(PageData {
            domain: self.domain.clone(),
            is_subdomain,
            current_site,
        }))
    }
}

/// Replaces the leftmost `localhost:<digits>` token with `domain`.
fn replace_localhost_port(host: &str, domain: &str) -> String {
    for (start, _) in host.match_indices(LOCALHOST_PREFIX) {
        let port_start = start + LOCALHOST_PREFIX.len();
        let port_len = host[port_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if port_len > 0 {
            let end = port_start + port_len;
            return format!("{}{domain}{}", &host[..start], &host[end..]);
        }
    }
    host.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::models::fake::FakeSites;

    fn resolver() -> HostResolver {
        HostResolver::new("mydomain.io", "localhost:3000")
    }

    #[test]
    fn test_replace_localhost_port() {
        assert_eq!(replace_localhost_port("localhost:3000", "mydomain.io"), "mydomain.io");
        assert_eq!(
            replace_localhost_port("acme.localhost:8080", "mydomain.io"),
            "acme.mydomain.io"
        );
        assert_eq!(
            replace_localhost_port("localhost:3000/path?q=localhost:1", "mydomain.io"),
            "mydomain.io/path?q=localhost:1"
        );
        assert_eq!(replace_localhost_port("localhost", "mydomain.io"), "localhost");
        assert_eq!(replace_localhost_port("localhost:abc", "mydomain.io"), "localhost:abc");
        assert_eq!(
            replace_localhost_port("localhost:x localhost:42", "mydomain.io"),
            "localhost:x mydomain.io"
        );
    }

    #[test]
    fn test_normalize() {
        let r = resolver();
        assert_eq!(r.normalize(Some("localhost:3000")).unwrap(), "mydomain.io");
        assert_eq!(r.normalize(Some("acme.mydomain.io")).unwrap(), "acme");
        assert_eq!(r.normalize(Some("acme.localhost:5173")).unwrap(), "acme");
        assert_eq!(r.normalize(Some("mydomain.io")).unwrap(), "mydomain.io");
        assert_eq!(r.normalize(Some("other.example.com")).unwrap(), "other.example.com");
        assert_eq!(r.normalize(Some("notmydomain.io")).unwrap(), "notmydomain.io");
    }

    #[test]
    fn test_normalize_missing_host() {
        assert!(matches!(resolver().normalize(None), Err(AppError::MissingHost)));
        assert!(matches!(resolver().normalize(Some("")), Err(AppError::MissingHost)));
    }

    #[test]
    fn test_is_subdomain() {
        let r = resolver();
        assert!(!r.is_subdomain("mydomain.io"));
        assert!(!r.is_subdomain("localhost:3000"));
        assert!(r.is_subdomain("acme"));
        assert!(r.is_subdomain("localhost"));
        assert!(r.is_subdomain("other.example.com"));
    }

    #[actix_web::test]
    async fn resolve_site_skips_lookup_for_primary_domain() {
        let sites = FakeSites::default().with_site("mydomain.io", "Root", "");
        let site = resolver()
            .resolve_site(&sites, "mydomain.io", false)
            .await
            .unwrap();
        assert_eq!(site, None);
        assert_eq!(sites.queries(), 0);
    }

    #[actix_web::test]
    async fn landing_page_on_localhost() {
        let sites = FakeSites::default();
        let decision = resolver()
            .route(&sites, &RequestContext::new(Some("localhost:3000"), "/"))
            .await
            .unwrap();
        assert_eq!(
            decision,
            RenderDecision::Render(PageData {
                domain: "mydomain.io".to_owned(),
                is_subdomain: false,
                current_site: None,
            })
        );
        assert_eq!(sites.queries(), 0);
    }

    #[actix_web::test]
    async fn subdomain_renders_site() {
        let sites = FakeSites::default().with_site("acme", "Acme", "Anvils and more");
        let decision = resolver()
            .route(&sites, &RequestContext::new(Some("acme.mydomain.io"), "/"))
            .await
            .unwrap();
        assert_eq!(
            decision,
            RenderDecision::Render(PageData {
                domain: "mydomain.io".to_owned(),
                is_subdomain: true,
                current_site: sites.get("acme").cloned(),
            })
        );
    }

    #[actix_web::test]
    async fn unknown_subdomain_is_not_found() {
        let sites = FakeSites::default();
        let decision = resolver()
            .route(&sites, &RequestContext::new(Some("acme.mydomain.io"), "/"))
            .await
            .unwrap();
        assert_eq!(decision, RenderDecision::NotFound);
        assert_eq!(sites.queries(), 1);
    }

    #[actix_web::test]
    async fn subdomain_subpath_redirects_to_root() {
        for sites in [FakeSites::default(), FakeSites::default().with_site("acme", "Acme", "")] {
            let decision = resolver()
                .route(&sites, &RequestContext::new(Some("acme.mydomain.io"), "/about"))
                .await
                .unwrap();
            assert_eq!(
                decision,
                RenderDecision::Redirect {
                    location: "//acme".to_owned()
                }
            );
            assert_eq!(sites.queries(), 0);
        }
    }

    #[actix_web::test]
    async fn primary_domain_subpath_renders_landing() {
        let decision = resolver()
            .route(&FakeSites::default(), &RequestContext::new(Some("mydomain.io"), "/pricing"))
            .await
            .unwrap();
        assert!(matches!(
            decision,
            RenderDecision::Render(PageData { is_subdomain: false, .. })
        ));
    }

    #[actix_web::test]
    async fn missing_host_fails() {
        let result = resolver()
            .route(&FakeSites::default(), &RequestContext::new(None, "/"))
            .await;
        assert!(matches!(result, Err(AppError::MissingHost)));
    }
}
