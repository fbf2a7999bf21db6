//! Reverse resolution of the catalogue's named URLs.
//!
//! Only the routes the catalogue links to are known here; routing requests
//! is left to whatever web layer serves them.
use lazy_static::lazy_static;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlPattern {
    pub name: &'static str,
    /// Route relative to the namespace prefix, with `<param>` segments.
    pub route: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlConf {
    pub namespace: &'static str,
    pub prefix: &'static str,
    pub patterns: Vec<UrlPattern>,
}

lazy_static! {
    pub static ref CATALOGUE_URLS: UrlConf = UrlConf {
        namespace: "catalogue",
        prefix: "/catalogue/",
        patterns: vec![
            UrlPattern {
                name: "products",
                route: "products/<pk>/",
            },
            UrlPattern {
                name: "product-characteristics-view",
                route: "product-characteristics/<pk>/",
            },
            UrlPattern {
                name: "characteristic-edit",
                route: "characteristics/<pk>/edit/",
            },
        ],
    };
}

impl UrlConf {
    /// URL of the pattern named `namespace:name`, with `<param>` segments
    /// replaced from `kwargs`.
    pub fn reverse(&self, viewname: &str, kwargs: &[(&str, &str)]) -> Result<String> {
        let pattern = viewname
            .split_once(':')
            .filter(|(namespace, _)| *namespace == self.namespace)
            .and_then(|(_, name)| self.patterns.iter().find(|p| p.name == name))
            .ok_or_else(|| Error::NoReverseMatch(viewname.to_string()))?;

        let mut url = String::from(self.prefix);
        let mut rest = pattern.route;
        while let Some(start) = rest.find('<') {
            let end = rest[start..]
                .find('>')
                .map(|offset| start + offset)
                .ok_or_else(|| Error::NoReverseMatch(viewname.to_string()))?;
            let param = &rest[start + 1..end];
            let value = kwargs
                .iter()
                .find(|(key, _)| *key == param)
                .map(|(_, value)| *value)
                .filter(|value| !value.is_empty() && !value.contains('/'))
                .ok_or_else(|| {
                    Error::NoReverseMatch(format!("{viewname} with missing argument '{param}'"))
                })?;
            url.push_str(&rest[..start]);
            url.push_str(value);
            rest = &rest[end + 1..];
        }
        url.push_str(rest);
        Ok(url)
    }
}

/// `reverse` against the catalogue URL table.
pub fn reverse(viewname: &str, kwargs: &[(&str, &str)]) -> Result<String> {
    CATALOGUE_URLS.reverse(viewname, kwargs)
}

/// Canonical URL of a stored row.
pub trait AbsoluteUrl {
    fn get_absolute_url(&self) -> Result<String>;
}

/// Reverses a `<pk>` route for a row that may not be saved yet.
pub(crate) fn reverse_pk(viewname: &str, pk: Option<i32>) -> Result<String> {
    let pk = pk.ok_or_else(|| Error::NoReverseMatch(format!("{viewname} for an unsaved row")))?;
    reverse(viewname, &[("pk", &pk.to_string())])
}
