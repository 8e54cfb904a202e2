//! URL resolution utilities.
//!
//! [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
//! [URL Standard](https://url.spec.whatwg.org/)

use url::Url;

/// Errors from resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    /// The base or the joined URL failed to parse.
    #[error("invalid URL: {0}")]
    Parse(String),
    /// A relative `href` was given with no base to resolve against.
    #[error("cannot resolve relative URL '{0}' without a base")]
    MissingBase(String),
}

/// [§ 2.4 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// Resolve a potentially relative URL against a base URL.
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// # Errors
///
/// Returns [`UrlError::Parse`] when the base or the result is not a valid
/// URL, and [`UrlError::MissingBase`] when `href` is relative and no base
/// was supplied.
pub fn resolve_url(href: &str, base: Option<&str>) -> Result<String, UrlError> {
    let href = href.trim();

    // STEP 1: Absolute URLs stand on their own.
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.to_string());
    }

    // STEP 2: Join against the base.
    let Some(base) = base else {
        return Err(UrlError::MissingBase(href.to_string()));
    };
    let base = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
    let resolved = base.join(href).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_href_ignores_base() {
        let resolved = resolve_url("https://example.com/a", Some("https://other.org/"));
        assert_eq!(resolved, Ok("https://example.com/a".to_string()));
    }

    #[test]
    fn test_relative_href_joins_base() {
        let resolved = resolve_url("img/x.png", Some("https://example.com/dir/page.html"));
        assert_eq!(resolved, Ok("https://example.com/dir/img/x.png".to_string()));
    }

    #[test]
    fn test_relative_href_without_base_fails() {
        assert_eq!(
            resolve_url("/path", None),
            Err(UrlError::MissingBase("/path".to_string()))
        );
    }
}
