//! URL resolution for linked resources.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Only what stylesheet links need: absolute URLs pass through, everything
//! else is joined onto the document location. A location without a scheme is
//! a filesystem path and is joined the same way.

/// Whether `url` names a network resource.
#[must_use]
pub fn is_remote(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Length of `scheme:` at the start of `url`, if it has one.
///
/// [URL Standard § 4.4](https://url.spec.whatwg.org/#url-scheme-string)
/// "A URL-scheme string must be one ASCII alpha, followed by zero or more of
/// ASCII alphanumeric, U+002B (+), U+002D (-), and U+002E (.)"
fn scheme_len(url: &str) -> Option<usize> {
    let colon = url.find(':')?;
    let scheme = &url[..colon];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    // A single letter is a Windows drive, not a scheme.
    (valid && scheme.len() > 1).then_some(colon + 1)
}

/// Resolve `href` against the document location `base`.
///
/// [§ 2.4.2 Resolving URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// STEP 1: "If url is an absolute URL, return url."
/// STEP 2: Otherwise join it onto `base` and normalize `.` and `..`.
#[must_use]
pub fn resolve_url(href: &str, base: Option<&str>) -> String {
    let href = href.trim();

    // STEP 1: Absolute.
    if scheme_len(href).is_some() {
        return href.to_string();
    }
    let Some(base) = base else {
        return href.to_string();
    };

    // Split the base into `scheme://authority` and path.
    let has_authority = scheme_len(base).is_some_and(|len| base[len..].starts_with("//"));
    let (origin, base_path) = match scheme_len(base) {
        Some(len) if has_authority => {
            let rest = &base[len + 2..];
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            (&base[..len + 2 + end], &rest[end..])
        }
        Some(len) => (&base[..len], &base[len..]),
        None => ("", base),
    };

    // STEP 2: Join.
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = scheme_len(base).map_or("", |len| &base[..len]);
        return format!("{scheme}//{rest}");
    }
    if href.is_empty() || href.starts_with('#') {
        let document = base.find('#').map_or(base, |i| &base[..i]);
        return format!("{document}{href}");
    }
    if href.starts_with('?') {
        let document = base.find(['?', '#']).map_or(base, |i| &base[..i]);
        return format!("{document}{href}");
    }

    let (href_path, suffix) = href.find(['?', '#']).map_or((href, ""), |i| href.split_at(i));
    let joined = if href_path.starts_with('/') {
        href_path.to_string()
    } else {
        let base_path = base_path.find(['?', '#']).map_or(base_path, |i| &base_path[..i]);
        let root = if has_authority { "/" } else { "" };
        let directory = base_path.rfind('/').map_or(root, |i| &base_path[..=i]);
        format!("{directory}{href_path}")
    };
    format!("{origin}{}{suffix}", normalize_path(&joined))
}

/// [URL Standard § 4.4 path state](https://url.spec.whatwg.org/#path-state)
///
/// Drop `.` segments and let `..` remove the segment before it.
fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let last = parts.len() - 1;
    let mut out: Vec<&str> = Vec::with_capacity(parts.len());
    for (index, segment) in parts.iter().enumerate() {
        match *segment {
            "." => {}
            ".." => {
                let _ = out.pop();
            }
            other => out.push(other),
        }
        // A trailing dot segment leaves a directory.
        if index == last && matches!(*segment, "." | "..") {
            out.push("");
        }
    }
    let body = out.join("/");
    if absolute { format!("/{body}") } else { body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_pass_through() {
        assert_eq!(resolve_url("https://a.test/x.css", Some("http://b.test/")), "https://a.test/x.css");
        assert_eq!(resolve_url("data:text/css,p{}", None), "data:text/css,p{}");
    }

    #[test]
    fn test_relative_to_http_base() {
        let base = Some("https://example.com/docs/page.html?q=1");
        assert_eq!(resolve_url("style.css", base), "https://example.com/docs/style.css");
        assert_eq!(resolve_url("../style.css", base), "https://example.com/style.css");
        assert_eq!(resolve_url("./a/./b.css", base), "https://example.com/docs/a/b.css");
        assert_eq!(resolve_url("/root.css", base), "https://example.com/root.css");
        assert_eq!(resolve_url("//cdn.test/x.css", base), "https://cdn.test/x.css");
        assert_eq!(resolve_url("x.css?v=2#top", base), "https://example.com/docs/x.css?v=2#top");
    }

    #[test]
    fn test_base_without_path() {
        assert_eq!(resolve_url("a.css", Some("http://example.com")), "http://example.com/a.css");
    }

    #[test]
    fn test_relative_to_file_path() {
        assert_eq!(resolve_url("site.css", Some("/srv/www/index.html")), "/srv/www/site.css");
        assert_eq!(resolve_url("../site.css", Some("/srv/www/index.html")), "/srv/site.css");
        assert_eq!(resolve_url("site.css", Some("index.html")), "site.css");
    }

    #[test]
    fn test_no_base_keeps_href() {
        assert_eq!(resolve_url("a/b.css", None), "a/b.css");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("HTTPS://example.com"));
        assert!(!is_remote("/tmp/page.html"));
        assert!(!is_remote("file:///tmp/page.html"));
    }
}
