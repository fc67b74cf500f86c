use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Look up a cookie that the jar would send to `url`, percent-decoded.
pub fn lookup_cookie(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    let header = jar.cookies(url)?;
    let header = header.to_str().ok()?;
    find_cookie(header, name)
}

/// Find `name` in a `Cookie:` header value (`a=1; b=2`).
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cookie_among_others() {
        let header = "sessionid=abc; csrftoken=tok%3D123; theme=dark";
        assert_eq!(find_cookie(header, "csrftoken").as_deref(), Some("tok=123"));
        assert_eq!(find_cookie(header, "theme").as_deref(), Some("dark"));
        assert_eq!(find_cookie(header, "missing"), None);
    }

    #[test]
    fn name_must_match_exactly() {
        assert_eq!(find_cookie("xcsrftoken=nope", "csrftoken"), None);
    }

    #[test]
    fn looks_up_cookie_from_jar() {
        let url = Url::parse("http://localhost:8000/api/track-referral/").unwrap();
        let jar = Jar::default();
        jar.add_cookie_str("csrftoken=secret; Path=/", &url);

        assert_eq!(lookup_cookie(&jar, &url, "csrftoken").as_deref(), Some("secret"));
        assert_eq!(lookup_cookie(&Jar::default(), &url, "csrftoken"), None);
    }
}
