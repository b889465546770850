mod macros;

pub use macros::*;

/// Convert spaces to hyphens. Remove characters that aren't alphanumerics,
/// underscores, or hyphens. Convert to lowercase. Also strip leading and
/// trailing whitespace.
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        for b in deunicode::deunicode_char(ch).unwrap_or("-").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                _ => need_dash = !output.is_empty(),
            }
        }
    }

    output
}

/// Returns `true` if `slug` is already in the form [`slugify()`] produces.
///
/// ```rust
/// use saltaire::util::is_slug;
///
/// assert!(is_slug("bright-spark-electrical"));
/// assert!(!is_slug("Bright Spark"));
/// assert!(!is_slug(""));
/// ```
pub fn is_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// Returns `true` if `input` is likely to contain a template.
pub fn is_template(input: &str) -> bool {
    let mut slice = input.as_bytes();
    while let Some(i) = memchr::memchr(b'{', slice) {
        match slice.get(i + 1) {
            Some(b'{') | Some(b'%') => return true,
            Some(_) => slice = &slice[(i + 1)..],
            None => return false,
        }
    }

    false
}

/// Joins `base` and `path` with exactly one `/` between them.
///
/// ```rust
/// use saltaire::util::join_url;
///
/// assert_eq!(join_url("https://saltaire.guide/", "/vets/"), "https://saltaire.guide/vets/");
/// assert_eq!(join_url("https://saltaire.guide", "vets/"), "https://saltaire.guide/vets/");
/// assert_eq!(join_url("https://saltaire.guide", ""), "https://saltaire.guide/");
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod slug_tests {
    #[test]
    fn test_slugify() {
        use crate::util::slugify;

        assert_eq!(slugify("My Test String!!!1!1"), "my-test-string-1-1");
        assert_eq!(slugify("test\nit   now!"), "test-it-now");
        assert_eq!(slugify("  --test_-_cool- -  "), "test_-_cool");
        assert_eq!(slugify("Æúű--cool?"), "aeuu-cool");
        assert_eq!(slugify("Shipley & Saltaire Locks"), "shipley-saltaire-locks");
        assert_eq!(slugify("  hello@-- salts mill.co.uk  "), "hello-salts-mill-co-uk");
    }

    #[test]
    fn test_is_template() {
        use crate::util::is_template;

        assert!(is_template("Call {{ G.email }} today"));
        assert!(is_template("{% if true %}x{% endif %}"));
        assert!(!is_template("a { b } c {"));
        assert!(!is_template("plain text"));
    }
}
