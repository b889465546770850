const FENCE: &str = "+++";

/// Splits a document into its `+++`-fenced TOML front matter and its body.
///
/// ```rust
/// use saltaire::markdown::split_front_matter;
///
/// let (front, body) = split_front_matter("+++\ntitle = \"Parking\"\n+++\n# Parking\n");
/// assert_eq!(front, Some("title = \"Parking\""));
/// assert_eq!(body, "# Parking\n");
///
/// assert_eq!(split_front_matter("# No front matter"), (None, "# No front matter"));
/// ```
pub fn split_front_matter(input: &str) -> (Option<&str>, &str) {
    let Some(rest) = input.strip_prefix(FENCE).and_then(strip_newline) else {
        return (None, input);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = rest[..offset].trim_end_matches(['\n', '\r']);
            return (Some(front), &rest[offset + line.len()..]);
        }

        offset += line.len();
    }

    (None, input)
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_front_matter_is_body() {
        let input = "+++\ntitle = \"x\"\n# Heading";
        assert_eq!(split_front_matter(input), (None, input));
    }

    #[test]
    fn closing_fence_at_end_of_file() {
        assert_eq!(split_front_matter("+++\na = 1\n+++"), (Some("a = 1"), ""));
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(split_front_matter("+++\r\na = 1\r\n+++\r\nbody"), (Some("a = 1"), "body"));
    }

    #[test]
    fn fence_must_start_the_document() {
        let input = "intro\n+++\na = 1\n+++\n";
        assert_eq!(split_front_matter(input), (None, input));
        assert_eq!(split_front_matter("++++\n"), (None, "++++\n"));
    }
}
