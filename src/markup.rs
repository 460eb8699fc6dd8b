//! Just enough HTML scanning to pull attributes out of start tags.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

static IGNORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>").unwrap()
});

static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
});

static CHAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|amp|lt|gt|quot|apos);").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    attributes: Vec<(String, String)>,
}

impl Tag {
    /// Value of the first attribute called `name`, ignoring case
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Every start tag in `html`, in document order. Comments and script bodies are skipped.
pub fn start_tags(html: &str) -> Vec<Tag> {
    let html = IGNORED.replace_all(html, "");
    START_TAG
        .captures_iter(&html)
        .map(|captures| Tag {
            name: captures[1].to_ascii_lowercase(),
            attributes: parse_attributes(&captures[2]),
        })
        .collect()
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(source)
        .map(|captures| {
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .or_else(|| captures.get(4))
                .map_or("", |m| m.as_str());
            (
                captures[1].to_ascii_lowercase(),
                decode_char_refs(value).into_owned(),
            )
        })
        .collect()
}

pub fn decode_char_refs(text: &str) -> Cow<'_, str> {
    CHAR_REF.replace_all(text, |captures: &Captures| {
        let reference = &captures[1];
        let decoded = match reference {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                let number = &reference[1..];
                let code = match number.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => number.parse().ok(),
                };
                code.and_then(char::from_u32)
            }
        };
        decoded.map_or_else(|| captures[0].to_string(), String::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_in_any_order_and_quoting() {
        let tags = start_tags(
            r#"<META content='/a.jpg' PROPERTY="og:image"><div class=hero-background style="x">"#,
        );

        assert_eq!(2, tags.len());
        assert_eq!("meta", tags[0].name);
        assert_eq!(Some("og:image"), tags[0].attr("property"));
        assert_eq!(Some("/a.jpg"), tags[0].attr("Content"));
        assert_eq!("div", tags[1].name);
        assert_eq!(Some("hero-background"), tags[1].attr("class"));
        assert_eq!(None, tags[1].attr("id"));
    }

    #[test]
    fn quoted_values_may_contain_angle_brackets() {
        let tags = start_tags(r#"<div data-x="a > b" class="c"></div>"#);
        assert_eq!(1, tags.len());
        assert_eq!(Some("a > b"), tags[0].attr("data-x"));
        assert_eq!(Some("c"), tags[0].attr("class"));
    }

    #[test]
    fn boolean_attributes_have_empty_values() {
        let tags = start_tags("<input disabled name=q>");
        assert_eq!(Some(""), tags[0].attr("disabled"));
        assert_eq!(Some("q"), tags[0].attr("name"));
    }

    #[test]
    fn scripts_and_comments_are_skipped() {
        let html = r#"
            <!-- <meta property="og:image" content="commented"> -->
            <script>var s = '<meta property="og:image" content="scripted">';</script>
            <p class="x">
        "#;
        let names = start_tags(html)
            .into_iter()
            .map(|tag| tag.name)
            .collect::<Vec<_>>();
        assert_eq!(vec!["p"], names);
    }

    #[test]
    fn char_refs_are_decoded() {
        assert_eq!(
            "/th?id=a.jpg&rf=b \"c\" 'd' é é",
            decode_char_refs("/th?id=a.jpg&amp;rf=b &quot;c&quot; &#39;d&apos; &#233; &#xE9;")
        );
        assert_eq!("&unknown; &#xZZ;", decode_char_refs("&unknown; &#xZZ;"));
    }
}
