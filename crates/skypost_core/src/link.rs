use crate::screenshot::Padding;

/// What a content reference points at: an entry on the stream page, addressed
/// by its in-page anchor, or a standalone article addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkType {
    Stream { stream_id: String },
    Article { slug_path: String },
}

/// Classify a raw link. `stream#<id>` keeps the id verbatim; anything else is
/// treated as an article title and slugified.
pub fn parse_link(link: &str) -> LinkType {
    match link.strip_prefix("stream#") {
        Some(stream_id) => LinkType::Stream {
            stream_id: stream_id.to_string(),
        },
        None => LinkType::Article {
            slug_path: slugify(link),
        },
    }
}

/// Clip padding per page template. The stream page has uniform chrome; the
/// article template needs wider sides, extra room below, and a negative top
/// (the clip reaches above the element's box).
pub fn padding_for(link_type: &LinkType) -> Padding {
    match link_type {
        LinkType::Stream { .. } => Padding {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 10.0,
        },
        LinkType::Article { .. } => Padding {
            top: -10.0,
            right: 30.0,
            bottom: 40.0,
            left: 30.0,
        },
    }
}

/// Public path used in the reply text. Stream links keep their original
/// `stream#id` form so the URL lands on the in-page anchor.
pub fn link_path(link_type: &LinkType, link: &str) -> String {
    match link_type {
        LinkType::Stream { .. } => link.to_string(),
        LinkType::Article { slug_path } => slug_path.clone(),
    }
}

/// Lowercase slug: alphanumerics pass through, every other run of characters
/// collapses to a single hyphen. Idempotent on already-slugified input.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_prefix_yields_stream() {
        assert_eq!(
            parse_link("stream#abc-123"),
            LinkType::Stream {
                stream_id: "abc-123".to_string()
            }
        );
    }

    #[test]
    fn anything_else_yields_slugified_article() {
        assert_eq!(
            parse_link("My Cool Article"),
            LinkType::Article {
                slug_path: "my-cool-article".to_string()
            }
        );
    }

    #[test]
    fn slugify_is_a_fixed_point_on_slugs() {
        assert_eq!(slugify("already-slug"), "already-slug");
        assert_eq!(slugify(&slugify("Some! Title?")), slugify("Some! Title?"));
    }

    #[test]
    fn slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("foo -- bar!!"), "foo-bar");
        assert_eq!(slugify("  Hello,   World  "), "hello-world");
    }

    #[test]
    fn stream_padding_is_uniform() {
        let pad = padding_for(&LinkType::Stream {
            stream_id: "x".to_string(),
        });
        assert_eq!(
            pad,
            Padding {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 10.0
            }
        );
    }

    #[test]
    fn article_padding_has_negative_top() {
        let pad = padding_for(&LinkType::Article {
            slug_path: "x".to_string(),
        });
        assert_eq!(
            pad,
            Padding {
                top: -10.0,
                right: 30.0,
                bottom: 40.0,
                left: 30.0
            }
        );
    }

    #[test]
    fn link_path_preserves_stream_anchor_form() {
        let link_type = parse_link("stream#abc");
        assert_eq!(link_path(&link_type, "stream#abc"), "stream#abc");
    }

    #[test]
    fn link_path_uses_slug_for_articles() {
        let link_type = parse_link("My Slug");
        assert_eq!(link_path(&link_type, "My Slug"), "my-slug");
    }
}
