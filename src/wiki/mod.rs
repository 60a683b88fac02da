use crate::reference::{ReferenceLink, ReferenceStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum WikiToken {
    Text(String),
    Link(String),
}

/// Splits guide text on `[[Name]]` links.
///
/// - No nesting; the first `]]` closes the link.
/// - An unclosed `[[` and an empty `[[]]` are plain text.
pub(crate) fn parse_wiki_tokens(input: &str) -> Vec<WikiToken> {
    let mut out: Vec<WikiToken> = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let Some(start) = rest.find("[[") else {
            push_text(&mut out, rest);
            break;
        };
        push_text(&mut out, &rest[..start]);

        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("]]") else {
            push_text(&mut out, &rest[start..]);
            break;
        };

        let label = &after_open[..end];
        if label.is_empty() {
            push_text(&mut out, "[[]]");
        } else {
            out.push(WikiToken::Link(label.to_string()));
        }
        rest = &after_open[end + 2..];
    }

    out
}

// Adjacent text is merged so the renderer sees one node per run.
fn push_text(out: &mut Vec<WikiToken>, s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(WikiToken::Text(prev)) = out.last_mut() {
        prev.push_str(s);
    } else {
        out.push(WikiToken::Text(s.to_string()));
    }
}

/// A rendered piece of a guide line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum GuideSegment {
    Text(String),
    /// Known map or NPC; `href` opens the reference page on it.
    Reference { label: String, href: String },
    /// `[[Name]]` that matches nothing in the dataset.
    Unresolved(String),
}

pub(crate) fn reference_href(name: &str) -> String {
    format!("/reference?q={}", urlencoding::encode(name))
}

pub(crate) fn resolve_segments(input: &str, store: &ReferenceStore) -> Vec<GuideSegment> {
    parse_wiki_tokens(input)
        .into_iter()
        .map(|t| match t {
            WikiToken::Text(s) => GuideSegment::Text(s),
            WikiToken::Link(name) => match store.resolve_link(&name) {
                Some(ReferenceLink::Map(m)) => GuideSegment::Reference {
                    href: format!("/reference?map={}", urlencoding::encode(&m.id)),
                    label: name,
                },
                Some(ReferenceLink::Npc(_)) => GuideSegment::Reference {
                    href: reference_href(&name),
                    label: name,
                },
                None => GuideSegment::Unresolved(name),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            parse_wiki_tokens("just text"),
            vec![WikiToken::Text("just text".to_string())]
        );
        assert!(parse_wiki_tokens("").is_empty());
    }

    #[test]
    fn test_parse_links_between_text() {
        assert_eq!(
            parse_wiki_tokens("go to [[하버 타운]] then [[속삭이는 숲]]."),
            vec![
                WikiToken::Text("go to ".to_string()),
                WikiToken::Link("하버 타운".to_string()),
                WikiToken::Text(" then ".to_string()),
                WikiToken::Link("속삭이는 숲".to_string()),
                WikiToken::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_link_is_text() {
        assert_eq!(
            parse_wiki_tokens("a [[b"),
            vec![WikiToken::Text("a [[b".to_string())]
        );
    }

    #[test]
    fn test_empty_link_is_text_and_first_close_wins() {
        assert_eq!(
            parse_wiki_tokens("x[[]]y"),
            vec![WikiToken::Text("x[[]]y".to_string())]
        );
        assert_eq!(
            parse_wiki_tokens("[[a]]]]"),
            vec![
                WikiToken::Link("a".to_string()),
                WikiToken::Text("]]".to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_segments_against_bundled_store() {
        let store = ReferenceStore::bundled();
        let segs = resolve_segments("[[하버 타운]]의 [[잡화상 미라]], [[없는 곳]]", &store);
        assert_eq!(
            segs,
            vec![
                GuideSegment::Reference {
                    label: "하버 타운".to_string(),
                    href: "/reference?map=harbor-town".to_string(),
                },
                GuideSegment::Text("의 ".to_string()),
                GuideSegment::Reference {
                    label: "잡화상 미라".to_string(),
                    href: reference_href("잡화상 미라"),
                },
                GuideSegment::Text(", ".to_string()),
                GuideSegment::Unresolved("없는 곳".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_bundled_guide_link_resolves() {
        let store = ReferenceStore::bundled();
        for guide in store.guides() {
            for seg in resolve_segments(&guide.body, &store) {
                assert!(
                    !matches!(seg, GuideSegment::Unresolved(_)),
                    "guide {} has dangling link {:?}",
                    guide.slug,
                    seg
                );
            }
        }
    }
}
