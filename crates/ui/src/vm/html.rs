use std::collections::HashSet;

/// Strip question and choice markup down to inline formatting.
///
/// Backend text is rendered as HTML, so anything outside this list is removed.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "b", "i", "em", "strong", "sub", "sup", "code", "br", "span", "small",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new()
        .tags(tags)
        .clean(html)
        .to_string()
}
