use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

/// Bluesky's post length limit, in user-perceived characters.
pub const GRAPHEME_LIMIT: usize = 300;

/// Length in extended grapheme clusters. A ZWJ emoji family or a flag counts
/// as one, regardless of how many code points it spans.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Concatenate two optional facet lists, left before right. Either side
/// absent acts as the identity; both absent yields an empty list.
pub fn merge_facets(a: Option<Vec<Value>>, b: Option<Vec<Value>>) -> Vec<Value> {
    match (a, b) {
        (None, None) => Vec::new(),
        (Some(xs), None) | (None, Some(xs)) => xs,
        (Some(mut xs), Some(ys)) => {
            xs.extend(ys);
            xs
        }
    }
}
