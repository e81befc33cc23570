use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::bsky::BskyError;

/// Resolves a handle like `user.bsky.social` to a DID, or `None` when the
/// handle does not exist.
#[async_trait]
pub trait HandleResolver: Send + Sync {
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, BskyError>;
}

/// Result of facet detection. `text` is authoritative: a detector is allowed
/// to normalize the text it was given, and callers must post `text`, not
/// their original input.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFacets {
    pub text: String,
    pub facets: Option<Vec<Value>>,
}

#[async_trait]
pub trait FacetDetector: Send + Sync {
    async fn detect_facets(&self, text: &str) -> Result<DetectedFacets, BskyError>;
}

/// Detects link and mention facets the way the reference RichText client
/// does: URLs become `facet#link` features, `@handle` mentions are resolved
/// to DIDs and skipped when resolution fails.
pub struct RichTextDetector {
    resolver: Arc<dyn HandleResolver>,
}

impl RichTextDetector {
    pub fn new(resolver: Arc<dyn HandleResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl FacetDetector for RichTextDetector {
    async fn detect_facets(&self, text: &str) -> Result<DetectedFacets, BskyError> {
        let mut facets = Vec::new();
        for candidate in scan_candidates(text) {
            match candidate {
                Candidate::Link {
                    byte_start,
                    byte_end,
                    uri,
                } => facets.push(facet(
                    byte_start,
                    byte_end,
                    json!({ "$type": "app.bsky.richtext.facet#link", "uri": uri }),
                )),
                Candidate::Mention {
                    byte_start,
                    byte_end,
                    handle,
                } => match self.resolver.resolve_handle(&handle).await? {
                    Some(did) => facets.push(facet(
                        byte_start,
                        byte_end,
                        json!({ "$type": "app.bsky.richtext.facet#mention", "did": did }),
                    )),
                    None => log::debug!("skipping unresolvable mention @{handle}"),
                },
            }
        }

        Ok(DetectedFacets {
            text: text.to_string(),
            facets: if facets.is_empty() {
                None
            } else {
                Some(facets)
            },
        })
    }
}

fn facet(byte_start: usize, byte_end: usize, feature: Value) -> Value {
    json!({
        "index": { "byteStart": byte_start, "byteEnd": byte_end },
        "features": [feature],
    })
}

/// A span of text that looks like rich content, with UTF-8 byte offsets as
/// the facet index format requires.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    Link {
        byte_start: usize,
        byte_end: usize,
        uri: String,
    },
    Mention {
        byte_start: usize,
        byte_end: usize,
        handle: String,
    },
}

/// Scan whitespace-separated words for URLs and mentions. Pure; offsets are
/// byte positions into the original string, in ascending order.
fn scan_candidates(text: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (start, word) in split_words(text) {
        if word.starts_with("http://") || word.starts_with("https://") {
            let trimmed = word.trim_end_matches(TRAILING_PUNCTUATION);
            if trimmed.len() > "https://".len() {
                candidates.push(Candidate::Link {
                    byte_start: start,
                    byte_end: start + trimmed.len(),
                    uri: trimmed.to_string(),
                });
            }
        } else if let Some(rest) = word.strip_prefix('@') {
            let handle = rest.trim_end_matches(TRAILING_PUNCTUATION);
            if is_valid_handle(handle) {
                candidates.push(Candidate::Mention {
                    // the facet covers the '@' sigil too
                    byte_start: start,
                    byte_end: start + 1 + handle.len(),
                    handle: handle.to_string(),
                });
            }
        }
    }
    candidates
}

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.contains('.')
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Maximal runs of non-whitespace with their starting byte offsets.
fn split_words(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (index, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(word_start) = start.take() {
                words.push((word_start, &text[word_start..index]));
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(word_start) = start {
        words.push((word_start, &text[word_start..]));
    }
    words
}
