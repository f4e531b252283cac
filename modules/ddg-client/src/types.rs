/// One organic search result: title text and destination URL, in the
/// order the engine returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}
