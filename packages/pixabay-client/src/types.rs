use serde::{Deserialize, Serialize};

/// Label attached to every image this client returns.
pub const SOURCE_LABEL: &str = "Pixabay";

/// An image picked from the search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockImage {
    pub url: String,
    pub source: String,
}

/// Response body of the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// A single search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    pub id: u64,
    #[serde(rename = "largeImageURL", default)]
    pub large_image_url: Option<String>,
    #[serde(rename = "webformatURL", default)]
    pub webformat_url: Option<String>,
    #[serde(rename = "pageURL", default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// First hit with a large image, else the first hit's web-format image.
pub fn pick_image(hits: &[Hit]) -> Option<StockImage> {
    hits.iter()
        .find_map(|hit| non_blank(&hit.large_image_url))
        .or_else(|| hits.first().and_then(|hit| non_blank(&hit.webformat_url)))
        .map(|url| StockImage {
            url,
            source: SOURCE_LABEL.to_string(),
        })
}

fn non_blank(url: &Option<String>) -> Option<String> {
    url.as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(str::to_string)
}
