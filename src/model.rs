use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Envelope returned by the `everything` endpoint. Only `articles` is read;
/// a body without it is a malformed response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    // Display-only extras: a value of the wrong shape is dropped instead of
    // failing the whole response.
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<Source>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<DateTime<Utc>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Source {
    #[serde(default)]
    pub name: Option<String>,
}

impl Article {
    pub fn title_line(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => "Untitled",
        }
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn source_line(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("")
    }

    pub fn date_line(&self) -> String {
        match self.published_at {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => "-".to_string(),
        }
    }

    /// Link handed to the browser; `None` when the API omitted it.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn image_link(&self) -> Option<&str> {
        self.url_to_image
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}
