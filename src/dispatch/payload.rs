//! Typed block payloads.
//!
//! These structs describe the JSON body each structured block type is
//! expected to carry. Unknown extra fields are ignored. Table cells and a
//! few display strings accept any JSON scalar, since producers often emit
//! numbers where the shape says string.

use crate::error::BlockError;
use crate::parser::decode_lenient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decodes a block body into the payload for `block_type`.
///
/// # Errors
///
/// Returns [`BlockError::BlockDecode`] carrying the type name and the
/// decoder message.
pub fn decode_body<T: DeserializeOwned>(block_type: &str, body: &str) -> Result<T, BlockError> {
    decode_lenient(body).map_err(|e| BlockError::BlockDecode {
        block_type: block_type.to_string(),
        message: e.to_string(),
    })
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(scalar_to_string)
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(scalar_to_string)
        .filter(|s| !s.is_empty()))
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(scalar_to_string)
        .collect())
}

fn lenient_rows<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Vec<String>>, D::Error> {
    Ok(Vec::<Vec<Value>>::deserialize(deserializer)?
        .into_iter()
        .map(|row| row.into_iter().map(scalar_to_string).collect())
        .collect())
}

/// `table` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePayload {
    /// Column headers.
    #[serde(deserialize_with = "lenient_strings")]
    pub headers: Vec<String>,
    /// Row cells.
    #[serde(deserialize_with = "lenient_rows")]
    pub rows: Vec<Vec<String>>,
}

/// `list` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPayload {
    /// Optional list title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// List entries.
    pub items: Vec<ListItem>,
}

/// One entry of a `list` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Entry title.
    pub title: String,
    /// Entry description.
    #[serde(default)]
    pub description: String,
    /// Whether the entry is checked off.
    #[serde(default)]
    pub completed: bool,
}

/// `chart` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Chart kind and title.
    pub properties: ChartProperties,
    /// Category labels.
    #[serde(deserialize_with = "lenient_strings")]
    pub labels: Vec<String>,
    /// Data series.
    pub datasets: Vec<Dataset>,
}

/// Chart kind and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProperties {
    /// `bar`, `line`, `pie`, `doughnut`, `scatter`, ...
    pub chart_type: String,
    /// Chart title.
    pub title: String,
}

/// One chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Series label.
    pub label: String,
    /// Series values.
    pub data: Vec<f64>,
    /// One color for the series or one per point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Colors>,
}

/// Chart colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Colors {
    /// Single color.
    Single(String),
    /// Per-point colors.
    Many(Vec<String>),
}

/// `links` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksPayload {
    /// Linked URLs.
    pub links: Vec<LinkEntry>,
}

/// A link: a bare URL, or a URL with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    /// Bare URL.
    Url(String),
    /// URL with optional title and description.
    Detailed {
        /// Target URL.
        url: String,
        /// Display title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Short description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl LinkEntry {
    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Detailed { url, .. } => url,
        }
    }
}

/// `images` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesPayload {
    /// Image URLs.
    pub images: Vec<String>,
}

/// `source` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesPayload {
    /// Web sources.
    pub sources: Vec<SourceEntry>,
}

/// One web source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Page URL.
    pub link: String,
    /// Page title.
    pub title: String,
    /// Site name.
    pub site_name: String,
    /// Preview image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// `file` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    /// File description and content.
    pub file_data: FileData,
}

/// Generated file description and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    /// Name and extension.
    pub metadata: FileMetadata,
    /// Document content; opaque to this crate.
    #[serde(default)]
    pub content: Value,
}

/// File name and extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Name without extension.
    pub file_name: String,
    /// Extension without the dot.
    pub extension: String,
}

impl FileMetadata {
    /// Returns `name.extension`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}.{extension}", self.file_name)
        }
    }
}

/// `youtube_video` payload.
///
/// Every field is optional at decode time: a video missing its identifying
/// fields is an incomplete media block, not a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPayload {
    /// YouTube video id.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Video title.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Thumbnail URL.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Channel name.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    /// Short description.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human-readable duration.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// View count as reported.
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
}

impl VideoPayload {
    /// Names of the fields required to display the video that are absent
    /// or empty, in wire spelling.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("videoId", &self.video_id),
            ("title", &self.title),
            ("thumbnailUrl", &self.thumbnail_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns the watch URL when the video id is known.
    #[must_use]
    pub fn watch_url(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
    }
}

/// `RAGItem` payload: a file uploaded alongside a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagItemPayload {
    /// Uploaded file name.
    pub filename: String,
    /// MIME type or extension.
    #[serde(default, deserialize_with = "lenient_string")]
    pub extension: String,
    /// Display title.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_accepts_scalar_cells() {
        let table: TablePayload =
            decode_body("table", r#"{"headers":["a","b"],"rows":[["x",1],[true,null]]}"#)
                .unwrap();
        assert_eq!(table.rows[0], vec!["x", "1"]);
        assert_eq!(table.rows[1], vec!["true", ""]);
    }

    #[test]
    fn test_table_requires_rows() {
        let err = decode_body::<TablePayload>("table", r#"{"headers":["a"]}"#).unwrap_err();
        assert!(matches!(
            &err,
            BlockError::BlockDecode { block_type, message }
                if block_type == "table" && message.contains("rows")
        ));
    }

    #[test]
    fn test_list_defaults() {
        let list: ListPayload = decode_body("list", r#"{"items":[{"title":"a"}]}"#).unwrap();
        assert_eq!(list.title, None);
        assert_eq!(list.items[0].description, "");
        assert!(!list.items[0].completed);
    }

    #[test]
    fn test_chart_colors() {
        let chart: ChartPayload = decode_body(
            "chart",
            r#"{"properties":{"chartType":"bar","title":"T"},"labels":["a","b"],
                "datasets":[{"label":"s","data":[1,2.5],"backgroundColor":["red","blue"]}]}"#,
        )
        .unwrap();
        assert_eq!(chart.properties.chart_type, "bar");
        assert_eq!(chart.datasets[0].data, vec![1.0, 2.5]);
        assert_eq!(
            chart.datasets[0].background_color,
            Some(Colors::Many(vec!["red".to_string(), "blue".to_string()]))
        );
    }

    #[test]
    fn test_links_bare_and_detailed() {
        let links: LinksPayload = decode_body(
            "links",
            r#"{"links":["https://a.example",{"url":"https://b.example","title":"B"}]}"#,
        )
        .unwrap();
        assert_eq!(links.links[0].url(), "https://a.example");
        assert_eq!(links.links[1].url(), "https://b.example");
    }

    #[test]
    fn test_file_full_name() {
        let file: FilePayload = decode_body(
            "file",
            r#"{"file_data":{"metadata":{"file_name":"report","extension":".pdf"},"content":[]}}"#,
        )
        .unwrap();
        assert_eq!(file.file_data.metadata.full_name(), "report.pdf");
    }

    #[test]
    fn test_video_missing_fields() {
        let video: VideoPayload =
            decode_body("youtube_video", r#"{"videoId":"abc","title":"  "}"#).unwrap();
        assert_eq!(video.missing_fields(), vec!["title", "thumbnailUrl"]);
        assert_eq!(
            video.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
    }

    #[test]
    fn test_video_view_count_number() {
        let video: VideoPayload =
            decode_body("youtube_video", r#"{"viewCount": 1200}"#).unwrap();
        assert_eq!(video.view_count.as_deref(), Some("1200"));
    }

    #[test]
    fn test_rag_item() {
        let item: RagItemPayload = decode_body(
            "RAGItem",
            r#"{"filename":"notes.pdf","extension":"application/pdf","title":"notes"}"#,
        )
        .unwrap();
        assert_eq!(item.title, "notes");
    }
}
