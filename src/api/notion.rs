use super::{error_from_response, ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Property names in the recruitment database.
pub(crate) const PROP_TITLE: &str = "이름";
pub(crate) const PROP_CATEGORY: &str = "카테고리";
pub(crate) const PROP_STATUS: &str = "상태";
pub(crate) const PROP_TAGS: &str = "태그";
pub(crate) const PROP_DESCRIPTION: &str = "설명";
pub(crate) const PROP_SCHEDULE: &str = "일정";
pub(crate) const PROP_CAPACITY: &str = "인원";

/// One Notion page from the recruitment database.
///
/// Properties are passed through untouched; the accessors below only read
/// the shapes the listing page displays.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct RecruitmentEntry {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl RecruitmentEntry {
    fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }

    /// Concatenated `plain_text` of a `title` or `rich_text` property.
    pub fn text(&self, name: &str) -> String {
        let Some(prop) = self.property(name) else {
            return String::new();
        };
        ["title", "rich_text"]
            .iter()
            .filter_map(|k| prop.get(*k).and_then(|v| v.as_array()))
            .flatten()
            .filter_map(|span| span.get("plain_text").and_then(|t| t.as_str()))
            .collect()
    }

    /// Name of a `select` (or `status`) property.
    pub fn select(&self, name: &str) -> Option<String> {
        let prop = self.property(name)?;
        ["select", "status"]
            .iter()
            .find_map(|k| prop.get(*k)?.get("name")?.as_str())
            .map(|s| s.to_string())
    }

    pub fn multi_select(&self, name: &str) -> Vec<String> {
        self.property(name)
            .and_then(|p| p.get("multi_select"))
            .and_then(|v| v.as_array())
            .map(|opts| {
                opts.iter()
                    .filter_map(|o| o.get("name").and_then(|n| n.as_str()))
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name)?.get("number")?.as_f64()
    }

    /// `date.start` of a date property.
    pub fn date(&self, name: &str) -> Option<String> {
        self.property(name)?
            .get("date")?
            .get("start")?
            .as_str()
            .map(|s| s.to_string())
    }
}

/// Groups entries by a select property, keeping first-seen group order and
/// the original order inside each group. Entries without a value fall into
/// `fallback`.
pub(crate) fn group_by_select(
    entries: &[RecruitmentEntry],
    property: &str,
    fallback: &str,
) -> Vec<(String, Vec<RecruitmentEntry>)> {
    let mut groups: Vec<(String, Vec<RecruitmentEntry>)> = Vec::new();
    for entry in entries {
        let key = entry
            .select(property)
            .unwrap_or_else(|| fallback.to_string());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, items)) => items.push(entry.clone()),
            None => groups.push((key, vec![entry.clone()])),
        }
    }
    groups
}

#[derive(Deserialize)]
struct RecruitListResponse {
    results: Vec<RecruitmentEntry>,
}

/// Client for the notion-proxy deployment at the configured endpoint.
#[derive(Clone, Debug)]
pub(crate) struct NotionClient {
    base_url: String,
}

impl NotionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub(crate) fn recruits_url(&self) -> String {
        format!("{}/api/recruits", self.base_url)
    }

    /// Entries in ascending order of the database's ordinal property.
    pub async fn list_recruits(&self) -> ApiResult<Vec<RecruitmentEntry>> {
        if self.base_url.is_empty() {
            return Err(ApiError::NotConfigured("서버 주소"));
        }

        let res = reqwest::Client::new()
            .get(self.recruits_url())
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(ApiError::network)?;
        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body, "모집글 조회 실패"));
        }

        Self::parse_recruits(&body)
    }

    pub(crate) fn parse_recruits(body: &str) -> ApiResult<Vec<RecruitmentEntry>> {
        serde_json::from_str::<RecruitListResponse>(body)
            .map(|r| r.results)
            .map_err(ApiError::parse)
    }
}
