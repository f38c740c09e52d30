// * Endpoint & Alias Catalog
// * Every static candidate list the prober, normalizer and resolver walk through.
// * Tables are data: built-in defaults can be replaced by a JSON file.

use crate::config::constants::{PORTAL_ORIGIN, PORTAL_ORIGIN_WWW};
use crate::config::ConfigError;
use crate::network::transport::{BodyEncoding, HttpMethod};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One listing endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCandidate {
    pub url: String,
    pub method: HttpMethod,
    /// Body encoding for POST; GET always sends query parameters
    #[serde(default)]
    pub encoding: BodyEncoding,
}

impl EndpointCandidate {
    pub fn new(url: impl Into<String>, method: HttpMethod, encoding: BodyEncoding) -> Self {
        Self {
            url: url.into(),
            method,
            encoding,
        }
    }
}

/// Value placed into a payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Org,
    ReportType,
    Page,
    PageSize,
    TypeToken,
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeField {
    pub key: String,
    pub slot: Slot,
}

/// A named payload/parameter layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadShape {
    pub name: String,
    pub fields: Vec<ShapeField>,
}

impl PayloadShape {
    fn from_pairs(name: &str, pairs: &[(&str, Slot)]) -> Self {
        Self {
            name: name.to_string(),
            fields: pairs
                .iter()
                .map(|(key, slot)| ShapeField {
                    key: key.to_string(),
                    slot: slot.clone(),
                })
                .collect(),
        }
    }

    /// True when the shape carries an auxiliary type-token field
    pub fn uses_type_token(&self) -> bool {
        self.fields.iter().any(|f| f.slot == Slot::TypeToken)
    }

    /// Key of the page-number field, if the shape paginates
    pub fn page_key(&self) -> Option<&str> {
        self.key_for(&Slot::Page)
    }

    pub fn page_size_key(&self) -> Option<&str> {
        self.key_for(&Slot::PageSize)
    }

    fn key_for(&self, slot: &Slot) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| &f.slot == slot)
            .map(|f| f.key.as_str())
    }
}

/// Alias lists for report-entry fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub title: Vec<String>,
    pub org: Vec<String>,
    pub date: Vec<String>,
    /// Shared by the normalizer and the PDF-link resolver
    pub id: Vec<String>,
    pub url: Vec<String>,
    pub detail_api_url: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            title: strings(&["reportTitle", "title", "rptTitle", "subject", "bbsTitle", "name"]),
            org: strings(&["apbaNm", "apbaName", "orgName", "instNm", "organization", "org"]),
            date: strings(&["regDate", "reportDate", "pubDate", "openDate", "regDt", "date", "createdAt"]),
            id: strings(&["reportId", "rptId", "reportSeq", "bbsSeq", "disclosureNo", "seq", "idx", "id"]),
            url: strings(&["detailUrl", "viewUrl", "url", "link", "href"]),
            detail_api_url: strings(&["detailApiUrl"]),
        }
    }
}

/// Alias lists for attachment structures inside detail responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentAliases {
    pub list_keys: Vec<String>,
    pub ext_keys: Vec<String>,
    pub name_keys: Vec<String>,
    pub url_keys: Vec<String>,
}

impl Default for AttachmentAliases {
    fn default() -> Self {
        Self {
            list_keys: strings(&["attachFiles", "attachList", "atchFileList", "fileList", "files", "attachments"]),
            ext_keys: strings(&["fileExt", "ext", "extension", "fileType"]),
            name_keys: strings(&["fileName", "orgFileName", "originalFileName", "fileNm", "name"]),
            url_keys: strings(&["downloadUrl", "downUrl", "fileUrl", "url", "href", "filePath"]),
        }
    }
}

/// All static candidate tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub origin: String,
    /// Detail page URL synthesized from an identifier; `{id}` is substituted
    pub detail_page_template: String,
    pub list_endpoints: Vec<EndpointCandidate>,
    pub payload_shapes: Vec<PayloadShape>,
    pub type_tokens: Vec<String>,
    pub detail_endpoints: Vec<String>,
    pub list_keys: Vec<String>,
    pub total_keys: Vec<String>,
    pub fields: FieldAliases,
    pub attachments: AttachmentAliases,
    /// Substrings marking an href as a PDF/download link (lowercase)
    pub link_indicators: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        use BodyEncoding::{Form, Json};
        use HttpMethod::{Get, Post};

        let list_endpoints = vec![
            EndpointCandidate::new(format!("{PORTAL_ORIGIN}/iris/api/report/list"), Post, Json),
            EndpointCandidate::new(format!("{PORTAL_ORIGIN_WWW}/iris/api/report/list"), Post, Json),
            EndpointCandidate::new(format!("{PORTAL_ORIGIN}/iris/api/report/list"), Get, Json),
            EndpointCandidate::new(format!("{PORTAL_ORIGIN}/item/itemReportListSusi.json"), Post, Form),
            EndpointCandidate::new(format!("{PORTAL_ORIGIN}/occasional/researchReportList.json"), Get, Form),
        ];

        let payload_shapes = vec![
            PayloadShape::from_pairs(
                "page-index",
                &[
                    ("apbaId", Slot::Org),
                    ("reportFormRootNo", Slot::ReportType),
                    ("pageIndex", Slot::Page),
                    ("pageSize", Slot::PageSize),
                ],
            ),
            PayloadShape::from_pairs(
                "page-no-with-form",
                &[
                    ("apbaId", Slot::Org),
                    ("reportFormRootNo", Slot::ReportType),
                    ("reportFormNo", Slot::TypeToken),
                    ("pageNo", Slot::Page),
                    ("pageSize", Slot::PageSize),
                ],
            ),
            PayloadShape::from_pairs(
                "list-search",
                &[
                    ("apbaIdList", Slot::Org),
                    ("reportFormRootNo", Slot::ReportType),
                    ("page", Slot::Page),
                    ("rows", Slot::PageSize),
                    ("searchType", Slot::Literal("all".to_string())),
                ],
            ),
        ];

        Self {
            origin: PORTAL_ORIGIN.to_string(),
            detail_page_template: format!(
                "{PORTAL_ORIGIN}/occasional/researchReportDetail.do?reportId={{id}}"
            ),
            list_endpoints,
            payload_shapes,
            type_tokens: strings(&["ALL", ""]),
            detail_endpoints: vec![
                format!("{PORTAL_ORIGIN}/iris/api/report/detail"),
                format!("{PORTAL_ORIGIN}/iris/api/report/view"),
                format!("{PORTAL_ORIGIN_WWW}/iris/api/report/detail"),
            ],
            list_keys: strings(&[
                "list", "data", "items", "rows", "result", "resultList", "content", "records", "body",
            ]),
            total_keys: strings(&["totalCount", "totalCnt", "totCnt", "total", "recordsTotal", "count"]),
            fields: FieldAliases::default(),
            attachments: AttachmentAliases::default(),
            link_indicators: strings(&[".pdf", "download", "filedown", "atchfile"]),
        }
    }
}

impl Catalog {
    /// Parses a catalog from JSON; absent sections keep their defaults
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Substitutes an identifier into the detail page template
    pub fn detail_page_for(&self, id: &str) -> String {
        self.detail_page_template.replace("{id}", id)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
