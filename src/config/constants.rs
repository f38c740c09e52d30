// * Configuration Constants
// * Central location for all fixed defaults, thresholds and timeouts

// * Site origin used to resolve root-relative links
pub const PORTAL_ORIGIN: &str = "https://alio.go.kr";

// * Secondary origin some endpoints are served from
pub const PORTAL_ORIGIN_WWW: &str = "https://www.alio.go.kr";

// * Referer sent with every portal request
pub const PORTAL_REFERER: &str = "https://alio.go.kr";

// * Per-request socket timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

// * PDF downloads are larger, so they get a longer timeout
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 20;

// * Maximum characters per chunk sent to the summarizer
pub const CHUNK_CHAR_WINDOW: usize = 6000;

// * Characters shared between consecutive chunks
pub const CHUNK_CHAR_OVERLAP: usize = 400;

// * Default organization code (apbaId)
pub const DEFAULT_ORG_CODE: &str = "C0221";

// * Default report-type code (reportFormRootNo)
pub const DEFAULT_REPORT_TYPE: &str = "B1040";

// * Default listing page size
pub const DEFAULT_PAGE_SIZE: u32 = 50;

// * Title used when no title alias is present on an entry
pub const UNTITLED_PLACEHOLDER: &str = "(untitled)";

// * Default base URL for the hosted LLM API
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// * Length of the extracted-text preview kept in the debug panel (graphemes)
pub const TEXT_PREVIEW_GRAPHEMES: usize = 800;
