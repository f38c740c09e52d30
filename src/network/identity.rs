use crate::config::constants::PORTAL_REFERER;
use crate::network::errors::NetworkError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};

// * IdentityProfile defines the fixed browser-like header set sent to the portal.
pub struct IdentityProfile {
    pub chrome_version: &'static str,
    pub user_agent: String,
    pub referer: String,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    // * Desktop Chrome 120 on Windows, referring from the portal itself.
    pub fn portal_browser() -> Self {
        let major_version = "120";
        let full_version = "120.0.0.0";

        Self {
            chrome_version: major_version,
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            referer: PORTAL_REFERER.to_string(),
            accept: "application/json, text/plain, */*",
            accept_language: "ko-KR,ko;q=0.9,en;q=0.8",
        }
    }

    // * Applies the configured profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), NetworkError> {
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).map_err(|_| NetworkError::InvalidHeader("User-Agent"))?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&self.referer).map_err(|_| NetworkError::InvalidHeader("Referer"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        Ok(())
    }

    pub fn header_map(&self) -> Result<HeaderMap, NetworkError> {
        let mut headers = HeaderMap::new();
        self.apply_to_headers(&mut headers)?;
        Ok(headers)
    }
}
