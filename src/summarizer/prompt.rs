use serde::{Deserialize, Serialize};
use std::fmt;

// * Fixed instruction sent with every completion.
// * The six section headings must appear verbatim in the output.
pub const SYSTEM_PROMPT: &str = "\
당신은 한국수자원공사(K-water) 및 공공기관 연구보고서를 전문적으로 분석하는 정책·기술 전문가입니다.

아래 보고서를 'K-water 연구보고서 표준 A 요약 형식'에 맞춰 요약하십시오.

[출력 형식: 반드시 준수]

## 1. 연구 배경 및 필요성
## 2. 연구 목적
## 3. 연구 범위 및 방법
## 4. 주요 연구 결과
## 5. 정책적·실무적 시사점
## 6. 결론 및 향후 과제
";

pub const SECTION_HEADINGS: [&str; 6] = [
    "## 1. 연구 배경 및 필요성",
    "## 2. 연구 목적",
    "## 3. 연구 범위 및 방법",
    "## 4. 주요 연구 결과",
    "## 5. 정책적·실무적 시사점",
    "## 6. 결론 및 향후 과제",
];

/// Models the user may pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SummaryModel {
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
}

impl SummaryModel {
    pub const ALL: [SummaryModel; 2] = [SummaryModel::Gpt4oMini, SummaryModel::Gpt4o];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryModel::Gpt4oMini => "gpt-4o-mini",
            SummaryModel::Gpt4o => "gpt-4o",
        }
    }
}

impl fmt::Display for SummaryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
