// Seoul open data (cultural events) and safetydata (emergency messages) clients

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use backend_domain::ports::PublicDataFeed;
use backend_domain::{AlertCategory, LocalEvent, PublicAlert, DEFAULT_RECOMMENDATION_SCORE};

use crate::utils::{parse_kst_datetime, stable_id};

const CULTURAL_PAGE_SIZE: usize = 1000;
const CULTURAL_MAX_PAGES: usize = 50;
const DISASTER_PAGE_SIZE: usize = 100;
const EVENT_ID_NAMESPACE: &str = "seoul-cultural-event";
const ALERT_ID_NAMESPACE: &str = "safetydata-emergency-message";
const DISASTER_SOURCE: &str = "행정안전부 재난문자";

#[derive(Debug, Clone)]
pub struct PublicDataConfig {
    pub seoul_api_base_url: String,
    pub seoul_api_key: Option<String>,
    pub disaster_api_url: String,
    pub disaster_api_key: Option<String>,
    pub timeout: Duration,
}

pub struct OpenDataFeed {
    client: Client,
    config: PublicDataConfig,
}

impl OpenDataFeed {
    pub fn new(config: PublicDataConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CulturalEventItem {
    #[serde(default)]
    pub num: Option<Value>,
    #[serde(default)]
    pub codename: Option<String>,
    #[serde(default)]
    pub guname: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub etc_desc: Option<String>,
    #[serde(default)]
    pub org_link: Option<String>,
    #[serde(default)]
    pub main_img: Option<String>,
    #[serde(default)]
    pub strtdate: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CulturalEventPage {
    #[serde(rename = "culturalEventInfo", default)]
    info: Option<CulturalEventInfo>,
}

#[derive(Debug, Deserialize)]
struct CulturalEventInfo {
    #[serde(default)]
    list_total_count: Option<usize>,
    #[serde(default)]
    row: Vec<CulturalEventItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DisasterMessageItem {
    #[serde(default)]
    pub sn: Option<Value>,
    #[serde(default)]
    pub rcptn_rgn_nm: Option<String>,
    #[serde(default)]
    pub msg_cn: Option<String>,
    #[serde(default)]
    pub crt_dt: Option<String>,
}

fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

pub fn category_for_codename(codename: &str) -> &'static str {
    if codename.contains("교육/체험") {
        "교육.강연"
    } else if codename.contains("축제") {
        "축제.마켓"
    } else {
        "문화.예술"
    }
}

/// Coordinates sometimes arrive as ranges like `37.51~37.52`; only the first
/// value is kept. Anything unparsable becomes `None`.
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.split('~').next()?.trim();
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Items without a title, start date or end date are skipped.
pub fn map_cultural_event(item: &CulturalEventItem) -> Option<LocalEvent> {
    let title = text(&item.title)?;
    let start_date = parse_kst_datetime(item.strtdate.as_deref()?)?;
    let end_date = parse_kst_datetime(item.end_date.as_deref()?)?;
    let api_id = item.num.as_ref().and_then(value_to_key);
    let key = api_id
        .clone()
        .unwrap_or_else(|| format!("{}|{}|{}", title, start_date.to_rfc3339(), text(&item.place).unwrap_or_default()));
    let content = format!(
        "{}\n{}",
        item.program.as_deref().unwrap_or_default().trim(),
        item.etc_desc.as_deref().unwrap_or_default().trim()
    );
    Some(LocalEvent {
        id: stable_id(EVENT_ID_NAMESPACE, &key),
        api_id,
        title,
        content: Some(content).filter(|c| !c.trim().is_empty()),
        category_name: Some(
            category_for_codename(item.codename.as_deref().unwrap_or_default()).to_string(),
        ),
        start_date: Some(start_date),
        end_date: Some(end_date),
        location_name: text(&item.guname).unwrap_or_default(),
        location_id: None,
        place: text(&item.place),
        image_url: text(&item.main_img),
        org_link: text(&item.org_link),
        latitude: parse_coordinate(item.lat.as_deref()),
        longitude: parse_coordinate(item.lot.as_deref()),
        recommendation_score: DEFAULT_RECOMMENDATION_SCORE,
    })
}

pub fn map_disaster_alert(item: &DisasterMessageItem) -> Option<PublicAlert> {
    let unique_id = item.sn.as_ref().and_then(value_to_key)?;
    let region = text(&item.rcptn_rgn_nm).unwrap_or_default();
    let published_at = parse_kst_datetime(item.crt_dt.as_deref()?)?;
    Some(PublicAlert {
        id: stable_id(ALERT_ID_NAMESPACE, &unique_id),
        title: format!("[재난문자] {region}"),
        content: text(&item.msg_cn).unwrap_or_default(),
        category: AlertCategory::Disaster,
        published_at,
        location_name: region,
        source: DISASTER_SOURCE.to_string(),
        unique_id: Some(unique_id),
    })
}

/// The message list sits under `body` in the current API version and under
/// `DS_DS_NATION_EMGNCY_MSG_INQ_V2` in older responses.
fn disaster_items(payload: Value) -> Result<Vec<DisasterMessageItem>> {
    let list = match payload {
        Value::Object(mut map) => map
            .remove("body")
            .or_else(|| map.remove("DS_DS_NATION_EMGNCY_MSG_INQ_V2"))
            .unwrap_or(Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    };
    Ok(serde_json::from_value(list)?)
}

#[async_trait]
impl PublicDataFeed for OpenDataFeed {
    async fn fetch_cultural_events(&self) -> Result<Vec<LocalEvent>> {
        let Some(key) = &self.config.seoul_api_key else {
            debug!("seoul_api_key not set, skipping cultural events");
            return Ok(Vec::new());
        };
        let mut events = Vec::new();
        let mut skipped = 0usize;
        for page in 0..CULTURAL_MAX_PAGES {
            let start = page * CULTURAL_PAGE_SIZE + 1;
            let end = start + CULTURAL_PAGE_SIZE - 1;
            let url = format!(
                "{}/{}/json/culturalEventInfo/{}/{}/",
                self.config.seoul_api_base_url, key, start, end
            );
            let body: CulturalEventPage = self
                .client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            let Some(info) = body.info else {
                break;
            };
            if info.row.is_empty() {
                break;
            }
            for item in &info.row {
                match map_cultural_event(item) {
                    Some(event) => events.push(event),
                    None => skipped += 1,
                }
            }
            if info.list_total_count.map(|total| end >= total).unwrap_or(true) {
                break;
            }
        }
        if skipped > 0 {
            warn!(skipped, "cultural event items without title or dates skipped");
        }
        info!(count = events.len(), "cultural events fetched");
        Ok(events)
    }

    async fn fetch_disaster_alerts(&self) -> Result<Vec<PublicAlert>> {
        let Some(key) = &self.config.disaster_api_key else {
            debug!("disaster_api_key not set, skipping disaster alerts");
            return Ok(Vec::new());
        };
        let page_size = DISASTER_PAGE_SIZE.to_string();
        let payload: Value = self
            .client
            .get(&self.config.disaster_api_url)
            .query(&[
                ("serviceKey", key.as_str()),
                ("returnType", "json"),
                ("pageNo", "1"),
                ("numOfRows", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let alerts: Vec<PublicAlert> = disaster_items(payload)?
            .iter()
            .filter_map(map_disaster_alert)
            .collect();
        info!(count = alerts.len(), "disaster alerts fetched");
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cultural_item(value: Value) -> CulturalEventItem {
        serde_json::from_value(value).expect("item")
    }

    #[test]
    fn codename_maps_to_category() {
        assert_eq!(category_for_codename("교육/체험"), "교육.강연");
        assert_eq!(category_for_codename("축제-문화/예술"), "축제.마켓");
        assert_eq!(category_for_codename("클래식"), "문화.예술");
        assert_eq!(category_for_codename(""), "문화.예술");
    }

    #[test]
    fn coordinates_keep_first_value_of_range() {
        assert_eq!(parse_coordinate(Some("37.51~37.52")), Some(37.51));
        assert_eq!(parse_coordinate(Some(" 126.9 ")), Some(126.9));
        assert_eq!(parse_coordinate(Some("미정")), None);
        assert_eq!(parse_coordinate(None), None);
    }

    #[test]
    fn cultural_item_maps_to_event() {
        let item = cultural_item(json!({
            "NUM": 153201,
            "CODENAME": "교육/체험",
            "GUNAME": "강남구",
            "TITLE": "어린이 코딩 교실",
            "PLACE": "강남구립도서관",
            "PROGRAM": "블록 코딩",
            "ETC_DESC": "사전 신청",
            "STRTDATE": "2024-05-01 00:00:00.0",
            "END_DATE": "2024-05-03 00:00:00.0",
            "LAT": "37.51~37.52",
            "LOT": "127.04"
        }));
        let event = map_cultural_event(&item).expect("event");
        assert_eq!(event.api_id.as_deref(), Some("153201"));
        assert_eq!(event.category_name.as_deref(), Some("교육.강연"));
        assert_eq!(event.location_name, "강남구");
        assert_eq!(event.content.as_deref(), Some("블록 코딩\n사전 신청"));
        assert_eq!(event.latitude, Some(37.51));
        assert_eq!(event.recommendation_score, DEFAULT_RECOMMENDATION_SCORE);
        assert_eq!(event.id, stable_id(EVENT_ID_NAMESPACE, "153201"));
    }

    #[test]
    fn cultural_item_without_dates_is_skipped() {
        let item = cultural_item(json!({
            "TITLE": "날짜 미정 행사",
            "STRTDATE": "2024-05-01 00:00:00.0"
        }));
        assert!(map_cultural_event(&item).is_none());
    }

    #[test]
    fn disaster_payload_maps_to_alerts() {
        let payload = json!({
            "header": { "resultCode": "00" },
            "body": [{
                "SN": 215000,
                "RCPTN_RGN_NM": "서울특별시 마포구",
                "MSG_CN": "호우경보 발령",
                "CRT_DT": "2024/07/01 12:00:00"
            }, {
                "RCPTN_RGN_NM": "식별자 없음",
                "MSG_CN": "skipped",
                "CRT_DT": "2024/07/01 12:00:00"
            }]
        });
        let alerts: Vec<PublicAlert> = disaster_items(payload)
            .expect("items")
            .iter()
            .filter_map(map_disaster_alert)
            .collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "[재난문자] 서울특별시 마포구");
        assert_eq!(alerts[0].unique_id.as_deref(), Some("215000"));
        assert_eq!(alerts[0].category, AlertCategory::Disaster);
    }

    #[test]
    fn legacy_disaster_key_is_accepted() {
        let payload = json!({
            "DS_DS_NATION_EMGNCY_MSG_INQ_V2": [{
                "SN": "77",
                "RCPTN_RGN_NM": "서울특별시",
                "MSG_CN": "폭염주의보",
                "CRT_DT": "2024-07-01 12:00:00"
            }]
        });
        assert_eq!(disaster_items(payload).expect("items").len(), 1);
    }
}
