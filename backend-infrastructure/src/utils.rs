use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Largest integer a JSON number holds without losing precision.
const ID_MASK: u64 = (1 << 53) - 1;

pub fn millis_to_utc(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn chrono_to_offset(value: DateTime<Utc>) -> OffsetDateTime {
    millis_to_utc(value.timestamp_millis())
}

pub fn offset_to_chrono(value: OffsetDateTime) -> DateTime<Utc> {
    let millis = (value.unix_timestamp_nanos() / 1_000_000) as i64;
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

/// Stable numeric id for a record identified by an external key.
pub fn stable_id(namespace: &str, key: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update([0u8]);
    hasher.update(key.trim().as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    match u64::from_be_bytes(bytes) & ID_MASK {
        0 => 1,
        id => id,
    }
}

const KST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Parses the local (Korea Standard Time) timestamps public data APIs return,
/// e.g. `2024-05-01 00:00:00.0`, `2024/05/01 10:30:00` or `2024-05-01`.
pub fn parse_kst_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim().replace('/', "-");
    if value.is_empty() {
        return None;
    }
    let naive = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    FixedOffset::east_opt(KST_OFFSET_SECONDS)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_id_is_deterministic_and_json_safe() {
        let a = stable_id("event", "12345");
        assert_eq!(a, stable_id("event", " 12345 "));
        assert_ne!(a, stable_id("alert", "12345"));
        assert!(a <= ID_MASK);
    }

    #[test]
    fn kst_timestamps_convert_to_utc() {
        let parsed = parse_kst_datetime("2024-05-01 09:00:00.0").expect("parsed");
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        let slashed = parse_kst_datetime("2024/05/01 09:00:00").expect("parsed");
        assert_eq!(parsed, slashed);
        let date_only = parse_kst_datetime("2024-05-01").expect("parsed");
        assert_eq!(date_only.to_rfc3339(), "2024-04-30T15:00:00+00:00");
        assert!(parse_kst_datetime("soon").is_none());
    }

    #[test]
    fn chrono_and_time_agree() {
        let now = Utc.timestamp_millis_opt(1_714_521_600_123).single().expect("ts");
        assert_eq!(offset_to_chrono(chrono_to_offset(now)), now);
    }
}
