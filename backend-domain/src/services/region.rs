// Seoul district detection for free-text chatbot questions

pub static SEOUL_DISTRICTS: [&str; 25] = [
    "강남구", "강동구", "강북구", "강서구", "관악구", "광진구", "구로구", "금천구",
    "노원구", "도봉구", "동대문구", "동작구", "마포구", "서대문구", "서초구", "성동구",
    "성북구", "송파구", "양천구", "영등포구", "용산구", "은평구", "종로구", "중구",
    "중랑구",
];

static REGION_ALIASES: [(&str, &str); 6] = [
    ("홍대", "마포구"),
    ("강남역", "강남구"),
    ("연희동", "서대문구"),
    ("신촌", "서대문구"),
    ("잠실", "송파구"),
    ("여의도", "영등포구"),
];

fn earliest<'a>(
    message: &str,
    candidates: impl Iterator<Item = (&'a str, &'static str)>,
) -> Option<&'static str> {
    candidates
        .filter_map(|(needle, district)| message.find(needle).map(|pos| (pos, needle.len(), district)))
        // earliest position, longer needle on ties
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, district)| district)
}

/// Finds the district a question is about: full district names first, then
/// landmark aliases, then district names without the trailing "구".
pub fn extract_region(message: &str) -> Option<&'static str> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    earliest(message, SEOUL_DISTRICTS.iter().map(|d| (*d, *d)))
        .or_else(|| earliest(message, REGION_ALIASES.iter().copied()))
        .or_else(|| {
            earliest(
                message,
                SEOUL_DISTRICTS.iter().copied().filter_map(|d| {
                    let stem = d.strip_suffix('구')?;
                    // single-syllable stems such as 중 are too ambiguous
                    (stem.chars().count() >= 2).then_some((stem, d))
                }),
            )
        })
}
