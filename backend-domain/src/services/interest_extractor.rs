use std::collections::BTreeSet;

use crate::entities::UserInterest;

/// Parent category names and keyword tokens derived from a user's interests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestProfile {
    pub parent_categories: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
}

impl InterestProfile {
    pub fn is_empty(&self) -> bool {
        self.parent_categories.is_empty() && self.keywords.is_empty()
    }
}

fn is_keyword_separator(c: char) -> bool {
    c == ',' || c == '(' || c == ')' || c.is_whitespace()
}

/// Splits an interest name on commas, parentheses and whitespace.
/// "지역공연(연극, 뮤지컬, 콘서트)" yields 지역공연, 연극, 뮤지컬, 콘서트.
pub fn tokenize_keywords(name: &str) -> impl Iterator<Item = &str> {
    name.split(is_keyword_separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn extract_interests(interests: &[UserInterest]) -> InterestProfile {
    let mut profile = InterestProfile::default();
    for interest in interests {
        let parent = interest.parent_category.trim();
        if !parent.is_empty() {
            profile.parent_categories.insert(parent.to_string());
        }
        profile
            .keywords
            .extend(tokenize_keywords(&interest.name).map(ToString::to_string));
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interest(name: &str, parent: &str) -> UserInterest {
        UserInterest {
            subcategory_id: 1,
            name: name.to_string(),
            parent_category: parent.to_string(),
        }
    }

    #[test]
    fn tokenizes_parenthesized_lists() {
        let tokens: Vec<_> = tokenize_keywords("지역공연(연극, 뮤지컬, 콘서트)").collect();
        assert_eq!(tokens, vec!["지역공연", "연극", "뮤지컬", "콘서트"]);
    }

    #[test]
    fn profile_is_union_over_interests() {
        let profile = extract_interests(&[
            interest("지역공연(연극, 뮤지컬, 콘서트)", "문화.예술"),
            interest("전시 콘서트", "문화.예술"),
            interest("플리마켓", "축제.마켓"),
        ]);
        assert_eq!(profile.parent_categories.len(), 2);
        assert!(profile.keywords.contains("전시"));
        assert!(profile.keywords.contains("플리마켓"));
        assert_eq!(profile.keywords.len(), 6);
    }

    #[test]
    fn no_interests_gives_empty_profile() {
        assert!(extract_interests(&[]).is_empty());
    }
}
