use serde::{Deserialize, Serialize};

/// Catalogue entry kind. The remote service's one-letter type codes are
/// translated in the remote client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Series,
    Book,
    Game,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
            MediaKind::Book => "book",
            MediaKind::Game => "game",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An entry in the shared catalogue. Owned by the remote content service;
/// read-only from this side.
///
/// `api_id` is the stable external identifier, unique per `(api_id, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub api_id: String,
    pub kind: MediaKind,
    pub title: String,
    pub author: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Free-text release date as the service returns it ("12 Mar 1999",
    /// "1999", "1999-03-12", ...). Use [`release_year`] to sort on it.
    pub release_date: Option<String>,
    pub rating: Option<f32>,
}

/// Extract a 4-digit year from the free-text release date.
///
/// The service does not normalize dates, so this scans for the first run of
/// exactly four digits. Missing or unparseable dates yield 0 so they sort
/// together at the low end.
pub fn release_year(item: &ContentItem) -> u16 {
    let Some(date) = item.release_date.as_deref() else {
        return 0;
    };
    let bytes = date.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 4 {
                if let Ok(year) = date[start..i].parse::<u16>() {
                    return year;
                }
            }
        } else {
            i += 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_date(date: Option<&str>) -> ContentItem {
        ContentItem {
            api_id: "tt001".to_string(),
            kind: MediaKind::Movie,
            title: "Test".to_string(),
            author: None,
            image: None,
            genres: vec![],
            release_date: date.map(|s| s.to_string()),
            rating: None,
        }
    }

    #[test]
    fn test_release_year_plain() {
        assert_eq!(release_year(&item_with_date(Some("1999"))), 1999);
    }

    #[test]
    fn test_release_year_embedded() {
        assert_eq!(release_year(&item_with_date(Some("12 Mar 1999"))), 1999);
        assert_eq!(release_year(&item_with_date(Some("1999-03-12"))), 1999);
    }

    #[test]
    fn test_release_year_missing() {
        assert_eq!(release_year(&item_with_date(None)), 0);
        assert_eq!(release_year(&item_with_date(Some("unknown"))), 0);
    }

    #[test]
    fn test_release_year_skips_short_runs() {
        // day/month runs are shorter than four digits
        assert_eq!(release_year(&item_with_date(Some("12/03/1999"))), 1999);
    }
}
