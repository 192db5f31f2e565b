use std::fmt;

/// Characters that cannot appear in a document id.
const RESERVED: [char; 8] = ['/', ':', '?', '&', '=', '#', '%', '.'];

/// Longest document id, in bytes.
pub const MAX_KEY_LEN: usize = 500;

/// Document id derived from a canonical article URL.
///
/// Every reserved character is replaced by `_` and the result is cut to
/// [`MAX_KEY_LEN`] bytes on a character boundary. Existing documents were
/// written with this exact scheme, so it must not change.
///
/// | canonical URL | key |
/// |---|---|
/// | `https://n.news.naver.com/mnews/article/001/0014` | `https___n_news_naver_com_mnews_article_001_0014` |
/// | `https://finance.naver.com/news/read.naver?a=1&b=2#top` | `https___finance_naver_com_news_read_naver_a_1_b_2_top` |
/// | `100%` | `100_` |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn from_url(url: &str) -> Self {
        let mut key: String = url
            .chars()
            .map(|c| if RESERVED.contains(&c) { '_' } else { c })
            .collect();

        if key.len() > MAX_KEY_LEN {
            let mut end = MAX_KEY_LEN;
            while !key.is_char_boundary(end) {
                end -= 1;
            }
            key.truncate(end);
        }

        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
