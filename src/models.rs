use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 提名上限
pub const MAX_NOMINATIONS: usize = 5;

/// 电影摘要（字段名沿用 OMDb 的 JSON 格式，持久化时也使用同样的形状）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    #[serde(default)]
    pub nominated: bool,
}

impl MovieSummary {
    #[cfg(test)]
    pub fn new(title: &str, year: &str, imdb_id: &str, poster_url: &str) -> Self {
        Self {
            title: title.to_string(),
            year: year.to_string(),
            imdb_id: imdb_id.to_string(),
            kind: None,
            poster_url: poster_url.to_string(),
            nominated: false,
        }
    }

    /// 列表中显示的名称，例如 `Batman Begins (2005)`
    pub fn label(&self) -> String {
        if self.year.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.year)
        }
    }

    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty() && self.poster_url != "N/A"
    }
}

/// 提名记录，与 [`MovieSummary`] 同形，`nominated` 恒为 true
pub type Nomination = MovieSummary;

/// 提名添加的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NominateOutcome {
    Added,
    LimitReached,
    AlreadyNominated,
}

/// 提名列表（有序，最多 [`MAX_NOMINATIONS`] 项）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NominationList {
    entries: Vec<Nomination>,
}

impl NominationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化数据构建；超出上限的部分被丢弃
    pub fn from_entries(entries: Vec<Nomination>) -> Self {
        let mut list = Self::new();
        for entry in entries {
            if list.is_full() {
                break;
            }
            list.push(entry);
        }
        list
    }

    pub fn entries(&self) -> &[Nomination] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_NOMINATIONS
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.entries.iter().any(|n| n.imdb_id == imdb_id)
    }

    /// 当前所有提名的标题集合
    pub fn titles(&self) -> HashSet<&str> {
        self.entries.iter().map(|n| n.title.as_str()).collect()
    }

    /// 追加一条提名（复制并标记为已提名）
    pub fn push(&mut self, movie: MovieSummary) -> NominateOutcome {
        if self.is_full() {
            return NominateOutcome::LimitReached;
        }
        if self.contains(&movie.imdb_id) {
            return NominateOutcome::AlreadyNominated;
        }
        self.entries.push(Nomination {
            nominated: true,
            ..movie
        });
        NominateOutcome::Added
    }

    /// 按 imdbID 移除，返回被移除的记录
    pub fn remove(&mut self, imdb_id: &str) -> Option<Nomination> {
        let index = self.entries.iter().position(|n| n.imdb_id == imdb_id)?;
        Some(self.entries.remove(index))
    }
}

/// 根据提名列表重新计算搜索结果的 `nominated` 标记（按标题匹配）
pub fn annotate(results: &mut [MovieSummary], nominations: &NominationList) {
    let titles = nominations.titles();
    for movie in results.iter_mut() {
        movie.nominated = titles.contains(movie.title.as_str());
    }
}
