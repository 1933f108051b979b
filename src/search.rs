//! 电影搜索
//!
//! `MovieSearch` 是外部搜索服务的接缝；`OmdbClient` 通过 HTTP 实现它，
//! `SearchWorker` 在后台线程里执行单次搜索并通过 channel 回传结果

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SearchError;
use crate::models::MovieSummary;

pub const DEFAULT_ENDPOINT: &str = "https://www.omdbapi.com/";

/// 搜索类型过滤
const TYPE_FILTER: &str = "movie";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 搜索服务
pub trait MovieSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SearchError>;
}

/// 去掉首尾空白；空查询返回 None
pub fn trim_query(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// OMDb 搜索响应
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search")]
    search: Option<Vec<MovieSummary>>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl SearchResponse {
    fn into_results(self) -> Result<Vec<MovieSummary>, SearchError> {
        // "Response" 为 "False" 或缺少 Search 数组都视为未找到
        match self.search {
            Some(results) if self.response.eq_ignore_ascii_case("true") => Ok(results
                .into_iter()
                .map(|movie| MovieSummary {
                    nominated: false,
                    ..movie
                })
                .collect()),
            _ => Err(SearchError::NotFound(
                self.error.unwrap_or_else(|| "Movie not found!".to_string()),
            )),
        }
    }
}

/// 解析 OMDb 响应体
pub fn parse_response(body: &str) -> Result<Vec<MovieSummary>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    response.into_results()
}

/// OMDb HTTP 客户端
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl MovieSearch for OmdbClient {
    fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("type", TYPE_FILTER),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_response(&body)
    }
}

/// 一次搜索的结果
#[derive(Debug)]
pub struct SearchOutcome {
    pub keyword: String,
    pub result: Result<Vec<MovieSummary>, SearchError>,
}

/// 后台搜索：每个请求一个短生命周期线程，不取消、不去重，按完成顺序回传
pub struct SearchWorker {
    search: Arc<dyn MovieSearch>,
    tx: Sender<SearchOutcome>,
    rx: Receiver<SearchOutcome>,
}

impl SearchWorker {
    pub fn new(search: Arc<dyn MovieSearch>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { search, tx, rx }
    }

    /// 提交一次搜索（发出即返回）
    pub fn submit(&self, keyword: String) {
        let search = Arc::clone(&self.search);
        let tx = self.tx.clone();
        info!(query = %keyword, "search submitted");

        thread::spawn(move || {
            let result = search.search(&keyword);
            match &result {
                Ok(results) => info!(query = %keyword, count = results.len(), "search completed"),
                Err(err) => warn!(query = %keyword, error = %err, "search failed"),
            }
            // 接收端已关闭说明程序正在退出
            let _ = tx.send(SearchOutcome { keyword, result });
        });
    }

    /// 取出一个已完成的结果（非阻塞）
    pub fn try_recv(&self) -> Option<SearchOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// 阻塞等待一个结果
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SearchOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
pub mod stub {
    use std::collections::HashMap;

    use super::*;

    /// 内存中的搜索服务
    #[derive(Debug, Default)]
    pub struct StubSearch {
        pub catalog: HashMap<String, Vec<MovieSummary>>,
        pub delays: HashMap<String, Duration>,
    }

    impl StubSearch {
        pub fn with(query: &str, results: Vec<MovieSummary>) -> Self {
            let mut catalog = HashMap::new();
            catalog.insert(query.to_string(), results);
            Self {
                catalog,
                delays: HashMap::new(),
            }
        }

        /// 为某个查询增加响应延迟
        pub fn delayed(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }
    }

    impl MovieSearch for StubSearch {
        fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SearchError> {
            if let Some(delay) = self.delays.get(query) {
                thread::sleep(*delay);
            }
            self.catalog
                .get(query)
                .cloned()
                .ok_or_else(|| SearchError::NotFound("Movie not found!".to_string()))
        }
    }
}
