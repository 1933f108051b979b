//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::sync::Arc;

use crate::models::{MovieSummary, Nomination, NominationList};
use crate::search::{MovieSearch, SearchWorker};
use crate::storage::{KeyValueStore, load_nominations};

/// 搜索失败时的提示
pub const NOT_FOUND_MESSAGE: &str = "Not found, please try another one.";
/// 提名已满时的提示
pub const LIMIT_MESSAGE: &str = "You already have 5 nominees!";
/// 保存失败时的提示
pub const SAVE_FAILED_MESSAGE: &str = "Could not save nominations.";

/// 当前展示的搜索结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub keyword: String,
    pub results: Vec<MovieSummary>,
}

/// 单槽提示条：新提示覆盖旧提示，关闭后清空
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertState {
    pub visible: bool,
    pub message: String,
}

impl AlertState {
    pub fn show(&mut self, message: &str) {
        self.visible = true;
        self.message = message.to_string();
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.message.clear();
    }
}

/// 焦点所在区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    Results,
    Nominations,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Nominations,
            Focus::Nominations => Focus::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::Nominations,
            Focus::Results => Focus::Search,
            Focus::Nominations => Focus::Results,
        }
    }
}

/// 应用状态
pub struct App {
    pub search: SearchState,
    pub nominations: NominationList,
    pub alert: AlertState,
    pub focus: Focus,
    pub input_buffer: String,
    pub result_index: usize,
    pub nomination_index: usize,
    pub pending_searches: usize,
    pub(super) worker: SearchWorker,
    pub(super) storage: Box<dyn KeyValueStore>,
}

impl App {
    /// 创建新的应用实例，提名列表从存储中恢复
    pub fn new(search: Arc<dyn MovieSearch>, storage: Box<dyn KeyValueStore>) -> Self {
        let nominations = load_nominations(storage.as_ref());
        Self {
            search: SearchState::default(),
            nominations,
            alert: AlertState::default(),
            focus: Focus::Search,
            input_buffer: String::new(),
            result_index: 0,
            nomination_index: 0,
            pending_searches: 0,
            worker: SearchWorker::new(search),
            storage,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.pending_searches > 0
    }

    /// 获取当前选中的搜索结果
    pub fn selected_result(&self) -> Option<&MovieSummary> {
        self.search.results.get(self.result_index)
    }

    /// 获取当前选中的提名
    pub fn selected_nomination(&self) -> Option<&Nomination> {
        self.nominations.entries().get(self.nomination_index)
    }

    /// 确保选中索引有效
    pub fn clamp_selection(&mut self) {
        self.result_index = clamp_index(self.result_index, self.search.results.len());
        self.nomination_index = clamp_index(self.nomination_index, self.nominations.len());
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}
