//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use tracing::{info, warn};

use super::actions::Action;
use super::state::{
    App, Focus, LIMIT_MESSAGE, NOT_FOUND_MESSAGE, SAVE_FAILED_MESSAGE, SearchState,
};
use crate::models::{NominateOutcome, annotate};
use crate::search::{SearchOutcome, trim_query};
use crate::storage::save_nominations;

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::FocusSearch => self.focus = Focus::Search,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::Input(c) => {
                if self.focus == Focus::Search {
                    self.input_buffer.push(c);
                }
            }
            Action::DeleteChar => {
                if self.focus == Focus::Search {
                    self.input_buffer.pop();
                }
            }

            Action::Submit => match self.focus {
                Focus::Search => {
                    let query = self.input_buffer.clone();
                    self.submit_search(&query);
                }
                Focus::Results => self.nominate_selected(),
                Focus::Nominations => self.remove_selected(),
            },
            Action::Nominate => self.nominate_selected(),
            Action::Remove => self.remove_selected(),

            Action::DismissAlert => self.alert.dismiss(),
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        let index = match self.focus {
            Focus::Results => &mut self.result_index,
            Focus::Nominations => &mut self.nomination_index,
            Focus::Search => return,
        };
        *index = index.saturating_sub(1);
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        let (index, len) = match self.focus {
            Focus::Results => (&mut self.result_index, self.search.results.len()),
            Focus::Nominations => (&mut self.nomination_index, self.nominations.len()),
            Focus::Search => return,
        };
        if *index + 1 < len {
            *index += 1;
        }
    }

    // ============ 搜索相关 ============

    /// 提交搜索；空查询不做任何事
    pub fn submit_search(&mut self, input: &str) {
        let Some(query) = trim_query(input) else {
            return;
        };
        self.pending_searches += 1;
        self.worker.submit(query);
    }

    /// 取出所有已完成的搜索并应用
    pub fn poll_searches(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.worker.try_recv() {
            self.apply_search_outcome(outcome);
            changed = true;
        }
        changed
    }

    /// 应用一次搜索结果；失败时只弹出提示，保留原结果
    pub fn apply_search_outcome(&mut self, outcome: SearchOutcome) {
        self.pending_searches = self.pending_searches.saturating_sub(1);
        match outcome.result {
            Ok(mut results) => {
                annotate(&mut results, &self.nominations);
                self.search = SearchState {
                    keyword: outcome.keyword,
                    results,
                };
                self.result_index = 0;
            }
            Err(err) => {
                warn!(query = %outcome.keyword, error = %err, "showing search failure");
                self.alert.show(NOT_FOUND_MESSAGE);
            }
        }
    }

    // ============ 提名相关 ============

    fn nominate_selected(&mut self) {
        if let Some(id) = self.selected_result().map(|m| m.imdb_id.clone()) {
            self.nominate(&id);
        }
    }

    fn remove_selected(&mut self) {
        if let Some(id) = self.selected_nomination().map(|n| n.imdb_id.clone()) {
            self.remove(&id);
        }
    }

    /// 提名搜索结果中的一部电影
    pub fn nominate(&mut self, imdb_id: &str) {
        if self.nominations.is_full() {
            self.alert.show(LIMIT_MESSAGE);
            return;
        }

        // 已提名的结果不可再次提名
        let Some(movie) = self
            .search
            .results
            .iter()
            .find(|m| m.imdb_id == imdb_id && !m.nominated)
            .cloned()
        else {
            return;
        };

        match self.nominations.push(movie) {
            NominateOutcome::Added => {
                info!(imdb_id, count = self.nominations.len(), "nominated");
                self.refresh_annotations();
                self.persist();
            }
            NominateOutcome::LimitReached => self.alert.show(LIMIT_MESSAGE),
            NominateOutcome::AlreadyNominated => {}
        }
    }

    /// 移除提名
    pub fn remove(&mut self, imdb_id: &str) {
        if self.nominations.remove(imdb_id).is_none() {
            return;
        }
        info!(imdb_id, count = self.nominations.len(), "nomination removed");
        self.refresh_annotations();
        self.clamp_selection();
        self.persist();
    }

    /// 重新计算搜索结果的提名标记
    pub fn refresh_annotations(&mut self) {
        annotate(&mut self.search.results, &self.nominations);
    }

    /// 每次修改后整体写入存储；写入失败不影响内存状态
    fn persist(&mut self) {
        if let Err(err) = save_nominations(self.storage.as_ref(), &self.nominations) {
            warn!(error = %err, "cannot save nominations");
            self.alert.show(SAVE_FAILED_MESSAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::error::StorageError;
    use crate::models::{MAX_NOMINATIONS, MovieSummary};
    use crate::search::stub::StubSearch;
    use crate::storage::{KeyValueStore, MemoryStore, NOMINATIONS_KEY, load_nominations};

    fn batman_results() -> Vec<MovieSummary> {
        (1..=8)
            .map(|i| {
                MovieSummary::new(
                    &format!("Batman {i}"),
                    &format!("19{}", 80 + i),
                    &format!("tt10{i}"),
                    "N/A",
                )
            })
            .collect()
    }

    fn app_with(storage: Box<dyn KeyValueStore>) -> App {
        App::new(
            Arc::new(StubSearch::with("batman", batman_results())),
            storage,
        )
    }

    fn app() -> App {
        app_with(Box::new(MemoryStore::new()))
    }

    /// 提交搜索并等待结果应用
    fn search(app: &mut App, query: &str) {
        app.submit_search(query);
        let outcome = app
            .worker
            .recv_timeout(Duration::from_secs(5))
            .expect("search outcome");
        app.apply_search_outcome(outcome);
    }

    fn stored(app: &App) -> usize {
        load_nominations(app.storage.as_ref()).len()
    }

    fn assert_flags_match_store(app: &App) {
        let titles = app.nominations.titles();
        for movie in &app.search.results {
            assert_eq!(movie.nominated, titles.contains(movie.title.as_str()));
        }
    }

    #[test]
    fn test_nomination_scenario() {
        let mut app = app();
        search(&mut app, "  batman ");
        assert_eq!(app.search.keyword, "batman");
        assert_eq!(app.search.results.len(), 8);
        assert!(!app.is_searching());

        app.nominate("tt101");
        assert_eq!(app.nominations.len(), 1);
        assert!(app.search.results[0].nominated);

        for id in ["tt102", "tt103", "tt104", "tt105"] {
            app.nominate(id);
        }
        assert_eq!(app.nominations.len(), MAX_NOMINATIONS);
        assert!(!app.alert.visible);

        app.nominate("tt106");
        assert!(app.alert.visible);
        assert_eq!(app.alert.message, LIMIT_MESSAGE);
        assert_eq!(app.nominations.len(), MAX_NOMINATIONS);
        assert!(!app.search.results[5].nominated);

        app.remove("tt103");
        assert_eq!(app.nominations.len(), 4);
        assert!(!app.search.results[2].nominated);
        assert_eq!(stored(&app), 4);
        assert_flags_match_store(&app);
    }

    #[test]
    fn test_poll_applies_in_completion_order() {
        let results = batman_results();
        let mut stub = StubSearch::with("slow", results[..2].to_vec())
            .delayed("slow", Duration::from_millis(100));
        stub.catalog.insert("fast".to_string(), results[2..].to_vec());
        let mut app = App::new(Arc::new(stub), Box::new(MemoryStore::new()));

        app.submit_search("slow");
        app.submit_search("fast");
        assert_eq!(app.pending_searches, 2);

        // 等两个请求都完成后再一次性取出，后完成的覆盖先完成的
        std::thread::sleep(Duration::from_secs(1));
        assert!(app.poll_searches());

        assert_eq!(app.pending_searches, 0);
        assert_eq!(app.search.keyword, "slow");
        assert_eq!(app.search.results.len(), 2);
        assert!(!app.poll_searches());
    }

    #[test]
    fn test_empty_query_is_noop() {
        let mut app = app();
        app.submit_search("   ");
        assert!(!app.is_searching());
        assert!(app.worker.recv_timeout(Duration::from_millis(50)).is_none());
        assert_eq!(app.search, SearchState::default());
    }

    #[test]
    fn test_failed_search_keeps_results() {
        let mut app = app();
        search(&mut app, "batman");
        search(&mut app, "nothing-matches");

        assert!(app.alert.visible);
        assert_eq!(app.alert.message, NOT_FOUND_MESSAGE);
        assert_eq!(app.search.keyword, "batman");
        assert_eq!(app.search.results.len(), 8);
    }

    #[test]
    fn test_search_annotates_from_restored_store() {
        let storage = MemoryStore::new();
        let mut list = crate::models::NominationList::new();
        list.push(MovieSummary::new("Batman 2", "1982", "tt-other", "N/A"));
        save_nominations(&storage, &list).unwrap();

        let mut app = app_with(Box::new(storage));
        assert_eq!(app.nominations.len(), 1);
        search(&mut app, "batman");
        assert!(app.search.results[1].nominated);
        assert_flags_match_store(&app);
    }

    #[test]
    fn test_nominate_ignores_unknown_and_duplicate() {
        let mut app = app();
        search(&mut app, "batman");
        app.nominate("tt101");
        app.nominate("tt101");
        app.nominate("tt999");
        assert_eq!(app.nominations.len(), 1);
        assert!(!app.alert.visible);
    }

    #[test]
    fn test_remove_not_in_results() {
        let mut app = app();
        search(&mut app, "batman");
        app.nominate("tt101");
        app.search.results.clear();

        app.remove("tt101");
        assert!(app.nominations.is_empty());
        assert_eq!(stored(&app), 0);
    }

    #[test]
    fn test_alert_is_single_slot() {
        let mut app = app();
        app.alert.show(NOT_FOUND_MESSAGE);
        app.alert.show(LIMIT_MESSAGE);
        assert_eq!(app.alert.message, LIMIT_MESSAGE);

        app.dispatch(Action::DismissAlert);
        assert!(!app.alert.visible);
        assert!(app.alert.message.is_empty());
    }

    #[test]
    fn test_dispatch_flow() {
        let mut app = app();
        for c in "batman".chars() {
            app.dispatch(Action::Input(c));
        }
        app.dispatch(Action::DeleteChar);
        app.dispatch(Action::Input('n'));
        app.dispatch(Action::Submit);
        assert!(app.is_searching());
        let outcome = app.worker.recv_timeout(Duration::from_secs(5)).unwrap();
        app.apply_search_outcome(outcome);

        app.dispatch(Action::FocusNext);
        assert_eq!(app.focus, Focus::Results);
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::Submit);
        assert_eq!(app.nominations.entries()[0].imdb_id, "tt102");

        // 列表焦点下输入不会修改搜索框
        app.dispatch(Action::Input('x'));
        assert_eq!(app.input_buffer, "batman");

        app.dispatch(Action::FocusNext);
        app.dispatch(Action::Remove);
        assert!(app.nominations.is_empty());
        assert_eq!(app.nomination_index, 0);
        assert!(app.dispatch(Action::Quit));
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = app();
        search(&mut app, "batman");
        app.focus = Focus::Results;
        for _ in 0..20 {
            app.move_down();
        }
        assert_eq!(app.result_index, 7);
        for _ in 0..20 {
            app.move_up();
        }
        assert_eq!(app.result_index, 0);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_save_failure_raises_alert() {
        let mut app = app_with(Box::new(FailingStore));
        search(&mut app, "batman");
        app.nominate("tt101");

        assert_eq!(app.nominations.len(), 1);
        assert!(app.alert.visible);
        assert_eq!(app.alert.message, SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn test_persisted_under_fixed_key() {
        let mut app = app();
        search(&mut app, "batman");
        app.nominate("tt104");
        let raw = app.storage.get_item(NOMINATIONS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"imdbID\":\"tt104\""));
    }
}
