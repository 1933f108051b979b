//! 布局辅助函数

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 主界面各区域
pub struct MainLayout {
    pub header: Rect,
    pub search: Rect,
    pub alert: Option<Rect>,
    pub results: Rect,
    pub nominations: Rect,
    pub help: Rect,
}

/// 计算主界面布局；提示条只在可见时占位
pub fn main_layout(area: Rect, alert_visible: bool) -> MainLayout {
    let alert_height = if alert_visible { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // 标题
            Constraint::Length(3),            // 搜索框
            Constraint::Length(alert_height), // 提示条
            Constraint::Min(6),               // 列表
            Constraint::Length(3),            // 帮助
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[3]);

    MainLayout {
        header: rows[0],
        search: rows[1],
        alert: alert_visible.then_some(rows[2]),
        results: columns[0],
        nominations: columns[1],
        help: rows[4],
    }
}
