//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    FocusSearch,
    MoveSelectionUp,
    MoveSelectionDown,

    // 搜索框
    Input(char), // 输入字符
    DeleteChar,  // Backspace
    Submit,      // Enter

    // 列表操作
    Nominate,
    Remove,

    DismissAlert,
}
