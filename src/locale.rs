//! Learner-facing strings that are not part of the layout.

/// Shown on the error screen when a batch could not be generated.
pub const GENERATION_FAILED: &str = "AI 老师出题失败了，请检查网络或刷新重试。";

/// Used when the explanation request fails outright.
pub const EXPLANATION_UNAVAILABLE: &str = "抱歉，AI 老师暂时无法提供详细解析。";

/// Used when the explanation request succeeds but carries no text.
pub const EXPLANATION_EMPTY: &str = "解析生成失败。";

/// Ordered from the lowest accuracy band to the highest.
pub const ENCOURAGEMENT_PHRASES: [&str; 5] = [
    "Every mistake is a lesson. Keep going! / 每个错误都是一次学习，继续加油！",
    "Good effort! Review the rules and try again. / 不错的尝试！复习一下规则再来一次吧。",
    "You're getting there! / 渐入佳境，继续保持！",
    "Great job, almost perfect! / 干得漂亮，接近完美！",
    "Outstanding! You're a grammar master! / 太棒了！你是语法大师！",
];
