// 数据模型模块
// 定义所有领域记录，序列化字段名与前端持久化 JSON 保持一致

use serde::{Deserialize, Serialize};

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// 街机游戏类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Sprint,
    Algebra,
    Sequence,
    Geometry,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Sprint => "sprint",
            GameKind::Algebra => "algebra",
            GameKind::Sequence => "sequence",
            GameKind::Geometry => "geometry",
        }
    }
}

/// 速算题运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "×")]
    Mul,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
        }
    }
}

/// 几何题图形种类，渲染层自行映射到对应的图形组件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Square,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
    Cube,
}

/// 数列中的一个槽位：具体数值或待填的 "?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceSlot {
    Value(i64),
    Gap(String),
}

impl SequenceSlot {
    pub fn gap() -> Self {
        SequenceSlot::Gap("?".to_string())
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, SequenceSlot::Gap(_))
    }
}

/// 题目数据结构（带判别字段的联合类型，每种游戏一个变体）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Problem {
    Sprint {
        num1: i64,
        num2: i64,
        operator: Operator,
        answer: i64,
    },
    Algebra {
        equation: String,
        answer: i64,
    },
    Sequence {
        sequence: Vec<SequenceSlot>,
        answer: i64,
    },
    Geometry {
        shape: ShapeKind,
        question: String,
        options: Vec<String>,
        answer: String,
    },
}

impl Problem {
    pub fn kind(&self) -> GameKind {
        match self {
            Problem::Sprint { .. } => GameKind::Sprint,
            Problem::Algebra { .. } => GameKind::Algebra,
            Problem::Sequence { .. } => GameKind::Sequence,
            Problem::Geometry { .. } => GameKind::Geometry,
        }
    }

    /// 判卷：数字类题目按整数比较，几何题按选项文本比较
    pub fn check_answer(&self, input: &str) -> bool {
        match self {
            Problem::Sprint { answer, .. }
            | Problem::Algebra { answer, .. }
            | Problem::Sequence { answer, .. } => {
                input.trim().parse::<i64>().map_or(false, |n| n == *answer)
            }
            Problem::Geometry { answer, .. } => input == answer.as_str(),
        }
    }

    /// 正确答案的展示文本
    pub fn answer_text(&self) -> String {
        match self {
            Problem::Sprint { answer, .. }
            | Problem::Algebra { answer, .. }
            | Problem::Sequence { answer, .. } => answer.to_string(),
            Problem::Geometry { answer, .. } => answer.clone(),
        }
    }
}

/// 每日挑战中的一道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeProblem {
    pub problem: Problem,
    pub difficulty: Difficulty,
}

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// 毫秒
    pub time: u64,
}

/// 单个主题的间隔复习数据
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SRSTopicData {
    /// 掌握强度 0-5（0 = 未复习，5 = 已掌握）
    pub strength: u8,
    /// 毫秒时间戳
    pub last_reviewed: i64,
    /// 毫秒时间戳
    pub next_review: i64,
}

/// 每周提醒设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    /// 星期名，如 "Monday"
    pub day: String,
    /// "HH:MM"
    pub time: String,
    pub is_enabled: bool,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            day: "Monday".to_string(),
            time: "17:00".to_string(),
            is_enabled: false,
        }
    }
}

/// 单局街机游戏统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    /// 百分比，保留一位小数
    pub accuracy: f64,
}

/// 某个（游戏, 难度）组合的最高分记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub high_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_game_stats: Option<GameStats>,
}

/// AI 测验的一道选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProblem {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// 测验单题判卷结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionResult {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// 测验判卷汇总，score 为 0-100 的整数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizGrade {
    pub score: u32,
    pub results: Vec<QuizQuestionResult>,
}

/// 数学主题（固定目录，图标由 UI 层维护）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathTopic {
    pub name: &'static str,
    pub description: &'static str,
}

/// 固定主题目录
pub const MATH_TOPICS: [MathTopic; 6] = [
    MathTopic {
        name: "Arithmetic",
        description: "Master the basics: addition, subtraction, multiplication, and division.",
    },
    MathTopic {
        name: "Algebra",
        description: "Solve for x, understand variables, and work with equations and functions.",
    },
    MathTopic {
        name: "Geometry",
        description: "Explore shapes, angles, and the properties of space and figures.",
    },
    MathTopic {
        name: "Trigonometry",
        description: "Learn about the relationships between angles and sides of triangles.",
    },
    MathTopic {
        name: "Pre-Calculus",
        description: "Prepare for calculus with advanced algebra and trigonometry concepts.",
    },
    MathTopic {
        name: "Calculus",
        description: "Dive into derivatives, integrals, and the study of continuous change.",
    },
];
