//! 数学导师应用核心
//! 每日挑战、街机题目生成、间隔复习与提醒排期，全部经由注入的键值存储持久化

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::{
    DailyChallengeProblem,
    Difficulty,
    GameKind,
    GameStats,
    HighScoreEntry,
    LeaderboardEntry,
    MathTopic,
    Operator,
    Problem,
    QuizGrade,
    QuizProblem,
    QuizQuestionResult,
    ReminderSettings,
    SRSTopicData,
    SequenceSlot,
    ShapeKind,
    MATH_TOPICS,
};

pub use services::{
    game_stats,
    generate_algebra_problem,
    generate_geometry_problem,
    generate_problem,
    generate_problems_for_day,
    generate_sequence_problem,
    generate_sprint_problem,
    grade_quiz,
    next_reminder_timestamp,
    parse_quiz_response,
    practice_intro,
    DailyChallengeService,
    HighScoreService,
    ProfileService,
    ReminderService,
    SrsService,
    TutorClient,
    TutorConfig,
    TutorMode,
    TutorPrompt,
};

pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

pub use utils::{EntropyRng, RandomSource, SeededRng};
