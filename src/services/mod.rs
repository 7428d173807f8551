// 服务模块
// 提供核心业务逻辑服务

pub mod daily_challenge;
pub mod generator;
pub mod high_scores;
pub mod profile;
pub mod reminder;
pub mod srs;
pub mod tutor;

pub use daily_challenge::{
    generate_problems_for_day,
    DailyChallengeService,
};

pub use generator::{
    generate_algebra_problem,
    generate_geometry_problem,
    generate_problem,
    generate_sequence_problem,
    generate_sprint_problem,
};

pub use high_scores::{
    game_stats,
    HighScoreService,
};

pub use profile::ProfileService;

pub use reminder::{
    next_reminder_timestamp,
    ReminderService,
};

pub use srs::SrsService;

pub use tutor::{
    grade_quiz,
    parse_quiz_response,
    practice_intro,
    TutorClient,
    TutorConfig,
    TutorMode,
    TutorPrompt,
};
