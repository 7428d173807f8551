// 每日挑战服务模块
// 按日期播种的五题挑战、当日排行榜与完成状态追踪

use crate::models::{DailyChallengeProblem, Difficulty, LeaderboardEntry};
use crate::services::generator::{
    generate_algebra_problem, generate_geometry_problem, generate_sequence_problem,
    generate_sprint_problem,
};
use crate::storage::{read_json, write_json, KeyValueStore};
use crate::utils::{date_string, yesterday_date_string, RandomSource, SeededRng};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const CHALLENGE_KEY_PREFIX: &str = "dailyChallenge_";
const LEADERBOARD_KEY_PREFIX: &str = "dailyChallengeLeaderboard_";
const COMPLETION_KEY: &str = "dailyChallengeCompletion";
const LEADERBOARD_CAP: usize = 10;

/// 为指定日期生成固定编排的五道题
///
/// 编排：Easy 速算、Easy 代数、Medium 数列、Medium 几何，
/// 最后一抽 > 0.5 出 Hard 代数，否则出 Hard 速算。
/// 所有抽取共享同一个以日期串播种的随机流。
pub fn generate_problems_for_day(date: &str) -> Vec<DailyChallengeProblem> {
    let mut rng = SeededRng::new(date);
    let mut problems = Vec::with_capacity(5);

    problems.push(DailyChallengeProblem {
        problem: generate_sprint_problem(Difficulty::Easy, &mut rng),
        difficulty: Difficulty::Easy,
    });
    problems.push(DailyChallengeProblem {
        problem: generate_algebra_problem(Difficulty::Easy, &mut rng),
        difficulty: Difficulty::Easy,
    });
    problems.push(DailyChallengeProblem {
        problem: generate_sequence_problem(Difficulty::Medium, &mut rng),
        difficulty: Difficulty::Medium,
    });
    problems.push(DailyChallengeProblem {
        problem: generate_geometry_problem(Difficulty::Medium, &mut rng),
        difficulty: Difficulty::Medium,
    });

    let hard_problem = if rng.next() > 0.5 {
        generate_algebra_problem(Difficulty::Hard, &mut rng)
    } else {
        generate_sprint_problem(Difficulty::Hard, &mut rng)
    };
    problems.push(DailyChallengeProblem {
        problem: hard_problem,
        difficulty: Difficulty::Hard,
    });

    problems
}

/// 每日挑战服务
pub struct DailyChallengeService {
    store: Arc<dyn KeyValueStore>,
}

impl DailyChallengeService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 获取今天的挑战；同一天内多次调用返回同一套题
    pub fn daily_challenge(&self) -> Vec<DailyChallengeProblem> {
        self.daily_challenge_at(Utc::now())
    }

    pub fn daily_challenge_at(&self, now: DateTime<Utc>) -> Vec<DailyChallengeProblem> {
        let today = date_string(now);
        let key = format!("{}{}", CHALLENGE_KEY_PREFIX, today);

        if let Some(stored) = read_json::<Vec<DailyChallengeProblem>>(self.store.as_ref(), &key) {
            return stored;
        }

        // 只保留当天一份挑战数据
        self.purge_dated_keys(CHALLENGE_KEY_PREFIX, &today);

        let problems = generate_problems_for_day(&today);
        write_json(self.store.as_ref(), &key, &problems);
        problems
    }

    /// 当天排行榜；没有则返回空并趁机清掉旧日期的榜单
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard_at(Utc::now())
    }

    pub fn leaderboard_at(&self, now: DateTime<Utc>) -> Vec<LeaderboardEntry> {
        let today = date_string(now);
        let key = format!("{}{}", LEADERBOARD_KEY_PREFIX, today);

        if let Some(stored) = read_json::<Vec<LeaderboardEntry>>(self.store.as_ref(), &key) {
            return stored;
        }

        self.purge_dated_keys(LEADERBOARD_KEY_PREFIX, &today);
        Vec::new()
    }

    /// 提交成绩：按（分数降序，用时升序）排序并截断到前十后持久化
    ///
    /// 即使写入失败也返回合并后的榜单。
    pub fn save_score(&self, name: &str, score: u32, time: u64) -> Vec<LeaderboardEntry> {
        self.save_score_at(name, score, time, Utc::now())
    }

    pub fn save_score_at(
        &self,
        name: &str,
        score: u32,
        time: u64,
        now: DateTime<Utc>,
    ) -> Vec<LeaderboardEntry> {
        let today = date_string(now);
        let key = format!("{}{}", LEADERBOARD_KEY_PREFIX, today);

        let mut leaderboard = self.leaderboard_at(now);
        leaderboard.push(LeaderboardEntry {
            name: name.to_string(),
            score,
            time,
        });
        leaderboard.sort_by(|a, b| b.score.cmp(&a.score).then(a.time.cmp(&b.time)));
        leaderboard.truncate(LEADERBOARD_CAP);

        write_json(self.store.as_ref(), &key, &leaderboard);
        leaderboard
    }

    /// 查询用户今天是否已完成挑战
    pub fn completion_status(&self, user: &str) -> bool {
        self.completion_status_at(user, Utc::now())
    }

    pub fn completion_status_at(&self, user: &str, now: DateTime<Utc>) -> bool {
        let today = date_string(now);
        self.completion_data()
            .get(&today)
            .and_then(|users| users.get(user))
            .copied()
            .unwrap_or(false)
    }

    /// 标记用户今天已完成；每次写入顺手删掉昨天那一条
    pub fn mark_completed(&self, user: &str) {
        self.mark_completed_at(user, Utc::now());
    }

    pub fn mark_completed_at(&self, user: &str, now: DateTime<Utc>) {
        let today = date_string(now);
        let mut data = self.completion_data();

        data.entry(today).or_default().insert(user.to_string(), true);
        data.remove(&yesterday_date_string(now));

        write_json(self.store.as_ref(), COMPLETION_KEY, &data);
    }

    fn completion_data(&self) -> HashMap<String, HashMap<String, bool>> {
        read_json(self.store.as_ref(), COMPLETION_KEY).unwrap_or_default()
    }

    /// 删除带日期后缀的旧键，日期逐个显式比较
    fn purge_dated_keys(&self, prefix: &str, keep_date: &str) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(err) => {
                log::warn!("failed to enumerate stored keys: {}", err);
                return;
            }
        };

        for key in keys {
            if let Some(date) = key.strip_prefix(prefix) {
                if date != keep_date {
                    if let Err(err) = self.store.remove(&key) {
                        log::warn!("failed to remove stale key {}: {}", key, err);
                    }
                }
            }
        }
    }
}
