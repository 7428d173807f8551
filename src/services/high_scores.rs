// 街机最高分服务模块
// 按（游戏, 难度）组合记录最高分与最近一局统计

use crate::models::{Difficulty, GameKind, GameStats, HighScoreEntry};
use crate::storage::{read_json, write_json, KeyValueStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const HIGH_SCORES_KEY: &str = "mathMentorHighScores";

/// 由对错计数折算一局统计；准确率保留一位小数，空局记 100
pub fn game_stats(correct: u32, incorrect: u32) -> GameStats {
    let total = correct + incorrect;
    let accuracy = if total > 0 {
        (correct as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        100.0
    };

    GameStats {
        correct,
        incorrect,
        total,
        accuracy,
    }
}

/// 最高分服务
pub struct HighScoreService {
    store: Arc<dyn KeyValueStore>,
}

impl HighScoreService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 全部最高分记录
    ///
    /// 兼容历史格式：值为裸数字的条目迁移成只带 highScore 的记录。
    pub fn high_scores(&self) -> HashMap<String, HighScoreEntry> {
        let Some(Value::Object(stored)) = read_json::<Value>(self.store.as_ref(), HIGH_SCORES_KEY)
        else {
            return HashMap::new();
        };

        let mut scores = HashMap::new();
        for (key, value) in stored {
            match value {
                Value::Number(n) => {
                    if let Some(high_score) = n.as_u64() {
                        scores.insert(
                            key,
                            HighScoreEntry {
                                high_score: high_score as u32,
                                last_game_stats: None,
                            },
                        );
                    }
                }
                other => {
                    if let Ok(entry) = serde_json::from_value::<HighScoreEntry>(other) {
                        scores.insert(key, entry);
                    }
                }
            }
        }
        scores
    }

    /// 某个组合的记录
    pub fn entry(&self, game: GameKind, difficulty: Difficulty) -> Option<HighScoreEntry> {
        self.high_scores().remove(&score_key(game, difficulty))
    }

    /// 记录一局结果，返回是否刷新了最高分
    pub fn record_game_result(
        &self,
        game: GameKind,
        difficulty: Difficulty,
        score: u32,
        stats: GameStats,
    ) -> bool {
        let key = score_key(game, difficulty);
        let mut scores = self.high_scores();

        let current_high = scores.get(&key).map(|e| e.high_score).unwrap_or(0);
        let is_new_high = score > current_high;

        scores.insert(
            key,
            HighScoreEntry {
                high_score: current_high.max(score),
                last_game_stats: Some(stats),
            },
        );
        write_json(self.store.as_ref(), HIGH_SCORES_KEY, &scores);
        is_new_high
    }
}

fn score_key(game: GameKind, difficulty: Difficulty) -> String {
    format!("{}-{}", game.as_str(), difficulty.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> (HighScoreService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (HighScoreService::new(store.clone()), store)
    }

    #[test]
    fn test_first_result_sets_high_score() {
        let (service, _) = service();
        let stats = game_stats(8, 2);

        assert!(service.record_game_result(GameKind::Sprint, Difficulty::Easy, 8, stats));

        let entry = service.entry(GameKind::Sprint, Difficulty::Easy).unwrap();
        assert_eq!(entry.high_score, 8);
        assert_eq!(entry.last_game_stats.unwrap().total, 10);
    }

    #[test]
    fn test_lower_score_keeps_high_score_but_updates_stats() {
        let (service, _) = service();
        service.record_game_result(GameKind::Algebra, Difficulty::Hard, 10, game_stats(10, 0));

        let is_new = service.record_game_result(
            GameKind::Algebra,
            Difficulty::Hard,
            4,
            game_stats(4, 6),
        );
        assert!(!is_new);

        let entry = service.entry(GameKind::Algebra, Difficulty::Hard).unwrap();
        assert_eq!(entry.high_score, 10);
        assert_eq!(entry.last_game_stats.unwrap().correct, 4);
    }

    #[test]
    fn test_legacy_numeric_entries_migrate() {
        let (service, store) = service();
        store
            .set(HIGH_SCORES_KEY, r#"{"sprint-Easy":12,"algebra-Medium":{"highScore":5}}"#)
            .unwrap();

        let scores = service.high_scores();
        assert_eq!(scores["sprint-Easy"].high_score, 12);
        assert_eq!(scores["sprint-Easy"].last_game_stats, None);
        assert_eq!(scores["algebra-Medium"].high_score, 5);
    }

    #[test]
    fn test_keys_are_game_dash_difficulty() {
        let (service, store) = service();
        service.record_game_result(GameKind::Geometry, Difficulty::Medium, 3, game_stats(3, 0));

        let raw = store.get(HIGH_SCORES_KEY).unwrap().unwrap();
        assert!(raw.contains("geometry-Medium"));
    }

    #[test]
    fn test_accuracy_rounds_to_one_decimal() {
        assert_eq!(game_stats(2, 1).accuracy, 66.7);
        assert_eq!(game_stats(1, 2).accuracy, 33.3);
        assert_eq!(game_stats(0, 0).accuracy, 100.0);
        assert_eq!(game_stats(5, 0).accuracy, 100.0);
    }
}
