// 间隔复习服务模块
// 按测验成绩维护每个主题的掌握强度，并据此排期下一次复习

use crate::models::{MathTopic, SRSTopicData, MATH_TOPICS};
use crate::storage::{read_json, write_json, KeyValueStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const SRS_DATA_KEY: &str = "mathMentorSRSData";

/// 强度 0-5 对应的复习间隔，毫秒
const REVIEW_INTERVALS: [i64; 6] = [
    4 * 60 * 60 * 1000,      // 4 小时
    8 * 60 * 60 * 1000,      // 8 小时
    24 * 60 * 60 * 1000,     // 1 天
    3 * 24 * 60 * 60 * 1000, // 3 天
    7 * 24 * 60 * 60 * 1000, // 1 周
    14 * 24 * 60 * 60 * 1000, // 2 周
];

fn interval_for(strength: u8) -> i64 {
    REVIEW_INTERVALS
        .get(strength as usize)
        .copied()
        .unwrap_or(REVIEW_INTERVALS[0])
}

/// 间隔复习服务
pub struct SrsService {
    store: Arc<dyn KeyValueStore>,
}

impl SrsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 记录一次测验成绩并重新排期
    ///
    /// score >= 90 强度 +1（上限 5），score < 60 强度 -1（下限 0），
    /// 60-89 保持不变；lastReviewed 总是更新为当前时刻。
    pub fn record_performance(&self, topic_name: &str, score: u32) {
        self.record_performance_at(topic_name, score, Utc::now());
    }

    pub fn record_performance_at(&self, topic_name: &str, score: u32, now: DateTime<Utc>) {
        let mut data = self.data();
        let mut topic = data.get(topic_name).copied().unwrap_or(SRSTopicData {
            strength: 0,
            last_reviewed: 0,
            next_review: 0,
        });

        if score >= 90 {
            topic.strength = (topic.strength + 1).min(5);
        } else if score < 60 {
            topic.strength = topic.strength.saturating_sub(1);
        }

        let now_ms = now.timestamp_millis();
        topic.last_reviewed = now_ms;
        topic.next_review = now_ms + interval_for(topic.strength);

        data.insert(topic_name.to_string(), topic);
        self.save(&data);
    }

    /// 到期主题列表：nextReview 已过且在固定主题目录里
    ///
    /// 从未进过 SRS 的主题永远不会"到期"。
    pub fn topics_for_review(&self) -> Vec<MathTopic> {
        self.topics_for_review_at(Utc::now())
    }

    pub fn topics_for_review_at(&self, now: DateTime<Utc>) -> Vec<MathTopic> {
        let data = self.data();
        let now_ms = now.timestamp_millis();

        MATH_TOPICS
            .iter()
            .copied()
            .filter(|topic| {
                data.get(topic.name)
                    .map(|d| d.next_review <= now_ms)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// 复习会话开始时调用
    ///
    /// 已有记录则把 nextReview 乐观地推后一个当前强度的间隔（强度不变），
    /// 避免用户中途离开后主题立刻又出现在到期列表里；
    /// 没有记录则按平均成绩 75 引导建档。
    pub fn update_review_timestamp(&self, topic_name: &str) {
        self.update_review_timestamp_at(topic_name, Utc::now());
    }

    pub fn update_review_timestamp_at(&self, topic_name: &str, now: DateTime<Utc>) {
        let mut data = self.data();

        if let Some(topic) = data.get_mut(topic_name) {
            let now_ms = now.timestamp_millis();
            topic.last_reviewed = now_ms;
            topic.next_review = now_ms + interval_for(topic.strength);
            self.save(&data);
        } else {
            self.record_performance_at(topic_name, 75, now);
        }
    }

    /// 单个主题的 SRS 数据
    pub fn topic_data(&self, topic_name: &str) -> Option<SRSTopicData> {
        self.data().get(topic_name).copied()
    }

    fn data(&self) -> HashMap<String, SRSTopicData> {
        read_json(self.store.as_ref(), SRS_DATA_KEY).unwrap_or_default()
    }

    fn save(&self, data: &HashMap<String, SRSTopicData>) {
        write_json(self.store.as_ref(), SRS_DATA_KEY, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn service() -> SrsService {
        SrsService::new(Arc::new(MemoryStore::new()))
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_high_score_increments_strength() {
        let service = service();
        let now = noon();

        for expected in 1..=5u8 {
            service.record_performance_at("Algebra", 95, now);
            assert_eq!(service.topic_data("Algebra").unwrap().strength, expected);
        }

        // 已到上限，不再上升
        service.record_performance_at("Algebra", 100, now);
        assert_eq!(service.topic_data("Algebra").unwrap().strength, 5);
    }

    #[test]
    fn test_low_score_decrements_strength_to_floor() {
        let service = service();
        let now = noon();
        service.record_performance_at("Geometry", 95, now);
        assert_eq!(service.topic_data("Geometry").unwrap().strength, 1);

        service.record_performance_at("Geometry", 40, now);
        assert_eq!(service.topic_data("Geometry").unwrap().strength, 0);
        service.record_performance_at("Geometry", 0, now);
        assert_eq!(service.topic_data("Geometry").unwrap().strength, 0);
    }

    #[test]
    fn test_middling_score_keeps_strength() {
        let service = service();
        let now = noon();
        service.record_performance_at("Calculus", 95, now);
        service.record_performance_at("Calculus", 75, now);

        assert_eq!(service.topic_data("Calculus").unwrap().strength, 1);
    }

    #[test]
    fn test_interval_matches_resulting_strength() {
        let service = service();
        let now = noon();

        // 强度 3 起步，95 分升到 4，间隔一周
        for _ in 0..3 {
            service.record_performance_at("Algebra", 95, now);
        }
        service.record_performance_at("Algebra", 95, now);

        let data = service.topic_data("Algebra").unwrap();
        assert_eq!(data.strength, 4);
        assert_eq!(data.last_reviewed, now.timestamp_millis());
        assert_eq!(data.next_review - data.last_reviewed, 7 * DAY_MS);
    }

    #[test]
    fn test_interval_table_per_strength() {
        let expected = [
            4 * 60 * 60 * 1000,
            8 * 60 * 60 * 1000,
            DAY_MS,
            3 * DAY_MS,
            7 * DAY_MS,
            14 * DAY_MS,
        ];
        for (strength, interval) in expected.iter().enumerate() {
            assert_eq!(interval_for(strength as u8), *interval);
        }
        // 越界强度退回最短间隔
        assert_eq!(interval_for(9), expected[0]);
    }

    #[test]
    fn test_topics_for_review_only_due_catalog_topics() {
        let service = service();
        let now = noon();

        service.record_performance_at("Algebra", 75, now);
        service.record_performance_at("Geometry", 75, now);
        // 不在目录里的主题即使到期也不返回
        service.record_performance_at("Knot Theory", 75, now);

        let before_due = service.topics_for_review_at(now + chrono::Duration::hours(1));
        assert!(before_due.is_empty());

        let after_due = service.topics_for_review_at(now + chrono::Duration::hours(5));
        let names: Vec<&str> = after_due.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Algebra", "Geometry"]);
    }

    #[test]
    fn test_unseen_topics_are_never_due() {
        let service = service();
        assert!(service.topics_for_review_at(noon()).is_empty());
    }

    #[test]
    fn test_review_start_pushes_next_review_without_strength_change() {
        let service = service();
        let now = noon();
        for _ in 0..2 {
            service.record_performance_at("Algebra", 95, now);
        }
        let before = service.topic_data("Algebra").unwrap();
        assert_eq!(before.strength, 2);

        let later = now + chrono::Duration::hours(30);
        service.update_review_timestamp_at("Algebra", later);

        let after = service.topic_data("Algebra").unwrap();
        assert_eq!(after.strength, 2);
        assert_eq!(after.last_reviewed, later.timestamp_millis());
        assert_eq!(after.next_review - after.last_reviewed, DAY_MS);
    }

    #[test]
    fn test_review_start_bootstraps_unknown_topic() {
        let service = service();
        let now = noon();

        service.update_review_timestamp_at("Trigonometry", now);

        let data = service.topic_data("Trigonometry").unwrap();
        // 假定 75 分：强度保持初始 0，间隔 4 小时
        assert_eq!(data.strength, 0);
        assert_eq!(data.next_review - data.last_reviewed, 4 * 60 * 60 * 1000);
    }
}
