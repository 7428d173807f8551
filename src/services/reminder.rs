// 提醒排期服务模块
// 计算每周提醒的下一次触发时刻，并维护持久化的提醒状态

use crate::models::ReminderSettings;
use crate::storage::{read_json, write_json, KeyValueStore};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use std::sync::Arc;

const REMINDER_SETTINGS_KEY: &str = "mathMentorReminderSettings";
const NEXT_REMINDER_TIMESTAMP_KEY: &str = "mathMentorNextReminder";

/// 星期名 → 以周日为 0 的下标
fn day_index(day: &str) -> Option<i64> {
    let index = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ]
    .iter()
    .position(|name| *name == day)?;
    Some(index as i64)
}

/// 下一次提醒时刻：最近一个匹配 settings.day + settings.time 的未来时点
///
/// 本周目标时点已过则恰好顺延 7 天。对时区泛化，调用方决定
/// 按 UTC 还是本地时间解释设置。
pub fn next_reminder_timestamp<Tz: TimeZone>(
    settings: &ReminderSettings,
    now: DateTime<Tz>,
) -> Result<DateTime<Tz>> {
    let target_day =
        day_index(&settings.day).ok_or_else(|| anyhow!("unknown weekday: {}", settings.day))?;
    let target_time = NaiveTime::parse_from_str(&settings.time, "%H:%M")
        .with_context(|| format!("invalid reminder time: {}", settings.time))?;

    let now_day = now.weekday().num_days_from_sunday() as i64;
    let days_ahead = (target_day - now_day + 7) % 7;

    let tz = now.timezone();
    let naive = (now.date_naive() + Duration::days(days_ahead)).and_time(target_time);
    let candidate = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("no valid local time for {}", naive))?;

    if candidate < now {
        let next_week = tz
            .from_local_datetime(&(naive + Duration::days(7)))
            .earliest()
            .ok_or_else(|| anyhow!("no valid local time for {}", naive))?;
        Ok(next_week)
    } else {
        Ok(candidate)
    }
}

/// 提醒服务（UTC 语义）
pub struct ReminderService {
    store: Arc<dyn KeyValueStore>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 当前设置；没有或损坏时退回默认值
    pub fn settings(&self) -> ReminderSettings {
        read_json(self.store.as_ref(), REMINDER_SETTINGS_KEY).unwrap_or_default()
    }

    /// 启用提醒并安排下一次触发
    pub fn set_reminder(&self, day: &str, time: &str) -> ReminderSettings {
        self.set_reminder_at(day, time, Utc::now())
    }

    pub fn set_reminder_at(&self, day: &str, time: &str, now: DateTime<Utc>) -> ReminderSettings {
        let settings = ReminderSettings {
            day: day.to_string(),
            time: time.to_string(),
            is_enabled: true,
        };
        write_json(self.store.as_ref(), REMINDER_SETTINGS_KEY, &settings);
        self.arm(&settings, now);
        settings
    }

    /// 关闭提醒并移除已排期的时间戳
    pub fn clear_reminder(&self) -> ReminderSettings {
        let settings = ReminderSettings {
            is_enabled: false,
            ..self.settings()
        };
        write_json(self.store.as_ref(), REMINDER_SETTINGS_KEY, &settings);
        if let Err(err) = self.store.remove(NEXT_REMINDER_TIMESTAMP_KEY) {
            log::warn!("failed to remove reminder timestamp: {}", err);
        }
        settings
    }

    /// 已排期的下一次提醒，毫秒时间戳；缺失即提醒未启用
    pub fn next_reminder(&self) -> Option<i64> {
        match self.store.get(NEXT_REMINDER_TIMESTAMP_KEY) {
            Ok(raw) => raw.and_then(|s| s.parse::<i64>().ok()),
            Err(err) => {
                log::warn!("failed to read reminder timestamp: {}", err);
                None
            }
        }
    }

    /// 当前时刻是否已到提醒时间
    pub fn is_due(&self) -> bool {
        self.is_due_at(Utc::now())
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.next_reminder()
            .map(|ts| now.timestamp_millis() >= ts)
            .unwrap_or(false)
    }

    /// 用户关掉提醒弹窗后重新排期，保持每周节奏
    pub fn dismiss(&self) {
        self.dismiss_at(Utc::now());
    }

    pub fn dismiss_at(&self, now: DateTime<Utc>) {
        let settings = self.settings();
        self.arm(&settings, now);
    }

    fn arm(&self, settings: &ReminderSettings, now: DateTime<Utc>) {
        match next_reminder_timestamp(settings, now) {
            Ok(next) => {
                let ms = next.timestamp_millis().to_string();
                if let Err(err) = self.store.set(NEXT_REMINDER_TIMESTAMP_KEY, &ms) {
                    log::error!("failed to persist reminder timestamp: {}", err);
                }
            }
            Err(err) => {
                log::warn!("cannot schedule reminder: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn monday_9() -> ReminderSettings {
        ReminderSettings {
            day: "Monday".to_string(),
            time: "09:00".to_string(),
            is_enabled: true,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    // 2024-01-01 是周一

    #[test]
    fn test_reminder_on_a_tuesday_targets_next_monday() {
        let now = utc(2024, 1, 2, 10, 0);
        let next = next_reminder_timestamp(&monday_9(), now).unwrap();

        assert_eq!(next, utc(2024, 1, 8, 9, 0));
    }

    #[test]
    fn test_reminder_same_day_before_target_fires_today() {
        let now = utc(2024, 1, 1, 8, 0);
        let next = next_reminder_timestamp(&monday_9(), now).unwrap();

        assert_eq!(next, utc(2024, 1, 1, 9, 0));
    }

    #[test]
    fn test_reminder_same_day_after_target_rolls_a_week() {
        let now = utc(2024, 1, 1, 10, 0);
        let next = next_reminder_timestamp(&monday_9(), now).unwrap();

        assert_eq!(next, utc(2024, 1, 8, 9, 0));
    }

    #[test]
    fn test_sunday_wraps_around_the_week() {
        let settings = ReminderSettings {
            day: "Sunday".to_string(),
            time: "17:00".to_string(),
            is_enabled: true,
        };
        let now = utc(2024, 1, 1, 12, 0);
        let next = next_reminder_timestamp(&settings, now).unwrap();

        assert_eq!(next, utc(2024, 1, 7, 17, 0));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let now = utc(2024, 1, 1, 12, 0);

        let bad_day = ReminderSettings {
            day: "Moonday".to_string(),
            ..monday_9()
        };
        assert!(next_reminder_timestamp(&bad_day, now).is_err());

        let bad_time = ReminderSettings {
            time: "9 o'clock".to_string(),
            ..monday_9()
        };
        assert!(next_reminder_timestamp(&bad_time, now).is_err());
    }

    #[test]
    fn test_set_reminder_persists_settings_and_timestamp() {
        let service = ReminderService::new(Arc::new(MemoryStore::new()));
        let now = utc(2024, 1, 2, 10, 0);

        let settings = service.set_reminder_at("Monday", "09:00", now);
        assert!(settings.is_enabled);
        assert_eq!(service.settings(), settings);
        assert_eq!(
            service.next_reminder(),
            Some(utc(2024, 1, 8, 9, 0).timestamp_millis())
        );
    }

    #[test]
    fn test_due_then_dismiss_rearms_a_week_out() {
        let service = ReminderService::new(Arc::new(MemoryStore::new()));
        service.set_reminder_at("Monday", "09:00", utc(2024, 1, 1, 8, 0));

        assert!(!service.is_due_at(utc(2024, 1, 1, 8, 59)));
        assert!(service.is_due_at(utc(2024, 1, 1, 9, 0)));

        service.dismiss_at(utc(2024, 1, 1, 9, 5));
        assert!(!service.is_due_at(utc(2024, 1, 1, 9, 10)));
        assert_eq!(
            service.next_reminder(),
            Some(utc(2024, 1, 8, 9, 0).timestamp_millis())
        );
    }

    #[test]
    fn test_clear_reminder_disables_and_removes_timestamp() {
        let service = ReminderService::new(Arc::new(MemoryStore::new()));
        service.set_reminder_at("Friday", "18:30", utc(2024, 1, 1, 8, 0));

        let settings = service.clear_reminder();
        assert!(!settings.is_enabled);
        assert_eq!(settings.day, "Friday");
        assert_eq!(service.next_reminder(), None);
        assert!(!service.is_due_at(utc(2030, 1, 1, 0, 0)));
    }
}
