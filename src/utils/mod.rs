// 工具模块
// 可复现的种子伪随机数生成器与日期辅助函数

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// 均匀随机源，每次调用产出 [0, 1) 区间的 f64
///
/// 每日挑战注入 [`SeededRng`] 保证同一天所有人拿到同一套题；
/// 普通街机模式注入 [`EntropyRng`]。
pub trait RandomSource {
    fn next(&mut self) -> f64;
}

/// 字符串种子的线性同余生成器
///
/// 种子折叠：acc = (acc * 31 + charCode) mod 2^32；
/// 状态推进：state = (state * 1664525 + 1013904223) mod 2^32，
/// 返回 state / 2^32。同一种子产出完全相同的序列。
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        let mut acc: u32 = 0;
        for ch in seed.chars() {
            acc = acc.wrapping_mul(31).wrapping_add(ch as u32);
        }
        Self { state: acc }
    }
}

impl RandomSource for SeededRng {
    fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.state) / 4_294_967_296.0
    }
}

/// 非确定性的默认随机源
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRng;

impl RandomSource for EntropyRng {
    fn next(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// 等价于 `Math.floor(random() * n)`，返回 [0, n) 的整数
pub fn rand_int(rng: &mut dyn RandomSource, n: i64) -> i64 {
    (rng.next() * n as f64).floor() as i64
}

/// 当前 UTC 日期串 "YYYY-MM-DD"
pub fn today_date_string() -> String {
    date_string(Utc::now())
}

/// 给定时刻的 UTC 日期串
pub fn date_string(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// 给定时刻前一天的 UTC 日期串
pub fn yesterday_date_string(instant: DateTime<Utc>) -> String {
    date_string(instant - Duration::days(1))
}
