// 用户资料服务模块
// 只保存一个展示用昵称，裸字符串存储，不做任何鉴权

use crate::storage::KeyValueStore;
use std::sync::Arc;

const USER_KEY: &str = "mathMentorUser";

/// 用户资料服务
pub struct ProfileService {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 已保存的昵称；读取失败视为未登录
    pub fn user(&self) -> Option<String> {
        match self.store.get(USER_KEY) {
            Ok(user) => user.filter(|name| !name.is_empty()),
            Err(err) => {
                log::warn!("failed to read stored user: {}", err);
                None
            }
        }
    }

    /// 保存昵称，首尾空白会被去掉；空名字不保存
    pub fn set_user(&self, name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Err(err) = self.store.set(USER_KEY, trimmed) {
            log::error!("failed to persist user name: {}", err);
        }
        Some(trimmed.to_string())
    }

    /// 退出登录
    pub fn clear_user(&self) {
        if let Err(err) = self.store.remove(USER_KEY) {
            log::warn!("failed to clear stored user: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_user_roundtrip() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.user(), None);

        assert_eq!(service.set_user("  Ada  "), Some("Ada".to_string()));
        assert_eq!(service.user(), Some("Ada".to_string()));

        service.clear_user();
        assert_eq!(service.user(), None);
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.set_user("   "), None);
        assert_eq!(service.user(), None);
    }
}
