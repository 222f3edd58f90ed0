use std::time::Duration;

use common::log;

use crate::room_store::RoomStore;

pub struct CleanupTask {
    room_store: RoomStore,
    check_interval: Duration,
    inactivity_timeout: Duration,
}

impl CleanupTask {
    pub fn new(room_store: RoomStore, check_interval: Duration, inactivity_timeout: Duration) -> Self {
        Self {
            room_store,
            check_interval,
            inactivity_timeout,
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            interval.tick().await;
            self.cleanup_inactive_rooms().await;
        }
    }

    async fn cleanup_inactive_rooms(&self) -> usize {
        let removed = self.room_store.remove_inactive(self.inactivity_timeout).await;
        if !removed.is_empty() {
            let remaining = self.room_store.room_count().await;
            for code in &removed {
                log!("Cleaned up inactive room: {} ({} rooms remain)", code, remaining);
            }
        }
        removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server_config::ChatConfig;
    use common::ConnectionId;

    #[tokio::test]
    async fn test_cleanup_removes_only_idle_rooms() {
        let store = RoomStore::new(ChatConfig::default());
        store.create_room("Ana", &ConnectionId::new("ana".to_string())).await;

        let patient = CleanupTask::new(store.clone(), Duration::from_secs(1), Duration::from_secs(3600));
        assert_eq!(patient.cleanup_inactive_rooms().await, 0);

        std::thread::sleep(Duration::from_millis(5));
        let strict = CleanupTask::new(store.clone(), Duration::from_secs(1), Duration::ZERO);
        assert_eq!(strict.cleanup_inactive_rooms().await, 1);
        assert_eq!(store.room_count().await, 0);
    }
}
