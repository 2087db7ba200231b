use mcpenv::{EnvironmentController, Settings};
use std::time::Duration;

pub const PLANNING: Duration = Duration::from_millis(100);
pub const APPLYING: Duration = Duration::from_millis(200);
pub const DESTROYING: Duration = Duration::from_millis(150);
pub const RESET: Duration = Duration::from_millis(50);
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// ステージの遅延を短くした設定
pub fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.lifecycle.planning_delay = PLANNING;
    settings.lifecycle.applying_delay = APPLYING;
    settings.lifecycle.destroying_delay = DESTROYING;
    settings.lifecycle.reset_delay = RESET;
    settings.notifications.dismiss_after = NOTIFICATION_TTL;
    settings.notifications.max_visible = 10;
    settings
}

pub fn controller() -> EnvironmentController {
    EnvironmentController::new(&fast_settings()).unwrap()
}

/// 送信済みイベントをリスナーに処理させる
#[allow(dead_code)]
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
