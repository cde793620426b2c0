use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub email_verification: bool,
    pub name: String,
    pub user_status: bool,
    pub avatar: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A signed-in device of a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    pub hwid: String,
    pub device: String,
    pub app: String,
    pub created_at: String,
    pub updated_at: String,
    pub user: User,
}

/// Where the signed-in admin receives alerts. `id == 0` means none saved yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSetting {
    pub id: i64,
    pub user_id: String,
    pub telegram_chat_id: String,
    pub telegram_username: String,
    pub email: String,
    pub phone_number: String,
    pub whatsapp_number: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettingView {
    pub id: i64,
    pub user_id: String,
    pub telegram_chat_id: String,
    pub telegram_username: String,
    pub email: String,
    pub phone_number: String,
    pub whatsapp_number: String,
    /// Localized date, empty when unset.
    pub created_at: String,
    pub updated_at: String,
    pub is_new: bool,
}
