use serde::{Deserialize, Serialize};

/// Deployment-wide values stamped into every push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushDefaults {
    /// Page opened when the notification is tapped.
    pub url: String,
    pub icon: String,
    pub badge: String,
    /// Vibration pattern in milliseconds, alternating on/off.
    pub vibrate: Vec<u32>,
}

impl Default for PushDefaults {
    fn default() -> Self {
        Self {
            url: "/notifications".to_string(),
            icon: "/icons/icon-192.png".to_string(),
            badge: "/icons/badge-72.png".to_string(),
            vibrate: vec![200, 100, 200],
        }
    }
}

/// The JSON body the service worker receives and turns into a
/// `showNotification` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: PayloadData,
    pub actions: Vec<PayloadAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadData {
    pub url: String,
    pub notification_type: String,
    pub sent_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAction {
    pub action: String,
    pub title: String,
}

impl PushPayload {
    pub fn new(
        defaults: &PushDefaults,
        title: &str,
        body: &str,
        notification_type: &str,
        sent_at: jiff::Timestamp,
    ) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            icon: defaults.icon.clone(),
            badge: defaults.badge.clone(),
            vibrate: defaults.vibrate.clone(),
            data: PayloadData {
                url: defaults.url.clone(),
                notification_type: notification_type.to_string(),
                sent_at,
            },
            actions: vec![
                PayloadAction {
                    action: "open".to_string(),
                    title: "Buka".to_string(),
                },
                PayloadAction {
                    action: "dismiss".to_string(),
                    title: "Tutup".to_string(),
                },
            ],
        }
    }
}
