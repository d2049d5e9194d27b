use serde::{Deserialize, Serialize};

use crate::config::{Device, JoinConfig, Target};

/// Query parameters of a Join `sendPush` request. See <https://joaoapps.com/join/api/>
///
/// Unset parameters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Title of the notification
    pub title: String,
    /// Body of the notification
    pub text: String,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i8>,
    /// Only set when notifying a group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    /// A single device, or `group.<name>` when notifying a group
    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Comma separated device ids
    #[serde(rename = "deviceIds", skip_serializing_if = "Option::is_none")]
    pub device_ids: Option<String>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smsnumber: Option<String>,
    /// Always the notification text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smstext: Option<String>,
}

impl NotificationPayload {
    /// Build the parameters to send `title` and `message` with the given configuration
    pub fn build(title: &str, message: &str, config: &JoinConfig) -> Self {
        let mut payload = Self {
            title: title.to_owned(),
            text: message.to_owned(),
            url: config.url.clone(),
            icon: config.icon.clone(),
            priority: config.priority.map(|priority| priority.value()),
            ..Default::default()
        };

        match &config.target {
            Target::ApiKey { api_key, group } => {
                let group = group.unwrap_or_default();
                payload.apikey = Some(api_key.clone());
                payload.device_id = Some(format!("group.{group}"));
            }
            Target::Devices(Device::Single(device_id)) => {
                payload.device_id = Some(device_id.clone());
            }
            Target::Devices(Device::Many(device_ids)) => {
                payload.device_ids = Some(device_ids.join(","));
            }
        }

        if let Some(sms_number) = config.sms_number.as_deref().filter(|n| !n.is_empty()) {
            payload.smsnumber = Some(sms_number.to_owned());
            payload.smstext = Some(message.to_owned());
        }

        payload
    }
}

/// Body returned by `sendPush`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SendPushResponse {
    /// Set when Join could not deliver the push
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

impl SendPushResponse {
    /// The error reported by Join, empty messages are not errors
    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.is_empty())
    }
}
