//! Configuration of the Join notifier
//!
//! A configuration names either an `api_key` (optionally with a `group` of devices) or
//! one or more `device` ids, never both:
//!
//! ```json
//! { "api_key": "<API_KEY>", "group": "android", "priority": 1 }
//! { "device": ["<DEVICE_ID>", "<DEVICE_ID>"], "sms_number": "+15551234567" }
//! ```
use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

use crate::error::ValidationError;

/// A group of devices that can be targeted with an api key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    #[allow(missing_docs)]
    #[default]
    All,
    #[allow(missing_docs)]
    Android,
    #[allow(missing_docs)]
    Chrome,
    #[allow(missing_docs)]
    Windows10,
    #[allow(missing_docs)]
    Phone,
    #[allow(missing_docs)]
    Tablet,
    #[allow(missing_docs)]
    Pc,
}

impl Group {
    /// Name of the group as Join expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Android => "android",
            Self::Chrome => "chrome",
            Self::Windows10 => "windows10",
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Pc => "pc",
        }
    }
}

impl FromStr for Group {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => Self::All,
            "android" => Self::Android,
            "chrome" => Self::Chrome,
            "windows10" => Self::Windows10,
            "phone" => Self::Phone,
            "tablet" => Self::Tablet,
            "pc" => Self::Pc,
            other => return Err(ValidationError::UnknownGroup(other.to_owned())),
        })
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device id or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Device {
    #[allow(missing_docs)]
    Single(String),
    #[allow(missing_docs)]
    Many(Vec<String>),
}

/// Who receives the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every device of a group, authenticated with the api key.
    /// A missing group means [`Group::All`]
    ApiKey {
        #[allow(missing_docs)]
        api_key: String,
        #[allow(missing_docs)]
        group: Option<Group>,
    },
    /// Specific devices
    Devices(Device),
}

/// Notification priority, between -2 and 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i8);

impl Priority {
    #[allow(missing_docs)]
    pub const MIN: i64 = -2;
    #[allow(missing_docs)]
    pub const MAX: i64 = 2;

    #[allow(missing_docs)]
    pub fn value(&self) -> i8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(ValidationError::PriorityOutOfRange(value))
        }
    }
}

/// A validated Join configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct JoinConfig {
    /// Who receives the notification
    pub target: Target,
    /// Url opened when the notification is tapped
    pub url: Option<String>,
    /// Icon shown with the notification
    pub icon: Option<String>,
    /// Also send the message as an SMS to this number
    pub sms_number: Option<String>,
    #[allow(missing_docs)]
    pub priority: Option<Priority>,
}

impl JoinConfig {
    /// Validate an untyped configuration, before anything is sent
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let raw = RawConfig::deserialize(value)?;
        Self::try_from(raw)
    }

    /// Notify every device of the account owning `api_key`
    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self::with_target(Target::ApiKey {
            api_key: api_key.into(),
            group: None,
        })
    }

    /// Notify a single device
    pub fn device(device_id: impl Into<String>) -> Self {
        Self::with_target(Target::Devices(Device::Single(device_id.into())))
    }

    /// Notify several devices
    pub fn devices<I, S>(device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_target(Target::Devices(Device::Many(
            device_ids.into_iter().map(Into::into).collect(),
        )))
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            url: None,
            icon: None,
            sms_number: None,
            priority: None,
        }
    }

    /// Restrict an api key target to a group. Fails for device targets
    pub fn with_group(mut self, group: Group) -> Result<Self, ValidationError> {
        match &mut self.target {
            Target::ApiKey { group: current, .. } => *current = Some(group),
            Target::Devices(_) => return Err(ValidationError::GroupWithoutApiKey),
        }
        Ok(self)
    }

    #[allow(missing_docs)]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[allow(missing_docs)]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[allow(missing_docs)]
    pub fn with_sms_number(mut self, sms_number: impl Into<String>) -> Self {
        self.sms_number = Some(sms_number.into());
        self
    }

    #[allow(missing_docs)]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Configuration as written by the user, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    api_key: Option<String>,
    group: Option<String>,
    device: Option<Device>,
    url: Option<String>,
    icon: Option<String>,
    sms_number: Option<String>,
    priority: Option<i64>,
}

impl TryFrom<RawConfig> for JoinConfig {
    type Error = ValidationError;

    /// Checks run in order and the first failure is reported
    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let RawConfig {
            api_key,
            group,
            device,
            url,
            icon,
            sms_number,
            priority,
        } = raw;

        let target = match (api_key, device) {
            (Some(_), Some(_)) => return Err(ValidationError::AmbiguousTarget),
            (None, None) => return Err(ValidationError::MissingTarget),
            (Some(api_key), None) => Target::ApiKey {
                api_key,
                group: None,
            },
            (None, Some(device)) => Target::Devices(device),
        };

        let target = match (target, group) {
            (Target::Devices(_), Some(_)) => return Err(ValidationError::GroupWithoutApiKey),
            (Target::ApiKey { api_key, .. }, Some(group)) => Target::ApiKey {
                api_key,
                group: Some(group.parse()?),
            },
            (target, None) => target,
        };

        let priority = priority.map(Priority::try_from).transpose()?;

        if matches!(&target, Target::Devices(Device::Many(ids)) if ids.is_empty()) {
            return Err(ValidationError::EmptyDeviceList);
        }

        Ok(Self {
            target,
            url,
            icon,
            sms_number,
            priority,
        })
    }
}
