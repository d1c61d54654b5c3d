//! Operator-facing strings in the supported languages.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

const UK_MONTHS: [&str; 12] = [
    "січ.", "лют.", "бер.", "квіт.", "трав.", "черв.", "лип.", "серп.", "вер.", "жовт.", "лист.",
    "груд.",
];

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "uk" | "uk-ua" | "ua" => Locale::Uk,
            _ => Locale::En,
        }
    }

    pub fn notifications_title(&self) -> &'static str {
        match self {
            Locale::En => "Notifications",
            Locale::Uk => "Сповіщення",
        }
    }

    pub fn new_registration(&self) -> &'static str {
        match self {
            Locale::En => "New registration",
            Locale::Uk => "Нова реєстрація",
        }
    }

    pub fn registration_message(&self, name: &str, email: &str) -> String {
        match self {
            Locale::En => format!("{} ({}) is waiting for account approval", name, email),
            Locale::Uk => format!("{} ({}) очікує підтвердження облікового запису", name, email),
        }
    }

    pub fn lantern_breakdown(&self) -> &'static str {
        match self {
            Locale::En => "Lantern breakdown",
            Locale::Uk => "Несправність ліхтаря",
        }
    }

    pub fn breakdown_message(&self, lantern_id: i64, park: &str, description: &str) -> String {
        match self {
            Locale::En => format!("Lantern #{} in park {}: {}", lantern_id, park, description),
            Locale::Uk => format!("Ліхтар #{} у парку {}: {}", lantern_id, park, description),
        }
    }

    pub fn unknown_park(&self) -> &'static str {
        match self {
            Locale::En => "unknown",
            Locale::Uk => "невідомо",
        }
    }

    pub fn unknown_time(&self) -> &'static str {
        match self {
            Locale::En => "Unknown time",
            Locale::Uk => "Невідомий час",
        }
    }

    pub fn no_notifications(&self) -> &'static str {
        match self {
            Locale::En => "No notifications",
            Locale::Uk => "Немає сповіщень",
        }
    }

    pub fn admin_activated(&self) -> &'static str {
        match self {
            Locale::En => "Administrator activated",
            Locale::Uk => "Адміністратора активовано",
        }
    }

    pub fn admin_activation_error(&self) -> &'static str {
        match self {
            Locale::En => "Failed to activate administrator",
            Locale::Uk => "Не вдалося активувати адміністратора",
        }
    }

    /// Render a notification time, or the placeholder when it never parsed.
    pub fn format_time(&self, timestamp: Option<&DateTime<Utc>>) -> String {
        let Some(ts) = timestamp else {
            return self.unknown_time().to_string();
        };

        match self {
            Locale::En => ts.format("%d %b %Y, %H:%M UTC").to_string(),
            Locale::Uk => format!(
                "{:02} {} {} р., {:02}:{:02} UTC",
                ts.day(),
                UK_MONTHS[ts.month0() as usize],
                ts.year(),
                ts.hour(),
                ts.minute()
            ),
        }
    }
}
