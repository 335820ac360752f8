use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status category of a scheduled item. Drives the bar style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ItemStatus {
    Planned,
    #[default]
    Actual,
    Incomplete,
    NotAccepted,
    Current,
    Frozen,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 6] = [
        ItemStatus::Planned,
        ItemStatus::Actual,
        ItemStatus::Incomplete,
        ItemStatus::NotAccepted,
        ItemStatus::Current,
        ItemStatus::Frozen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Planned => "Planned",
            ItemStatus::Actual => "Actual",
            ItemStatus::Incomplete => "Incomplete",
            ItemStatus::NotAccepted => "Not accepted",
            ItemStatus::Current => "Current",
            ItemStatus::Frozen => "Frozen",
        }
    }
}

impl From<String> for ItemStatus {
    /// Unknown values fall back to `Actual`.
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "planned" => ItemStatus::Planned,
            "incomplete" => ItemStatus::Incomplete,
            "not_accepted" => ItemStatus::NotAccepted,
            "current" => ItemStatus::Current,
            "frozen" => ItemStatus::Frozen,
            _ => ItemStatus::Actual,
        }
    }
}

/// One visual row (a machine / workstation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl<'de> Deserialize<'de> for Resource {
    /// Machines arrive either as bare codes or as `{id, name}` objects.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(String),
            Full {
                id: String,
                #[serde(default)]
                name: Option<String>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Resource::new(code.clone(), code),
            Raw::Full { id, name } => {
                let name = name.unwrap_or_else(|| id.clone());
                Resource { id, name }
            }
        })
    }
}

/// A scheduled piece of work on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    #[serde(alias = "resource_id", alias = "machine")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ItemStatus,
    /// Work order number, the first grouping dimension.
    #[serde(default, alias = "work_order", alias = "groupKeyA")]
    pub work_order: Option<String>,
    /// Sales order number, the second grouping dimension.
    #[serde(default, alias = "sales_order", alias = "groupKeyB")]
    pub sales_order: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Hex color (`#rrggbb`) overriding the status color.
    #[serde(default, alias = "explicit_color", alias = "color")]
    pub explicit_color: Option<String>,
}

impl ScheduleItem {
    pub fn new(id: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            start: None,
            end: None,
            status: ItemStatus::default(),
            work_order: None,
            sales_order: None,
            label: None,
            explicit_color: None,
        }
    }

    /// Start and end in epoch milliseconds, if both are known.
    pub fn span_ms(&self) -> Option<(i64, i64)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start.timestamp_millis(), end.timestamp_millis())),
            _ => None,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// The schedule payload as stored by the planner backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub machines: Vec<Resource>,
    pub items: Vec<ScheduleItem>,
}

impl Schedule {
    /// Earliest start and latest end over all items with a valid span.
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.items
            .iter()
            .filter_map(|item| Some((item.start?, item.end?)))
            .fold(None, |acc, (start, end)| match acc {
                None => Some((start, end)),
                Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
            })
    }
}

/// Parse an instant, turning anything unusable into `None`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_instant(&s),
        _ => None,
    })
}

/// Anything but a status string reads as `Actual`.
fn lenient_status<'de, D>(deserializer: D) -> Result<ItemStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => ItemStatus::from(s),
        _ => ItemStatus::Actual,
    })
}
