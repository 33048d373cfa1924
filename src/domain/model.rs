use crate::utils::error::{Result, ScraperError};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 收集日期：每次執行固定為「明天」，決定所有目錄與檔名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionDate(NaiveDate);

impl CollectionDate {
    /// 以本地時間計算明天
    pub fn tomorrow() -> Self {
        Self::day_after(Local::now().date_naive())
    }

    pub fn day_after(today: NaiveDate) -> Self {
        Self(today.succ_opt().unwrap_or(today))
    }

    pub fn parse(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ScraperError::InvalidConfigValueError {
                field: "date".to_string(),
                value: value.to_string(),
                reason: format!("Expected YYYY-MM-DD: {}", e),
            })
    }

    /// `2024-06-10` -> `2024_06_10`
    pub fn folder_token(&self) -> String {
        self.0.format("%Y_%m_%d").to_string()
    }
}

impl fmt::Display for CollectionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// 查詢時段（HH:MM），同時也是每日排序的依據
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn parse(value: &str) -> Result<Self> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(Self)
            .map_err(|e| ScraperError::InvalidConfigValueError {
                field: "schedule.slots".to_string(),
                value: value.to_string(),
                reason: format!("Expected HH:MM: {}", e),
            })
    }

    /// 預設的午餐查詢時段
    pub fn default_slots() -> Vec<TimeSlot> {
        [
            (8, 0),
            (9, 0),
            (11, 0),
            (11, 30),
            (12, 30),
            (13, 30),
            (14, 0),
        ]
        .into_iter()
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).map(TimeSlot))
        .collect()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ScraperError;

    fn try_from(value: String) -> Result<Self> {
        TimeSlot::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// 供應商識別碼，統一以字串保存（上游通常回傳數字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(String);

impl ProviderId {
    /// `null`、`false`、`0`、空字串都不是有效的識別碼；只接受數字與字串
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                let is_zero = n.as_f64().map(|f| f == 0.0).unwrap_or(false);
                (!is_zero).then(|| Self(n.to_string()))
            }
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 上游回傳的供應商物件，除 `id` / `name` 外原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderRecord {
    fields: Map<String, Value>,
}

impl ProviderRecord {
    pub fn id(&self) -> Option<ProviderId> {
        self.fields.get("id").and_then(ProviderId::from_value)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for ProviderRecord {
    type Error = ScraperError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ScraperError::UnexpectedPayloadError {
                operation: "provider discovery".to_string(),
                details: format!("expected a provider object, got {}", other),
            }),
        }
    }
}

/// 單一供應商在單一時段的菜單
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemBundle {
    pub provider_id: ProviderId,
    pub provider_name: Option<String>,
    pub menu: Value,
}

/// 階段間傳遞的結果：沒有資料是正常的略過，不是錯誤
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Proceed(T),
    NothingToProcess,
}

impl<T> StageOutcome<Vec<T>> {
    pub fn from_batch(batch: Vec<T>) -> Self {
        if batch.is_empty() {
            StageOutcome::NothingToProcess
        } else {
            StageOutcome::Proceed(batch)
        }
    }
}

impl<T> StageOutcome<T> {
    pub fn is_nothing_to_process(&self) -> bool {
        matches!(self, StageOutcome::NothingToProcess)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            StageOutcome::Proceed(value) => Some(value),
            StageOutcome::NothingToProcess => None,
        }
    }
}

/// 通知時從儲存層重新計算的當日摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub date: CollectionDate,
    pub menu_files: usize,
}

impl RunSummary {
    pub fn message(&self, base_message: &str) -> String {
        format!("{} Found {} menu files.", base_message, self.menu_files)
    }
}
