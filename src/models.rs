// Data models for the advisory portal catalogs

use crate::error::{CatalogError, CatalogResult};
use crate::filter::SortRule;
use crate::record::{IndexValue, Record, expect_str};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Display and FromStr for enums that expose `ALL` and `as_str`
macro_rules! text_enum {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($ty), s))
            }
        }
    };
}

fn parse_enum<T: FromStr<Err = String>>(field: &str, value: &IndexValue) -> CatalogResult<T> {
    expect_str(field, value)?
        .parse()
        .map_err(|reason: String| CatalogError::invalid_field(field, reason))
}

fn parse_date(field: &str, value: &IndexValue) -> CatalogResult<NaiveDate> {
    let raw = expect_str(field, value)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| CatalogError::invalid_field(field, format!("invalid date '{}': {}", raw, e)))
}

fn expect_f64(field: &str, value: &IndexValue) -> CatalogResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| CatalogError::invalid_field(field, format!("expected number, got {}", value.type_name())))
}

fn expect_int(field: &str, value: &IndexValue) -> CatalogResult<i64> {
    value
        .as_int()
        .ok_or_else(|| CatalogError::invalid_field(field, format!("expected integer, got {}", value.type_name())))
}

fn expect_bool(field: &str, value: &IndexValue) -> CatalogResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| CatalogError::invalid_field(field, format!("expected boolean, got {}", value.type_name())))
}

fn unknown_field(field: &str) -> CatalogError {
    CatalogError::invalid_field(field, "no such writable field")
}

// ============================================================================
// Marketplace services
// ============================================================================

/// A fiscal service offered in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ServiceCategory,
    /// Price in euros, VAT excluded
    pub price: f64,
    pub rating: f64,
    pub provider: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Declaraciones,
    Contabilidad,
    Laboral,
    Sociedades,
    Asesoria,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 5] = [
        ServiceCategory::Declaraciones,
        ServiceCategory::Contabilidad,
        ServiceCategory::Laboral,
        ServiceCategory::Sociedades,
        ServiceCategory::Asesoria,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Declaraciones => "declaraciones",
            ServiceCategory::Contabilidad => "contabilidad",
            ServiceCategory::Laboral => "laboral",
            ServiceCategory::Sociedades => "sociedades",
            ServiceCategory::Asesoria => "asesoria",
        }
    }
}

text_enum!(ServiceCategory);

impl Record for Service {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection_name() -> &'static str {
        "services"
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn search_labels(&self) -> Vec<&str> {
        vec![self.description.as_str()]
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("category".to_string(), IndexValue::from(self.category.as_str()));
        fields.insert("price".to_string(), IndexValue::Float(self.price));
        fields.insert("rating".to_string(), IndexValue::Float(self.rating));
        fields.insert("provider".to_string(), IndexValue::from(self.provider.as_str()));
        fields.insert("featured".to_string(), IndexValue::Bool(self.featured));
        fields
    }

    fn set_field(&mut self, name: &str, value: &IndexValue) -> CatalogResult<()> {
        match name {
            "category" => self.category = parse_enum(name, value)?,
            "price" => self.price = expect_f64(name, value)?,
            "rating" => self.rating = expect_f64(name, value)?,
            "featured" => self.featured = expect_bool(name, value)?,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<40} {:<14} {:>9.2} EUR  {:.1}*",
            self.id, self.name, self.category, self.price, self.rating
        )
    }
}

// ============================================================================
// Client documents
// ============================================================================

/// A document uploaded by (or for) a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub client_name: String,
    pub uploaded_at: NaiveDate,
    pub size_kb: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Irpf,
    Iva,
    Sociedades,
    Nominas,
    Otros,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::Irpf,
        DocumentCategory::Iva,
        DocumentCategory::Sociedades,
        DocumentCategory::Nominas,
        DocumentCategory::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Irpf => "irpf",
            DocumentCategory::Iva => "iva",
            DocumentCategory::Sociedades => "sociedades",
            DocumentCategory::Nominas => "nominas",
            DocumentCategory::Otros => "otros",
        }
    }
}

text_enum!(DocumentCategory);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Reviewed,
    Processed,
    Archived,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Pending,
        DocumentStatus::Reviewed,
        DocumentStatus::Processed,
        DocumentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Reviewed => "reviewed",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Archived => "archived",
        }
    }

    /// Transitions the portal offers from this status.
    ///
    /// Advisory only: the store accepts any status written through `update_field`.
    pub fn valid_transitions(&self) -> &'static [DocumentStatus] {
        match self {
            DocumentStatus::Pending => &[DocumentStatus::Reviewed],
            DocumentStatus::Reviewed => &[DocumentStatus::Processed, DocumentStatus::Pending],
            DocumentStatus::Processed => &[DocumentStatus::Archived],
            DocumentStatus::Archived => &[],
        }
    }

    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

text_enum!(DocumentStatus);

impl Record for Document {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection_name() -> &'static str {
        "documents"
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn search_labels(&self) -> Vec<&str> {
        vec![self.client_name.as_str()]
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("category".to_string(), IndexValue::from(self.category.as_str()));
        fields.insert("status".to_string(), IndexValue::from(self.status.as_str()));
        fields.insert("client_name".to_string(), IndexValue::from(self.client_name.as_str()));
        fields.insert("uploaded_at".to_string(), IndexValue::String(self.uploaded_at.to_string()));
        fields.insert("size_kb".to_string(), IndexValue::Int(self.size_kb));
        fields
    }

    fn set_field(&mut self, name: &str, value: &IndexValue) -> CatalogResult<()> {
        match name {
            "category" => self.category = parse_enum(name, value)?,
            "status" => self.status = parse_enum(name, value)?,
            "client_name" => self.client_name = expect_str(name, value)?.to_string(),
            "uploaded_at" => self.uploaded_at = parse_date(name, value)?,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<36} {:<11} {:<10} {:<24} {}",
            self.id, self.name, self.category, self.status, self.client_name, self.uploaded_at
        )
    }
}

// ============================================================================
// Clients
// ============================================================================

/// A client of the advisory firm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: ClientStatus,
    pub client_type: ClientType,
    pub pending_documents: i64,
    pub monthly_fee: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Pending,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [ClientStatus::Active, ClientStatus::Inactive, ClientStatus::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Pending => "pending",
        }
    }
}

text_enum!(ClientStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Autonomo,
    Empresa,
    Particular,
}

impl ClientType {
    pub const ALL: [ClientType; 3] = [ClientType::Autonomo, ClientType::Empresa, ClientType::Particular];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Autonomo => "autonomo",
            ClientType::Empresa => "empresa",
            ClientType::Particular => "particular",
        }
    }
}

text_enum!(ClientType);

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection_name() -> &'static str {
        "clients"
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), IndexValue::from(self.status.as_str()));
        fields.insert("client_type".to_string(), IndexValue::from(self.client_type.as_str()));
        fields.insert("email".to_string(), IndexValue::from(self.email.as_str()));
        fields.insert("pending_documents".to_string(), IndexValue::Int(self.pending_documents));
        fields.insert("monthly_fee".to_string(), IndexValue::Float(self.monthly_fee));
        fields
    }

    fn set_field(&mut self, name: &str, value: &IndexValue) -> CatalogResult<()> {
        match name {
            "status" => self.status = parse_enum(name, value)?,
            "client_type" => self.client_type = parse_enum(name, value)?,
            "email" => self.email = expect_str(name, value)?.to_string(),
            "pending_documents" => self.pending_documents = expect_int(name, value)?,
            "monthly_fee" => self.monthly_fee = expect_f64(name, value)?,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<26} {:<30} {:<9} {:<11} {:>3} docs {:>8.2} EUR/mes",
            self.id, self.name, self.email, self.status, self.client_type, self.pending_documents, self.monthly_fee
        )
    }
}

// ============================================================================
// Advisor tasks
// ============================================================================

/// A task on the advisor's work list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub client_name: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Ordering weight, higher is more pressing
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Urgent => 3,
        }
    }
}

text_enum!(Priority);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Transitions the task list offers from this status (advisory, not enforced)
    pub fn valid_transitions(&self) -> &'static [TaskStatus] {
        match self {
            TaskStatus::Pending => &[TaskStatus::InProgress, TaskStatus::Completed],
            TaskStatus::InProgress => &[TaskStatus::Completed, TaskStatus::Pending],
            // Reopening a completed task is allowed
            TaskStatus::Completed => &[TaskStatus::Pending],
        }
    }

    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

text_enum!(TaskStatus);

impl Task {
    /// Work-list ordering: most pressing priority first, then earliest due date
    pub fn priority_then_due() -> SortRule<Task> {
        SortRule::by_key_desc(|t: &Task| t.priority.rank()).then(SortRule::by_key(|t: &Task| t.due_date))
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection_name() -> &'static str {
        "tasks"
    }

    fn primary_text(&self) -> &str {
        &self.title
    }

    fn search_labels(&self) -> Vec<&str> {
        vec![self.client_name.as_str()]
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("priority".to_string(), IndexValue::from(self.priority.as_str()));
        fields.insert("status".to_string(), IndexValue::from(self.status.as_str()));
        fields.insert("client_name".to_string(), IndexValue::from(self.client_name.as_str()));
        fields.insert("due_date".to_string(), IndexValue::String(self.due_date.to_string()));
        fields
    }

    fn set_field(&mut self, name: &str, value: &IndexValue) -> CatalogResult<()> {
        match name {
            "priority" => self.priority = parse_enum(name, value)?,
            "status" => self.status = parse_enum(name, value)?,
            "client_name" => self.client_name = expect_str(name, value)?.to_string(),
            "due_date" => self.due_date = parse_date(name, value)?,
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<38} {:<24} {:<7} {:<12} {}",
            self.id, self.title, self.client_name, self.priority, self.status, self.due_date
        )
    }
}
