use chrono::NaiveDateTime;
use crate::core::domain::Identifiable;

pub mod model;

// Book exposes the catalog attributes shared by the persistent model and the
// transfer object so that example filters can match either of them.
pub trait Book: Identifiable {
    fn title(&self) -> &str;
    fn author(&self) -> &str;
    fn publisher(&self) -> &str;
    fn publish_year(&self) -> i64;
    fn created_at(&self) -> Option<NaiveDateTime>;
    fn count(&self) -> i64;
}
