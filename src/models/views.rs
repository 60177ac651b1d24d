use crate::models::complaint::Complaint;
use serde::Serialize;

/// View model for the login and signup pages
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct FormView {
    pub view: String,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormView {
    pub fn login(error: Option<String>) -> Self {
        Self {
            view: "login".to_string(),
            fields: vec!["username".to_string(), "password".to_string()],
            error,
        }
    }

    pub fn signup() -> Self {
        Self {
            view: "signup".to_string(),
            fields: vec!["username".to_string(), "password".to_string()],
            error: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientDashboardView {
    pub user_id: i64,
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Serialize)]
pub struct OperatorDashboardView {
    pub complaints: Vec<Complaint>,
    pub stats: DashboardStats,
}

/// Chart-ready grouped counts: `labels[i]` has `values[i]` complaints
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl FromIterator<(String, i64)> for Series {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let (labels, values) = iter.into_iter().unzip();
        Self { labels, values }
    }
}

impl Series {
    /// Count recorded for `label`, zero when the group is empty
    pub fn get(&self, label: &str) -> i64 {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.values.get(i).copied())
            .unwrap_or(0)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct DashboardStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub categories: Series,
    pub priorities: Series,
    pub statuses: Series,
}
