// Domain operations: the named actions the CLI and the interactive menu
// dispatch to. Each one composes a handful of sequential ApiClient calls
// with light client-side logic; rendering stays out of this module.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use crate::api::{Activity, ApiClient, Measurement, Project};
use crate::error::ApiError;

/// Anything with a server id and a display name. Lets the name lookup be
/// shared between projects and activities.
pub trait Named {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

impl Named for Project {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Activity {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

pub fn projects(api: &ApiClient) -> Result<Vec<Project>, ApiError> {
    api.get_list("projects", &[])
}

/// List activities, optionally scoped to one project.
pub fn activities(api: &ApiClient, project: Option<i64>) -> Result<Vec<Activity>, ApiError> {
    let query: Vec<(&str, String)> = match project {
        Some(id) => vec![("project", id.to_string())],
        None => Vec::new(),
    };
    api.get_list("activities", &query)
}

pub fn active(api: &ApiClient) -> Result<Vec<Measurement>, ApiError> {
    api.get_list("timesheets/active", &[])
}

pub fn recent(api: &ApiClient) -> Result<Vec<Measurement>, ApiError> {
    api.get_list("timesheets/recent", &[])
}

/// Case-insensitive exact match on the `name` field. Policy: the first
/// match in server order wins; duplicates further down are ignored.
pub fn find_id<T: Named>(items: &[T], name: &str) -> Option<i64> {
    let wanted = name.to_lowercase();
    items
        .iter()
        .find(|item| item.name().to_lowercase() == wanted)
        .map(Named::id)
}

pub fn find_project_id(api: &ApiClient, name: &str) -> Result<i64, ApiError> {
    let list = projects(api)?;
    find_id(&list, name).ok_or_else(|| ApiError::NotFound {
        kind: "project",
        name: name.to_string(),
    })
}

pub fn find_activity_id(api: &ApiClient, name: &str) -> Result<i64, ApiError> {
    let list = activities(api, None)?;
    find_id(&list, name).ok_or_else(|| ApiError::NotFound {
        kind: "activity",
        name: name.to_string(),
    })
}

fn entry_id(payload: &serde_json::Value) -> Result<i64, ApiError> {
    payload
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| ApiError::Server {
            code: None,
            message: "response did not contain an entry id".into(),
        })
}

/// Start a new measurement now. Returns the server-assigned id of the
/// created entry.
pub fn start(api: &ApiClient, project: i64, activity: i64) -> Result<i64, ApiError> {
    let body = json!({
        "begin": Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        "project": project,
        "activity": activity,
    });
    debug!(%body, "starting measurement");
    let payload = api.call(Method::POST, "timesheets", &[], Some(&body))?;
    entry_id(&payload)
}

/// Stop one measurement by id. Returns the stopped entry's id.
pub fn stop(api: &ApiClient, id: i64) -> Result<i64, ApiError> {
    let payload = api.call(Method::PATCH, &format!("timesheets/{id}/stop"), &[], None)?;
    entry_id(&payload)
}

/// Stop every active measurement, one at a time in server list order,
/// invoking `report` as each stop completes. Returns the stopped
/// measurements; an empty result means there was nothing to stop and no
/// stop request was issued.
pub fn stop_all(
    api: &ApiClient,
    mut report: impl FnMut(&Measurement),
) -> Result<Vec<Measurement>, ApiError> {
    let running = active(api)?;
    for measurement in &running {
        stop(api, measurement.id)?;
        report(measurement);
    }
    Ok(running)
}

/// Reopen a stopped measurement's project+activity pairing with a fresh
/// begin time. Returns the entry id reported by the server.
pub fn restart(api: &ApiClient, id: i64) -> Result<i64, ApiError> {
    let payload = api.call(Method::PATCH, &format!("timesheets/{id}/restart"), &[], None)?;
    entry_id(&payload)
}

/// Duration between `begin` and `end` (or now) as zero-padded `HH:MM`.
/// Hours can exceed 24 and grow past two digits; minutes stay below 60.
pub fn format_duration(
    begin: DateTime<FixedOffset>,
    end: Option<DateTime<FixedOffset>>,
) -> String {
    let end = end.map(|e| e.with_timezone(&Utc)).unwrap_or_else(Utc::now);
    let minutes = (end - begin.with_timezone(&Utc)).num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Elapsed time of a measurement: begin to end when finished, begin to
/// now while active. `None` when the begin timestamp is unusable.
pub fn elapsed(measurement: &Measurement) -> Option<String> {
    measurement
        .begin_time()
        .map(|begin| format_duration(begin, measurement.end_time()))
}
