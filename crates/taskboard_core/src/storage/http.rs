use super::{Backend, NotesPayload, SaveAck, TasksPayload};
use crate::error::AppError;
use crate::model::Task;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

/// Talks to the storage service over `GET/POST /tasks` and `GET/POST /notes`.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("backend url is required"));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, AppError> {
        let url = self.url(resource);
        let response = checked(self.client.get(&url).send()?, "GET", &url)?;
        response
            .json()
            .map_err(|err| AppError::invalid_data(format!("{url}: {err}")))
    }

    fn post<B: serde::Serialize + ?Sized>(&self, resource: &str, body: &B) -> Result<SaveAck, AppError> {
        let url = self.url(resource);
        let response = checked(self.client.post(&url).json(body).send()?, "POST", &url)?;
        let text = response.text()?;
        let value = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
        Ok(SaveAck(value))
    }
}

fn checked(response: Response, method: &str, url: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::network(format!("{method} {url} returned {status}")))
    }
}

impl Backend for HttpBackend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.get("tasks")
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<SaveAck, AppError> {
        self.post("tasks", &TasksPayload { tasks })
    }

    fn fetch_notes(&self) -> Result<String, AppError> {
        let payload: NotesPayload = self.get("notes")?;
        Ok(payload.notes.unwrap_or_default())
    }

    fn save_notes(&self, notes: &str) -> Result<SaveAck, AppError> {
        self.post(
            "notes",
            &NotesPayload {
                notes: Some(notes.to_string()),
            },
        )
    }
}
