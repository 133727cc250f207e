//! People directory client: REST transport plus the in-memory collection cache.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Person, PersonId},
    error::DirectoryError,
    protocol::{PersonDraft, PersonPatch},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// One HTTP call per method; no caching at this layer.
#[async_trait]
pub trait PeopleTransport: Send + Sync {
    async fn fetch_all(&self) -> DirectoryResult<Vec<Person>>;
    async fn fetch_one(&self, id: PersonId) -> DirectoryResult<Person>;
    async fn create(&self, draft: &PersonDraft) -> DirectoryResult<Person>;
    async fn update(&self, id: PersonId, draft: &PersonDraft) -> DirectoryResult<PersonPatch>;
    async fn delete(&self, id: PersonId) -> DirectoryResult<()>;
}

pub struct HttpPeopleTransport {
    http: Client,
    base_url: String,
}

impl HttpPeopleTransport {
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> DirectoryResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(to_directory_error)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn item_url(&self, id: PersonId) -> String {
        format!("{}/{}", self.base_url, id.0)
    }
}

fn to_directory_error(err: reqwest::Error) -> DirectoryError {
    error!("people api error: {err}");
    DirectoryError::new(err.to_string())
}

#[async_trait]
impl PeopleTransport for HttpPeopleTransport {
    async fn fetch_all(&self) -> DirectoryResult<Vec<Person>> {
        self.http
            .get(&self.base_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(to_directory_error)?
            .json()
            .await
            .map_err(to_directory_error)
    }

    async fn fetch_one(&self, id: PersonId) -> DirectoryResult<Person> {
        self.http
            .get(self.item_url(id))
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(to_directory_error)?
            .json()
            .await
            .map_err(to_directory_error)
    }

    async fn create(&self, draft: &PersonDraft) -> DirectoryResult<Person> {
        self.http
            .post(&self.base_url)
            .json(draft)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(to_directory_error)?
            .json()
            .await
            .map_err(to_directory_error)
    }

    async fn update(&self, id: PersonId, draft: &PersonDraft) -> DirectoryResult<PersonPatch> {
        self.http
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(to_directory_error)?
            .json()
            .await
            .map_err(to_directory_error)
    }

    async fn delete(&self, id: PersonId) -> DirectoryResult<()> {
        self.http
            .delete(self.item_url(id))
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(to_directory_error)?;
        Ok(())
    }
}

/// Mirror of the server collection.
///
/// Never revalidated on its own: `version` increases on every mutation so callers can tell
/// whether what they rendered is still what the cache holds.
#[derive(Debug, Default, Clone)]
pub struct PersonCache {
    entries: Vec<Person>,
    version: u64,
}

impl PersonCache {
    pub fn entries(&self) -> &[Person] {
        &self.entries
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: PersonId) -> Option<&Person> {
        self.entries.iter().find(|person| person.id == id)
    }

    pub fn replace_all(&mut self, people: Vec<Person>) {
        self.entries = people;
        self.version += 1;
    }

    pub fn push(&mut self, person: Person) {
        self.entries.push(person);
        self.version += 1;
    }

    /// Merges `patch` into the entry for `id`; returns the merged entry if it was cached.
    pub fn merge(&mut self, id: PersonId, patch: PersonPatch) -> Option<Person> {
        let index = self.entries.iter().position(|person| person.id == id)?;
        patch.apply_to(&mut self.entries[index]);
        self.version += 1;
        Some(self.entries[index].clone())
    }

    /// Returns the number of removed entries.
    pub fn remove(&mut self, id: PersonId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|person| person.id != id);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.version += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.version += 1;
    }
}

pub struct DirectoryClient {
    transport: Arc<dyn PeopleTransport>,
    cache: Mutex<PersonCache>,
}

impl DirectoryClient {
    pub fn new(transport: Arc<dyn PeopleTransport>) -> Self {
        Self {
            transport,
            cache: Mutex::new(PersonCache::default()),
        }
    }

    pub fn over_http(base_url: impl Into<String>, timeout: Duration) -> DirectoryResult<Self> {
        Ok(Self::new(Arc::new(HttpPeopleTransport::with_timeout(
            base_url, timeout,
        )?)))
    }

    pub async fn list_all(&self) -> DirectoryResult<Vec<Person>> {
        {
            let cache = self.cache.lock().await;
            if !cache.is_empty() {
                debug!(cache_version = cache.version(), "people: serving list from cache");
                return Ok(cache.entries().to_vec());
            }
        }

        let people = self.transport.fetch_all().await?;
        let mut cache = self.cache.lock().await;
        cache.replace_all(people.clone());
        info!(
            count = people.len(),
            cache_version = cache.version(),
            "people: cache populated"
        );
        Ok(people)
    }

    /// Serves cached entries first; a fetched singleton is not added to the cache.
    pub async fn get(&self, id: PersonId) -> DirectoryResult<Person> {
        if let Some(person) = self.cache.lock().await.find(id) {
            return Ok(person.clone());
        }
        self.transport.fetch_one(id).await
    }

    pub async fn create(&self, draft: &PersonDraft) -> DirectoryResult<Person> {
        let created = self.transport.create(draft).await?;
        let mut cache = self.cache.lock().await;
        cache.push(created.clone());
        info!(
            person_id = created.id.0,
            cache_version = cache.version(),
            "people: created"
        );
        Ok(created)
    }

    pub async fn update(&self, id: PersonId, draft: &PersonDraft) -> DirectoryResult<Person> {
        let patch = self.transport.update(id, draft).await?;
        let mut cache = self.cache.lock().await;
        if let Some(merged) = cache.merge(id, patch.clone()) {
            info!(person_id = id.0, cache_version = cache.version(), "people: updated");
            return Ok(merged);
        }

        debug!(person_id = id.0, "people: updated entry was not cached");
        let mut person = draft.clone().into_person(id);
        patch.apply_to(&mut person);
        Ok(person)
    }

    pub async fn delete(&self, id: PersonId) -> DirectoryResult<()> {
        self.transport.delete(id).await?;
        let mut cache = self.cache.lock().await;
        let removed = cache.remove(id);
        info!(
            person_id = id.0,
            removed,
            cache_version = cache.version(),
            "people: deleted"
        );
        Ok(())
    }

    pub async fn cache_version(&self) -> u64 {
        self.cache.lock().await.version()
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.entries().len()
    }

    /// Drops every cached entry so the next `list_all` refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        cache.clear();
        debug!(cache_version = cache.version(), "people: cache invalidated");
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
