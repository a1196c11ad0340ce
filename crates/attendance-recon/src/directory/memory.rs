use std::sync::{Arc, Mutex};

use super::{DirectoryError, PersonDirectory, PersonRecord};

/// Mutex-guarded directory used by the offline CLI, the demo service, and
/// tests. A production deployment would back the trait with the registry
/// database instead.
#[derive(Default, Clone)]
pub struct InMemoryPersonDirectory {
    people: Arc<Mutex<Vec<PersonRecord>>>,
}

impl InMemoryPersonDirectory {
    pub fn with_people(people: Vec<PersonRecord>) -> Self {
        Self {
            people: Arc::new(Mutex::new(people)),
        }
    }

    pub fn insert(&self, person: PersonRecord) {
        let mut guard = self.people.lock().expect("directory mutex poisoned");
        guard.push(person);
    }
}

impl PersonDirectory for InMemoryPersonDirectory {
    fn snapshot(&self) -> Result<Vec<PersonRecord>, DirectoryError> {
        let guard = self.people.lock().expect("directory mutex poisoned");
        Ok(guard.clone())
    }
}
