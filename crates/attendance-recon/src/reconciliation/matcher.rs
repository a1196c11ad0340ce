use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::directory::{PersonId, PersonRecord};

/// Two directory registrations normalizing to the same integer. Reported on
/// the run report instead of silently picking a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationCollision {
    pub normalized: u64,
    pub kept: String,
    pub conflicting: String,
}

/// Lookup index over one directory snapshot.
///
/// Built once per run in O(people); lookups are O(1) per punch. Exact string
/// matches always win; the integer-normalized map only answers for all-digit
/// registrations, with leading zeros stripped on both sides.
#[derive(Debug, Default)]
pub(crate) struct RegistrationIndex {
    exact: HashMap<String, PersonId>,
    numeric: HashMap<u64, (String, PersonId)>,
    collisions: Vec<RegistrationCollision>,
}

impl RegistrationIndex {
    pub(crate) fn build(people: &[PersonRecord]) -> Self {
        // Sorting makes the collision winner independent of snapshot order.
        let mut entries: Vec<&PersonRecord> = people.iter().collect();
        entries.sort_by(|a, b| {
            (a.registration.as_str(), &a.id).cmp(&(b.registration.as_str(), &b.id))
        });

        let mut index = Self::default();
        for person in entries {
            index
                .exact
                .entry(person.registration.clone())
                .or_insert_with(|| person.id.clone());

            let Some(normalized) = normalize_registration(&person.registration) else {
                continue;
            };
            match index.numeric.entry(normalized) {
                Entry::Vacant(slot) => {
                    slot.insert((person.registration.clone(), person.id.clone()));
                }
                Entry::Occupied(slot) => {
                    let (kept, _) = slot.get();
                    if kept != &person.registration {
                        index.collisions.push(RegistrationCollision {
                            normalized,
                            kept: kept.clone(),
                            conflicting: person.registration.clone(),
                        });
                    }
                }
            }
        }
        index
    }

    pub(crate) fn resolve(&self, raw: &str) -> Option<&PersonId> {
        if let Some(id) = self.exact.get(raw) {
            return Some(id);
        }
        normalize_registration(raw).and_then(|value| self.numeric.get(&value).map(|(_, id)| id))
    }

    pub(crate) fn collisions(&self) -> &[RegistrationCollision] {
        &self.collisions
    }
}

fn normalize_registration(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
