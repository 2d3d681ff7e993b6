//! In-memory lifecycle used by the planner and executor tests

use crate::diff::{AttributeChange, ChangeSet};
use crate::resource::Lifecycle;
use crate::types::AttrValue;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub value: String,
    /// Immutable: moving zones forces replacement
    pub zone: String,
}

impl Item {
    pub fn new(name: &str, value: &str, zone: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            zone: zone.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Read(String),
    Update(String),
    Delete(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("create failed for {0}")]
    Create(String),
    #[error("created {} but follow-up failed", .0.name)]
    Partial(Item),
}

#[derive(Debug, Default)]
pub struct MemoryLifecycle {
    calls: Mutex<Vec<Call>>,
    fail_create: bool,
    fail_after_create: bool,
}

impl MemoryLifecycle {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn failing_after_create() -> Self {
        Self {
            fail_after_create: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Lifecycle for MemoryLifecycle {
    type Config = Item;
    type State = Item;
    type Id = String;
    type Error = TestError;

    fn resource_type(&self) -> &'static str {
        "item"
    }

    fn create(&self, desired: &Item) -> Result<Item, TestError> {
        self.record(Call::Create(desired.name.clone()));
        if self.fail_create {
            return Err(TestError::Create(desired.name.clone()));
        }
        if self.fail_after_create {
            return Err(TestError::Partial(desired.clone()));
        }
        Ok(desired.clone())
    }

    fn read(&self, prior: &Item) -> Result<Item, TestError> {
        self.record(Call::Read(prior.name.clone()));
        Ok(prior.clone())
    }

    fn update(&self, desired: &Item, _prior: &Item) -> Result<Item, TestError> {
        self.record(Call::Update(desired.name.clone()));
        Ok(desired.clone())
    }

    fn delete(&self, prior: &Item) -> Result<(), TestError> {
        self.record(Call::Delete(prior.name.clone()));
        Ok(())
    }

    fn import(&self, identifier: &str) -> Result<String, TestError> {
        Ok(identifier.to_string())
    }

    fn imported_state(&self, id: String) -> Item {
        Item::new(&id, "", "")
    }

    fn id_of(&self, state: &Item) -> String {
        state.name.clone()
    }

    fn changes(&self, desired: &Item, actual: &Item) -> Vec<AttributeChange> {
        ChangeSet::new()
            .compare(
                "value",
                AttrValue::Str(actual.value.clone()),
                AttrValue::Str(desired.value.clone()),
            )
            .compare_replacing(
                "zone",
                AttrValue::Str(actual.zone.clone()),
                AttrValue::Str(desired.zone.clone()),
            )
            .finish()
    }

    fn salvage(&self, error: &TestError) -> Option<Item> {
        match error {
            TestError::Partial(item) => Some(item.clone()),
            TestError::Create(_) => None,
        }
    }
}
