use crate::host_list::{HostList, HostRecord, HostStore};
use crate::query_engine::{SnmpConnector, SnmpSession};
use anyhow::{anyhow, bail, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory host table that counts lookups.
pub(crate) struct FakeHosts {
    list: HostList,
    pub lookups: Cell<usize>,
}

impl FakeHosts {
    pub fn with_host(id: u64) -> Self {
        let raw = format!("id,hostname,snmp_community\n{id},192.0.2.10,public\n");
        Self {
            list: HostList::from_reader(raw.as_bytes()).unwrap(),
            lookups: Cell::new(0),
        }
    }
}

impl HostStore for FakeHosts {
    fn fetch_host(&self, id: u64) -> Result<Option<HostRecord>> {
        self.lookups.set(self.lookups.get() + 1);
        self.list.fetch_host(id)
    }
}

/// Answers from a fixed OID table; unknown OIDs fail like `noSuchObject`.
#[derive(Default)]
pub(crate) struct FakeConnector {
    replies: HashMap<String, String>,
    refuse: bool,
    pub connects: Cell<usize>,
    pub requested: Rc<RefCell<Vec<String>>>,
}

impl FakeConnector {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn reply(mut self, oid: &str, value: &str) -> Self {
        self.replies.insert(oid.to_string(), value.to_string());
        self
    }
}

pub(crate) struct FakeSession {
    replies: HashMap<String, String>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl SnmpConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, host: &HostRecord) -> Result<FakeSession> {
        self.connects.set(self.connects.get() + 1);
        if self.refuse {
            bail!("{} unreachable", host.target());
        }
        self.requested.borrow_mut().clear();
        Ok(FakeSession {
            replies: self.replies.clone(),
            requested: self.requested.clone(),
        })
    }
}

impl SnmpSession for FakeSession {
    async fn get(&mut self, oid: &str) -> Result<String> {
        self.requested.borrow_mut().push(oid.to_string());
        self.replies
            .get(oid)
            .cloned()
            .ok_or_else(|| anyhow!("noSuchObject {oid}"))
    }
}
