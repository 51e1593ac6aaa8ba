use anyhow::{bail, Result};
use csv::ReaderBuilder;
use derivative::Derivative;
use serde::Deserialize;
use std::{collections::HashSet, io::Read, path::Path, time::Duration};

const DEFAULT_PORT: u16 = 161;
const DEFAULT_TIMEOUT_MS: u64 = 500;
const DEFAULT_RETRIES: u32 = 2;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8")]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

impl TryFrom<u8> for SnmpVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2c),
            3 => Ok(Self::V3),
            other => Err(format!("unsupported SNMP version {other}")),
        }
    }
}

/// One row of the host table. Credentials are left out of `Debug` so
/// records can be logged safely.
#[derive(Clone, Derivative, Deserialize)]
#[derivative(Debug)]
pub struct HostRecord {
    pub id: u64,
    pub hostname: String,
    #[serde(default)]
    #[derivative(Debug = "ignore")]
    pub snmp_community: String,
    pub snmp_version: Option<SnmpVersion>,
    #[serde(default)]
    pub snmp_username: String,
    #[serde(default)]
    #[derivative(Debug = "ignore")]
    #[cfg_attr(not(feature = "snmpv3"), allow(dead_code))]
    pub snmp_password: String,
    #[serde(default)]
    pub snmp_auth_protocol: String,
    #[serde(default)]
    #[derivative(Debug = "ignore")]
    #[cfg_attr(not(feature = "snmpv3"), allow(dead_code))]
    pub snmp_priv_passphrase: String,
    #[serde(default)]
    pub snmp_priv_protocol: String,
    #[serde(default)]
    pub snmp_context: String,
    pub snmp_port: Option<u16>,
    /// Milliseconds
    pub snmp_timeout: Option<u64>,
    pub ping_retries: Option<u32>,
    #[serde(default)]
    pub snmp_engine_id: String,
}

impl HostRecord {
    pub fn version(&self) -> SnmpVersion {
        self.snmp_version.unwrap_or(SnmpVersion::V2c)
    }

    pub fn port(&self) -> u16 {
        self.snmp_port.unwrap_or(DEFAULT_PORT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.snmp_timeout.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn retries(&self) -> u32 {
        self.ping_retries.unwrap_or(DEFAULT_RETRIES)
    }

    /// `host:port`, bracketing bare IPv6 addresses.
    pub fn target(&self) -> String {
        if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]:{}", self.hostname, self.port())
        } else {
            format!("{}:{}", self.hostname, self.port())
        }
    }
}

/// Read-only access to host records.
pub trait HostStore {
    fn fetch_host(&self, id: u64) -> Result<Option<HostRecord>>;
}

#[derive(Debug)]
pub struct HostList {
    pub hosts: Vec<HostRecord>,
}

impl HostList {
    pub fn from_csv(filename: &str) -> Result<Self> {
        // Check that the file exists
        let path = Path::new(filename);
        if !path.exists() {
            bail!("File {} does not exist", filename);
        }
        Self::from_reader(std::fs::File::open(path)?)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut hosts = Vec::new();
        let mut seen = HashSet::new();
        for line in reader.deserialize() {
            let host: HostRecord = line?;
            if !seen.insert(host.id) {
                bail!("Host id {} appears more than once", host.id);
            }
            hosts.push(host);
        }

        Ok(Self { hosts })
    }
}

impl HostStore for HostList {
    fn fetch_host(&self, id: u64) -> Result<Option<HostRecord>> {
        Ok(self.hosts.iter().find(|h| h.id == id).cloned())
    }
}

/// Host store backed by a CSV file that is re-read on every lookup, so a
/// long-running script server always sees the current host table.
#[derive(Debug, Clone)]
pub struct CsvHostFile {
    pub filename: String,
}

impl HostStore for CsvHostFile {
    fn fetch_host(&self, id: u64) -> Result<Option<HostRecord>> {
        HostList::from_csv(&self.filename)?.fetch_host(id)
    }
}
