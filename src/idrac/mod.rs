use crate::host_list::{HostRecord, HostStore};
use crate::query_engine::{SnmpConnector, SnmpSession};
use anyhow::{anyhow, Result};
use std::fmt;
use tracing::{debug, info, warn};
mod numeric;
mod oids;
#[cfg(test)]
pub(crate) mod testing;

pub use numeric::is_numeric;
pub use oids::STATUS_OIDS;

/// Name the poller uses when it calls us through the script server.
pub const FUNCTION_NAME: &str = "ss_idrac_status";

/// One `name:value` token per status OID, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    values: Vec<(&'static str, String)>,
}

impl StatusLine {
    pub fn zeroed() -> Self {
        Self {
            values: STATUS_OIDS
                .iter()
                .map(|s| (s.name, "0".to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.values {
            write!(f, "{name}:{value} ")?;
        }
        writeln!(f)
    }
}

/// Returns the identifier when it names a host. Absent, empty, `"0"` and
/// non-numeric identifiers select the zero-filled line.
pub fn host_id_argument(raw: Option<&str>) -> Option<&str> {
    let raw = raw?;
    if raw.is_empty() || raw == "0" || !is_numeric(raw) {
        return None;
    }
    Some(raw)
}

/// Ids compare numerically, so `5.0` and `5e0` both name host 5.
pub fn resolve_host(store: &impl HostStore, host_id: &str) -> Result<HostRecord> {
    let not_found = || anyhow!("Host {host_id} not found");
    let id = whole_number(host_id.trim()).ok_or_else(not_found)?;
    store.fetch_host(id)?.ok_or_else(not_found)
}

fn whole_number(raw: &str) -> Option<u64> {
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64)
        .then_some(value as u64)
}

/// Anything that is not a numeric reply reads as `0`.
pub fn normalize(reply: Result<String>) -> String {
    match reply {
        Ok(value) if is_numeric(&value) => value.trim().to_string(),
        _ => "0".to_string(),
    }
}

pub async fn collect<S: SnmpSession>(session: &mut S) -> StatusLine {
    let mut values = Vec::with_capacity(STATUS_OIDS.len());
    for status in STATUS_OIDS.iter() {
        let reply = session.get(status.oid).await;
        if let Err(e) = &reply {
            debug!("{} ({}): {e:#}", status.name, status.oid);
        }
        values.push((status.name, normalize(reply)));
    }
    StatusLine { values }
}

/// Poll one iDRAC. Without a usable host identifier no datastore or network
/// access happens and every status reads `0`.
pub async fn idrac_status<H, C>(host_id: Option<&str>, store: &H, connector: &C) -> Result<StatusLine>
where
    H: HostStore,
    C: SnmpConnector,
{
    let Some(host_id) = host_id_argument(host_id) else {
        debug!("No usable host id {host_id:?}, returning zeroed statuses");
        return Ok(StatusLine::zeroed());
    };

    let host = resolve_host(store, host_id)?;
    info!("Polling {:?}", host);

    match connector.connect(&host).await {
        Ok(mut session) => Ok(collect(&mut session).await),
        Err(e) => {
            warn!("Unable to open SNMP session to {}: {e:#}", host.hostname);
            Ok(StatusLine::zeroed())
        }
    }
}
